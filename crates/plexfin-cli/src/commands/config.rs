use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use plexfin_config::{Config, PathManager};

fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = secret.chars().take(4).collect();
        format!("{}****", prefix)
    }
}

/// Print the active configuration with secrets masked.
pub async fn run_show(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = Config::load(&config_file)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_file.display()))?;

    output.info(format!("Configuration: {}", config_file.display()));
    output.info(format!("  plex.server_url     = {}", config.plex.server_url));
    output.info(format!("  plex.token          = {}", mask(&config.plex.token)));
    output.info(format!(
        "  plex.movie_libraries = {:?}",
        config.plex.movie_libraries
    ));
    output.info(format!(
        "  plex.show_libraries  = {:?}",
        config.plex.show_libraries
    ));
    output.info(format!(
        "  jellyfin.server_url = {}",
        config.jellyfin.server_url
    ));
    output.info(format!(
        "  jellyfin.api_key    = {}",
        mask(&config.jellyfin.api_key)
    ));
    output.info(format!("  jellyfin.user       = {}", config.jellyfin.user));
    output.info(format!("  sync.match_mode     = {:?}", config.sync.match_mode));
    output.info(format!("  sync.path_map       = {:?}", config.sync.path_map));
    output.info(format!("  sync.strict         = {}", config.sync.strict));
    output.info(format!("  sync.dry_run        = {}", config.sync.dry_run));
    output.info(format!("  sync.verify_tls     = {}", config.sync.verify_tls));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_prefix() {
        assert_eq!(mask("abcdef123"), "abcd****");
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask("abc"), "****");
        assert_eq!(mask(""), "****");
    }

    #[test]
    fn test_mask_multibyte_secret() {
        // Must not panic on non-ASCII tokens
        assert_eq!(mask("日本語トークン"), "日本語ト****");
        assert_eq!(mask("日本"), "****");
    }
}
