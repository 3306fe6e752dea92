use crate::output::Output;
use color_eyre::eyre::{eyre, Context, Report};
use color_eyre::Result;
use plexfin_config::{Config, MatchMode, PathManager};
use plexfin_core::{
    collect_watched, CacheManager, LibraryIndex, MigrateOptions, Migrator, UnmatchedItemError,
};
use plexfin_models::{LibraryEntry, MigrationSummary};
use plexfin_sources::{JellyfinClient, PlexClient, PlexItem};
use tracing::{debug, info};

#[allow(clippy::too_many_arguments)]
pub async fn run_migrate(
    dry_run: bool,
    use_cache: bool,
    strict: bool,
    insecure: bool,
    match_mode: Option<MatchMode>,
    libraries: Vec<String>,
    path_map: Vec<String>,
    output: &Output,
) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = Config::load(&config_file)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_file.display()))?;
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration: {}", e))?;

    // CLI flags layer over the config file
    let dry_run = dry_run || config.sync.dry_run;
    let strict = strict || config.sync.strict;
    let match_mode = match_mode.unwrap_or(config.sync.match_mode);
    let verify_tls = config.sync.verify_tls && !insecure;

    // Config rules first, CLI-supplied rules appended in the given order
    let mut rules = config.sync.path_map.clone();
    rules.extend(path_map);
    // Malformed rules abort here, before any remote call
    let table = plexfin_core::parse_path_map(&rules)
        .map_err(|e| eyre!("Invalid path map: {}", e))?;

    let cache = CacheManager::new(&path_manager)
        .map_err(|e| eyre!("Failed to initialize cache: {}", e))?;

    let jellyfin = JellyfinClient::new(
        config.jellyfin.server_url.clone(),
        config.jellyfin.api_key.clone(),
        verify_tls,
    )
    .map_err(|e| eyre!("Failed to create Jellyfin client: {}", e))?;

    let user_id = jellyfin
        .user_id(&config.jellyfin.user)
        .await
        .map_err(|e| eyre!("Failed to resolve Jellyfin user: {}", e))?;
    debug!(user = %config.jellyfin.user, %user_id, "Resolved Jellyfin user");

    let plex_items =
        fetch_plex_watched(&config, &libraries, use_cache, verify_tls, &cache, output).await?;
    let jellyfin_entries = fetch_jellyfin_library(&jellyfin, &user_id, use_cache, &cache, output).await?;

    let watched = match collect_watched(&plex_items, match_mode, &table, strict) {
        Ok(watched) => watched,
        Err(e) => return Err(strict_abort(output, dry_run, e)),
    };

    let index = LibraryIndex::build(jellyfin_entries);
    if index.is_empty() {
        output.warn("Jellyfin library is empty, nothing to match against");
    }

    let migrator = Migrator::new(
        &jellyfin,
        user_id,
        &index,
        MigrateOptions {
            match_mode,
            dry_run,
        },
    );
    let summary = migrator.run(&watched).await;

    output.summary(&summary, dry_run);

    if summary.failed > 0 {
        output.error(format!(
            "{} item(s) could not be marked watched",
            summary.failed
        ));
        return Err(eyre!("migration finished with {} failure(s)", summary.failed));
    }
    Ok(())
}

/// Strict-mode abort: no mark call has been issued yet, but the summary
/// still goes out so a scripted run always sees the counts.
fn strict_abort(output: &Output, dry_run: bool, err: UnmatchedItemError) -> Report {
    output.summary(&MigrationSummary::default(), dry_run);
    eyre!("{}", err)
}

async fn fetch_plex_watched(
    config: &Config,
    libraries: &[String],
    use_cache: bool,
    verify_tls: bool,
    cache: &CacheManager,
    output: &Output,
) -> Result<Vec<PlexItem>> {
    if use_cache {
        if let Ok(Some(cached)) = cache.load_plex_watched() {
            output.info(format!("Using cached Plex watched set ({} items)", cached.len()));
            return Ok(cached);
        }
        output.warn("No Plex cache available, fetching from server");
    }

    let plex = PlexClient::new(config.plex.server_url.clone(), &config.plex.token, verify_tls)
        .map_err(|e| eyre!("Failed to create Plex client: {}", e))?;
    plex.check_connection()
        .await
        .map_err(|e| eyre!("Failed to connect to Plex: {}", e))?;

    let mut items = Vec::new();
    if libraries.is_empty() {
        for library in &config.plex.movie_libraries {
            items.extend(
                plex.watched_movies(library)
                    .await
                    .map_err(|e| eyre!("Failed to fetch watched movies from '{}': {}", library, e))?,
            );
        }
        for library in &config.plex.show_libraries {
            items.extend(
                plex.watched_episodes(library).await.map_err(|e| {
                    eyre!("Failed to fetch watched episodes from '{}': {}", library, e)
                })?,
            );
        }
    } else {
        // --library replaces the configured lists; section kind comes from
        // the server, so movie and show libraries can be mixed freely
        for library in libraries {
            items.extend(
                plex.watched_items(library)
                    .await
                    .map_err(|e| eyre!("Failed to fetch watched items from '{}': {}", library, e))?,
            );
        }
    }
    info!(count = items.len(), "Collected watched items from Plex");

    if let Err(e) = cache.save_plex_watched(&items) {
        tracing::warn!(error = %e, "Failed to save Plex snapshot to cache");
    }
    Ok(items)
}

async fn fetch_jellyfin_library(
    jellyfin: &JellyfinClient,
    user_id: &str,
    use_cache: bool,
    cache: &CacheManager,
    output: &Output,
) -> Result<Vec<LibraryEntry>> {
    if use_cache {
        if let Ok(Some(cached)) = cache.load_jellyfin_library() {
            output.info(format!("Using cached Jellyfin library ({} items)", cached.len()));
            return Ok(cached);
        }
        output.warn("No Jellyfin cache available, fetching from server");
    }

    let entries = jellyfin
        .all_items(user_id)
        .await
        .map_err(|e| eyre!("Failed to fetch Jellyfin library: {}", e))?;

    if let Err(e) = cache.save_jellyfin_library(&entries) {
        tracing::warn!(error = %e, "Failed to save Jellyfin snapshot to cache");
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_strict_abort_reports_summary_and_error() {
        let output = Output::new(OutputFormat::Json, false);
        let err = strict_abort(
            &output,
            true,
            UnmatchedItemError {
                title: "Orphaned Movie".into(),
            },
        );
        // The zeroed summary has been emitted above; the run still fails
        assert!(err.to_string().contains("Orphaned Movie"));
    }
}
