use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub plex: PlexConfig,
    pub jellyfin: JellyfinConfig,
    #[serde(default)]
    pub sync: SyncOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    pub server_url: String,
    pub token: String,
    /// Movie library section names to migrate from.
    #[serde(default)]
    pub movie_libraries: Vec<String>,
    /// Show library section names to migrate episodes from.
    #[serde(default)]
    pub show_libraries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JellyfinConfig {
    pub server_url: String,
    pub api_key: String,
    /// Jellyfin user name whose watched state is updated.
    pub user: String,
}

/// How Plex items are correlated with Jellyfin entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Match on external provider ids extracted from agent GUIDs.
    #[default]
    Provider,
    /// Match on media file paths, after path-map translation.
    Path,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Ordered `SOURCE:DEST` prefix substitutions applied to Plex file paths
    /// before lookup. Order matters: later rules see the output of earlier ones.
    #[serde(default)]
    pub path_map: Vec<String>,
    /// Abort instead of skipping when a watched item yields no usable identity.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_verify_tls() -> bool {
    true
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            path_map: Vec::new(),
            strict: false,
            dry_run: false,
            verify_tls: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fatal checks run before any remote call is issued.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plex.server_url.is_empty() {
            return Err(ConfigError::Invalid("plex.server_url is required".into()));
        }
        if self.plex.token.is_empty() {
            return Err(ConfigError::Invalid("plex.token is required".into()));
        }
        if self.plex.movie_libraries.is_empty() && self.plex.show_libraries.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one Plex library is required (plex.movie_libraries or plex.show_libraries)".into(),
            ));
        }
        if self.jellyfin.server_url.is_empty() {
            return Err(ConfigError::Invalid(
                "jellyfin.server_url is required".into(),
            ));
        }
        if self.jellyfin.api_key.is_empty() {
            return Err(ConfigError::Invalid("jellyfin.api_key is required".into()));
        }
        if self.jellyfin.user.is_empty() {
            return Err(ConfigError::Invalid("jellyfin.user is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            plex: PlexConfig {
                server_url: "http://plex:32400".into(),
                token: "token".into(),
                movie_libraries: vec!["Movies".into()],
                show_libraries: vec![],
            },
            jellyfin: JellyfinConfig {
                server_url: "http://jellyfin:8096".into(),
                api_key: "key".into(),
                user: "alice".into(),
            },
            sync: SyncOptions::default(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_requires_library() {
        let mut config = valid_config();
        config.plex.movie_libraries.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_jellyfin_user() {
        let mut config = valid_config();
        config.jellyfin.user.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
            [plex]
            server_url = "http://plex:32400"
            token = "abc"
            movie_libraries = ["Movies"]

            [jellyfin]
            server_url = "http://jellyfin:8096"
            api_key = "def"
            user = "alice"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sync.match_mode, MatchMode::Provider);
        assert!(config.sync.verify_tls);
        assert!(config.sync.path_map.is_empty());
    }

    #[test]
    fn test_parse_sync_section() {
        let toml_str = r#"
            [plex]
            server_url = "http://plex:32400"
            token = "abc"
            show_libraries = ["TV"]

            [jellyfin]
            server_url = "http://jellyfin:8096"
            api_key = "def"
            user = "alice"

            [sync]
            match_mode = "path"
            path_map = ["/media:/mnt/media"]
            strict = true
            verify_tls = false
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sync.match_mode, MatchMode::Path);
        assert_eq!(config.sync.path_map, vec!["/media:/mnt/media"]);
        assert!(config.sync.strict);
        assert!(!config.sync.verify_tls);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = valid_config();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.plex.server_url, config.plex.server_url);
        assert_eq!(loaded.jellyfin.user, config.jellyfin.user);
    }
}
