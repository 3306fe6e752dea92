use anyhow::Result;
use std::path::PathBuf;

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("PLEXFIN_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("plexfin");

        Ok(Self {
            config_dir: base_dir.clone(),
            data_dir: base_dir.join("data"),
            log_dir: base_dir.join("logs"),
        })
    }

    pub fn from_docker_env() -> Self {
        let base = container_base_path();
        // In containers, config files live at the base level, data/logs in subdirs
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    /// Build a PathManager rooted at an arbitrary directory (tests).
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("plexfin.log")
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Containers set PLEXFIN_BASE_PATH; fall back to the user config dir
        if std::env::var("PLEXFIN_BASE_PATH").is_ok() {
            Self::from_docker_env()
        } else {
            Self::new().unwrap_or_else(|_| Self::from_docker_env())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_layout() {
        let paths = PathManager::with_base("/tmp/plexfin-test");
        assert_eq!(
            paths.config_file(),
            PathBuf::from("/tmp/plexfin-test/config.toml")
        );
        assert_eq!(
            paths.cache_dir(),
            PathBuf::from("/tmp/plexfin-test/data/cache")
        );
        assert_eq!(
            paths.log_file(),
            PathBuf::from("/tmp/plexfin-test/logs/plexfin.log")
        );
    }
}
