pub mod config;
pub mod paths;

pub use config::{Config, ConfigError, JellyfinConfig, MatchMode, PlexConfig, SyncOptions};
pub use paths::PathManager;
