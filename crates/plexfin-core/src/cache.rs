//! Disk cache for raw collaborator responses.
//!
//! Purely an acceleration in front of the Plex/Jellyfin fetches (`--use-cache`
//! runs reconcile against the last snapshot without touching either server).
//! It has no influence on reconciliation semantics.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use plexfin_config::PathManager;
use plexfin_models::LibraryEntry;
use plexfin_sources::PlexItem;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot<T> {
    fetched_at: DateTime<Utc>,
    items: Vec<T>,
}

#[derive(Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(path_manager: &PathManager) -> Result<Self> {
        let cache_dir = path_manager.cache_dir();
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    pub fn load_plex_watched(&self) -> Result<Option<Vec<PlexItem>>> {
        self.load_snapshot("plex_watched")
    }

    pub fn save_plex_watched(&self, items: &[PlexItem]) -> Result<()> {
        self.save_snapshot("plex_watched", items)
    }

    pub fn load_jellyfin_library(&self) -> Result<Option<Vec<LibraryEntry>>> {
        self.load_snapshot("jellyfin_library")
    }

    pub fn save_jellyfin_library(&self, entries: &[LibraryEntry]) -> Result<()> {
        self.save_snapshot("jellyfin_library", entries)
    }

    /// Remove all cached snapshots.
    pub fn clear(&self) -> Result<()> {
        for name in ["plex_watched", "jellyfin_library"] {
            let path = self.snapshot_path(name);
            if path.exists() {
                std::fs::remove_file(&path)?;
                debug!(snapshot = name, "Removed cached snapshot");
            }
        }
        Ok(())
    }

    fn load_snapshot<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Vec<T>>> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            debug!(snapshot = name, "Cache miss (file does not exist)");
            return Ok(None);
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Snapshot<T>>(&content) {
                Ok(snapshot) => {
                    info!(
                        snapshot = name,
                        items = snapshot.items.len(),
                        fetched_at = %snapshot.fetched_at,
                        "Cache hit"
                    );
                    Ok(Some(snapshot.items))
                }
                Err(e) => {
                    warn!(
                        snapshot = name,
                        error = %e,
                        "Cache corruption detected, deleting corrupted file"
                    );
                    if let Err(rm_err) = std::fs::remove_file(&path) {
                        warn!(snapshot = name, error = %rm_err, "Failed to delete corrupted cache file");
                    }
                    Ok(None)
                }
            },
            Err(e) => {
                warn!(snapshot = name, error = %e, "Failed to read cache file");
                Ok(None)
            }
        }
    }

    fn save_snapshot<T: Serialize + Clone>(&self, name: &str, items: &[T]) -> Result<()> {
        let path = self.snapshot_path(name);
        let snapshot = Snapshot {
            fetched_at: Utc::now(),
            items: items.to_vec(),
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| anyhow!("Failed to serialize {} snapshot: {}", name, e))?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow!("Failed to write cache file {}: {}", path.display(), e))?;
        debug!(snapshot = name, items = items.len(), "Cache saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, CacheManager) {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        let manager = CacheManager::new(&paths).unwrap();
        (dir, manager)
    }

    fn plex_item(title: &str) -> PlexItem {
        PlexItem {
            rating_key: "1".into(),
            title: title.into(),
            guids: vec!["com.plexapp.agents.imdb://tt1?lang=en".into()],
            paths: vec!["/media/a.mkv".into()],
        }
    }

    #[test]
    fn test_miss_when_empty() {
        let (_dir, cache) = manager();
        assert!(cache.load_plex_watched().unwrap().is_none());
        assert!(cache.load_jellyfin_library().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, cache) = manager();
        cache
            .save_plex_watched(&[plex_item("A"), plex_item("B")])
            .unwrap();
        let loaded = cache.load_plex_watched().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].title, "A");
    }

    #[test]
    fn test_corrupted_snapshot_is_deleted() {
        let (_dir, cache) = manager();
        std::fs::write(cache.snapshot_path("plex_watched"), "not json").unwrap();
        assert!(cache.load_plex_watched().unwrap().is_none());
        assert!(!cache.snapshot_path("plex_watched").exists());
    }

    #[test]
    fn test_clear_removes_snapshots() {
        let (_dir, cache) = manager();
        cache.save_plex_watched(&[plex_item("A")]).unwrap();
        cache.clear().unwrap();
        assert!(cache.load_plex_watched().unwrap().is_none());
    }
}
