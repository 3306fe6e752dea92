use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A point-in-time copy of one Jellyfin library item.
///
/// Owned by the Jellyfin server; this record is never mutated locally. Marking
/// an item watched is a remote command, and a later run observes the new
/// `played` state from a fresh catalog fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    /// Provider key (e.g. "Imdb") to external id (e.g. "tt1068680").
    #[serde(default)]
    pub provider_ids: HashMap<String, String>,
    pub played: bool,
    /// File paths of the item's media sources. Several library entries may
    /// share a path (multi-version items).
    #[serde(default)]
    pub media_paths: Vec<String>,
}

impl LibraryEntry {
    pub fn provider_id(&self, key: &str) -> Option<&str> {
        self.provider_ids.get(key).map(String::as_str)
    }
}
