use crate::provider::Provider;
use serde::{Deserialize, Serialize};

/// The normalized key used to correlate one logical piece of media across the
/// two servers.
///
/// Either a `(provider, id)` pair extracted from a Plex agent GUID, or a file
/// path (already translated into the Jellyfin namespace). Equality and hashing
/// are derived on the normalized fields so identities can live in sets:
/// multiple Plex parts or versions that reference the same provider id or file
/// collapse to a single identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WatchedIdentity {
    Provider { provider: Provider, id: String },
    Path(String),
}

impl WatchedIdentity {
    pub fn provider(provider: Provider, id: impl Into<String>) -> Self {
        WatchedIdentity::Provider {
            provider,
            id: id.into(),
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        WatchedIdentity::Path(path.into())
    }
}

impl std::fmt::Display for WatchedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchedIdentity::Provider { provider, id } => write!(f, "{}:{}", provider, id),
            WatchedIdentity::Path(path) => f.write_str(path),
        }
    }
}

/// One watched Plex item: the source title (kept for reporting only) plus the
/// identities extracted for it. An item may carry several identities, one per
/// matched agent; each is looked up independently during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedItem {
    pub title: String,
    pub identities: Vec<WatchedIdentity>,
}

impl WatchedItem {
    pub fn new(title: impl Into<String>, identities: Vec<WatchedIdentity>) -> Self {
        Self {
            title: title.into(),
            identities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_dedup_in_set() {
        let mut set = HashSet::new();
        set.insert(WatchedIdentity::provider(Provider::Imdb, "tt1068680"));
        set.insert(WatchedIdentity::provider(Provider::Imdb, "tt1068680"));
        set.insert(WatchedIdentity::path("/media/movies/a.mkv"));
        set.insert(WatchedIdentity::path("/media/movies/a.mkv"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_same_id_different_provider_is_distinct() {
        let a = WatchedIdentity::provider(Provider::Tmdb, "603");
        let b = WatchedIdentity::provider(Provider::Tvdb, "603");
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let id = WatchedIdentity::provider(Provider::Imdb, "tt0133093");
        assert_eq!(id.to_string(), "Imdb:tt0133093");
        assert_eq!(WatchedIdentity::path("/tv/x.mp4").to_string(), "/tv/x.mp4");
    }
}
