//! Lookup index over the Jellyfin catalog.
//!
//! Jellyfin cannot filter on provider id server-side, so the full catalog is
//! fetched once and indexed locally. Both maps are built in a single pass and
//! the index is read-only afterwards.

use plexfin_models::{LibraryEntry, Provider};
use std::collections::HashMap;
use tracing::debug;

pub struct LibraryIndex {
    entries: Vec<LibraryEntry>,
    /// (provider, external id) -> entry position. Provider ids are unique per
    /// library in practice; on a duplicate the later entry wins.
    by_provider: HashMap<(Provider, String), usize>,
    /// media source path -> entry positions. Several entries may share a path
    /// (multi-version items), hence the list.
    by_path: HashMap<String, Vec<usize>>,
}

impl LibraryIndex {
    /// Single pass over the catalog. Entries missing provider ids or media
    /// sources are kept; they simply never appear under that key type.
    pub fn build(entries: Vec<LibraryEntry>) -> Self {
        let mut by_provider: HashMap<(Provider, String), usize> = HashMap::new();
        let mut by_path: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, entry) in entries.iter().enumerate() {
            for provider in Provider::ALL {
                if let Some(id) = entry.provider_id(provider.as_jellyfin_key()) {
                    let previous = by_provider.insert((provider, id.to_string()), pos);
                    if let Some(prev) = previous {
                        debug!(
                            %provider,
                            id,
                            first = %entries[prev].name,
                            second = %entry.name,
                            "Duplicate provider id in Jellyfin library"
                        );
                    }
                }
            }
            for path in &entry.media_paths {
                by_path.entry(path.clone()).or_default().push(pos);
            }
        }

        debug!(
            entries = entries.len(),
            provider_keys = by_provider.len(),
            path_keys = by_path.len(),
            "Built Jellyfin library index"
        );

        Self {
            entries,
            by_provider,
            by_path,
        }
    }

    pub fn lookup_provider(&self, provider: Provider, id: &str) -> Option<&LibraryEntry> {
        self.by_provider
            .get(&(provider, id.to_string()))
            .map(|&pos| &self.entries[pos])
    }

    pub fn lookup_path(&self, path: &str) -> Vec<&LibraryEntry> {
        self.by_path
            .get(path)
            .map(|positions| positions.iter().map(|&pos| &self.entries[pos]).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, providers: &[(&str, &str)], paths: &[&str], played: bool) -> LibraryEntry {
        LibraryEntry {
            id: id.into(),
            name: name.into(),
            provider_ids: providers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            played,
            media_paths: paths.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_provider_lookup() {
        let index = LibraryIndex::build(vec![
            entry("42", "The Hurt Locker", &[("Imdb", "tt1068680")], &[], false),
            entry("7", "The Matrix", &[("Tmdb", "603")], &[], true),
        ]);
        let hit = index.lookup_provider(Provider::Imdb, "tt1068680").unwrap();
        assert_eq!(hit.id, "42");
        assert!(index.lookup_provider(Provider::Imdb, "tt0000000").is_none());
        // Same id under a different provider must not match
        assert!(index.lookup_provider(Provider::Tvdb, "603").is_none());
    }

    #[test]
    fn test_path_lookup_multi_version() {
        let index = LibraryIndex::build(vec![
            entry("1", "Movie 1080p", &[], &["/mnt/media/movie.mkv"], false),
            entry("2", "Movie 4K", &[], &["/mnt/media/movie.mkv"], false),
            entry("3", "Other", &[], &["/mnt/media/other.mkv"], false),
        ]);
        let hits = index.lookup_path("/mnt/media/movie.mkv");
        assert_eq!(hits.len(), 2);
        assert!(index.lookup_path("/mnt/media/none.mkv").is_empty());
    }

    #[test]
    fn test_entries_without_keys_are_kept() {
        let index = LibraryIndex::build(vec![entry("9", "Bare", &[], &[], false)]);
        assert_eq!(index.len(), 1);
        assert!(index.lookup_provider(Provider::Imdb, "tt1").is_none());
        assert!(index.lookup_path("/x").is_empty());
    }

    #[test]
    fn test_unknown_provider_keys_ignored() {
        let index = LibraryIndex::build(vec![entry(
            "5",
            "Anime",
            &[("AniDB", "123"), ("Imdb", "tt5")],
            &[],
            false,
        )]);
        assert_eq!(index.lookup_provider(Provider::Imdb, "tt5").unwrap().id, "5");
    }
}
