use crate::error::SourceError;
use crate::plex::api::{LibrarySection, MediaKind, PlexHttpClient, PlexItem};
use tracing::{info, warn};

/// Plex collaborator: enumerates watched movies/episodes from named library
/// sections. Pagination and auth are handled here; the reconciliation core
/// only ever sees typed [`PlexItem`] records.
pub struct PlexClient {
    http: PlexHttpClient,
}

impl PlexClient {
    pub fn new(server_url: String, token: &str, verify_tls: bool) -> Result<Self, SourceError> {
        Ok(Self {
            http: PlexHttpClient::new(server_url, token, verify_tls)?,
        })
    }

    pub async fn check_connection(&self) -> Result<(), SourceError> {
        self.http.check_connection().await
    }

    async fn find_section(&self, name: &str) -> Result<LibrarySection, SourceError> {
        let sections = self.http.get_sections().await?;
        sections
            .into_iter()
            .find(|s| s.title == name)
            .ok_or_else(|| SourceError::NotFound(format!("Plex library '{}' not found", name)))
    }

    /// Watched items in the named library, whatever its kind. Movie sections
    /// enumerate movies, show sections enumerate episodes; anything else
    /// (music, photos) has no watched state worth migrating.
    pub async fn watched_items(&self, library: &str) -> Result<Vec<PlexItem>, SourceError> {
        let section = self.find_section(library).await?;
        let kind = kind_for_section(&section.kind).ok_or_else(|| {
            SourceError::Unexpected(format!(
                "Plex library '{}' has unsupported type '{}'",
                library, section.kind
            ))
        })?;
        let items = self.http.get_watched_items(&section.key, kind).await?;
        info!(library, kind = ?kind, count = items.len(), "Collected watched items from Plex");
        Ok(items)
    }

    /// All watched movies in the named movie library.
    pub async fn watched_movies(&self, library: &str) -> Result<Vec<PlexItem>, SourceError> {
        let section = self.find_section(library).await?;
        if section.kind != "movie" {
            warn!(
                library,
                kind = %section.kind,
                "Library is not a movie section, continuing anyway"
            );
        }
        let items = self.http.get_watched_items(&section.key, MediaKind::Movie).await?;
        info!(library, count = items.len(), "Collected watched movies from Plex");
        Ok(items)
    }

    /// All watched episodes in the named show library.
    pub async fn watched_episodes(&self, library: &str) -> Result<Vec<PlexItem>, SourceError> {
        let section = self.find_section(library).await?;
        if section.kind != "show" {
            warn!(
                library,
                kind = %section.kind,
                "Library is not a show section, continuing anyway"
            );
        }
        let items = self.http.get_watched_items(&section.key, MediaKind::Episode).await?;
        info!(library, count = items.len(), "Collected watched episodes from Plex");
        Ok(items)
    }
}

fn kind_for_section(section_kind: &str) -> Option<MediaKind> {
    match section_kind {
        "movie" => Some(MediaKind::Movie),
        "show" => Some(MediaKind::Episode),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_section() {
        assert_eq!(kind_for_section("movie"), Some(MediaKind::Movie));
        assert_eq!(kind_for_section("show"), Some(MediaKind::Episode));
        assert_eq!(kind_for_section("artist"), None);
        assert_eq!(kind_for_section("photo"), None);
    }
}
