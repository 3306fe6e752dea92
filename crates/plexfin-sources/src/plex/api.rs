use crate::error::SourceError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Which Plex metadata type to enumerate. Plex encodes these as numeric
/// `type` filters on the section listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Episode,
}

impl MediaKind {
    fn type_filter(&self) -> &'static str {
        match self {
            MediaKind::Movie => "1",
            MediaKind::Episode => "4",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    pub kind: String,
}

/// One watched Plex item as handed to the reconciliation core: the title for
/// reporting, every agent GUID string the item carries, and the file paths of
/// its media parts. No parsing happens here; the identity extractor owns that.
/// Serializable so the raw-response cache can snapshot a fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexItem {
    pub rating_key: String,
    pub title: String,
    pub guids: Vec<String>,
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MediaContainerResponse<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directories: Vec<SectionDto>,
}

#[derive(Debug, Deserialize)]
struct SectionDto {
    key: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ItemsContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataDto>,
}

#[derive(Debug, Deserialize)]
struct MetadataDto {
    #[serde(rename = "ratingKey")]
    rating_key: String,
    title: String,
    /// Legacy agent GUID, e.g. `com.plexapp.agents.imdb://tt1068680?lang=en`.
    guid: Option<String>,
    /// Modern per-provider GUID entries.
    #[serde(rename = "Guid", default)]
    guids: Vec<GuidDto>,
    #[serde(rename = "Media", default)]
    media: Vec<MediaDto>,
}

#[derive(Debug, Deserialize)]
struct GuidDto {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaDto {
    #[serde(rename = "Part", default)]
    parts: Vec<PartDto>,
}

#[derive(Debug, Deserialize)]
struct PartDto {
    file: Option<String>,
}

impl From<MetadataDto> for PlexItem {
    fn from(dto: MetadataDto) -> Self {
        let mut guids: Vec<String> = Vec::new();
        if let Some(guid) = dto.guid {
            guids.push(guid);
        }
        guids.extend(dto.guids.into_iter().map(|g| g.id));

        let paths = dto
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .filter_map(|p| p.file)
            .collect();

        PlexItem {
            rating_key: dto.rating_key,
            title: dto.title,
            guids,
            paths,
        }
    }
}

pub struct PlexHttpClient {
    client: Client,
    server_url: String,
}

impl PlexHttpClient {
    pub fn new(server_url: String, token: &str, verify_tls: bool) -> Result<Self, SourceError> {
        let client = Client::builder()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-token"),
                    reqwest::header::HeaderValue::from_str(token)
                        .map_err(|_| SourceError::Unexpected("invalid Plex token format".into()))?,
                );
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-plex-client-identifier"),
                    reqwest::header::HeaderValue::from_static("plexfin-cli"),
                );
                headers
            })
            .danger_accept_invalid_certs(!verify_tls)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.server_url, endpoint);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api {
                service: "plex",
                status,
                endpoint: endpoint.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Cheap token/connectivity check against the server identity endpoint.
    pub async fn check_connection(&self) -> Result<(), SourceError> {
        let url = format!("{}/identity", self.server_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            debug!("Plex connection check successful");
            Ok(())
        } else {
            Err(SourceError::Api {
                service: "plex",
                status,
                endpoint: "/identity".to_string(),
            })
        }
    }

    pub async fn get_sections(&self) -> Result<Vec<LibrarySection>, SourceError> {
        let response: MediaContainerResponse<SectionsContainer> =
            self.get_json("/library/sections", &[]).await?;
        Ok(response
            .media_container
            .directories
            .into_iter()
            .map(|d| LibrarySection {
                key: d.key,
                title: d.title,
                kind: d.kind,
            })
            .collect())
    }

    /// List every watched item of the given kind in a library section,
    /// including agent GUIDs and media part paths.
    pub async fn get_watched_items(
        &self,
        section_key: &str,
        kind: MediaKind,
    ) -> Result<Vec<PlexItem>, SourceError> {
        let endpoint = format!("/library/sections/{}/all", section_key);
        let response: MediaContainerResponse<ItemsContainer> = self
            .get_json(
                &endpoint,
                &[
                    ("type", kind.type_filter()),
                    ("unwatched", "0"),
                    ("includeGuids", "1"),
                ],
            )
            .await?;
        let items: Vec<PlexItem> = response
            .media_container
            .metadata
            .into_iter()
            .map(PlexItem::from)
            .collect();
        debug!(
            section = section_key,
            kind = ?kind,
            count = items.len(),
            "Fetched watched items from Plex section"
        );
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_dto_to_plex_item() {
        let json = r#"{
            "ratingKey": "123",
            "title": "The Hurt Locker",
            "guid": "com.plexapp.agents.imdb://tt1068680?lang=en",
            "Guid": [
                {"id": "imdb://tt1068680"},
                {"id": "tmdb://12162"}
            ],
            "Media": [
                {"Part": [{"file": "/media/movies/The Hurt Locker (2008).mkv"}]},
                {"Part": [{"file": "/media/movies/The Hurt Locker (2008) 4K.mkv"}]}
            ]
        }"#;
        let dto: MetadataDto = serde_json::from_str(json).unwrap();
        let item = PlexItem::from(dto);
        assert_eq!(item.title, "The Hurt Locker");
        assert_eq!(item.guids.len(), 3);
        assert_eq!(item.guids[0], "com.plexapp.agents.imdb://tt1068680?lang=en");
        assert_eq!(item.paths.len(), 2);
    }

    #[test]
    fn test_metadata_dto_tolerates_missing_fields() {
        let json = r#"{"ratingKey": "9", "title": "Bare"}"#;
        let dto: MetadataDto = serde_json::from_str(json).unwrap();
        let item = PlexItem::from(dto);
        assert!(item.guids.is_empty());
        assert!(item.paths.is_empty());
    }

    #[test]
    fn test_sections_container_parses() {
        let json = r#"{
            "MediaContainer": {
                "Directory": [
                    {"key": "1", "title": "Movies", "type": "movie"},
                    {"key": "2", "title": "TV", "type": "show"}
                ]
            }
        }"#;
        let response: MediaContainerResponse<SectionsContainer> =
            serde_json::from_str(json).unwrap();
        assert_eq!(response.media_container.directories.len(), 2);
        assert_eq!(response.media_container.directories[0].title, "Movies");
    }
}
