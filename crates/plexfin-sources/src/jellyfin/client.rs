use crate::error::SourceError;
use crate::jellyfin::api::{ItemsPage, UserDto};
use crate::traits::MarkWatched;
use async_trait::async_trait;
use plexfin_models::LibraryEntry;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const PAGE_SIZE: u64 = 100;

/// Jellyfin collaborator: user lookup, full catalog listing (paginated here,
/// never exposed to the core), and the mark-played command.
pub struct JellyfinClient {
    client: Client,
    server_url: String,
    api_key: String,
}

impl JellyfinClient {
    pub fn new(server_url: String, api_key: String, verify_tls: bool) -> Result<Self, SourceError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.server_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api {
                service: "jellyfin",
                status,
                endpoint: endpoint.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn get_users(&self) -> Result<Vec<UserDto>, SourceError> {
        self.get_json("/Users", &[]).await
    }

    /// Resolve a user name to its id. Missing users are a hard error; nothing
    /// can be migrated without one.
    pub async fn user_id(&self, name: &str) -> Result<String, SourceError> {
        let users = self.get_users().await?;
        users
            .into_iter()
            .find(|u| u.name == name)
            .map(|u| u.id)
            .ok_or_else(|| SourceError::NotFound(format!("Jellyfin user '{}' not found", name)))
    }

    /// Fetch the full library for a user, page by page. Jellyfin cannot filter
    /// on provider id server-side, so the whole catalog is pulled and indexed
    /// locally (https://github.com/jellyfin/jellyfin/issues/1990).
    pub async fn all_items(&self, user_id: &str) -> Result<Vec<LibraryEntry>, SourceError> {
        let endpoint = format!("/Users/{}/Items", urlencoding::encode(user_id));
        let mut entries: Vec<LibraryEntry> = Vec::new();
        let mut start_index: u64 = 0;

        loop {
            let page: ItemsPage = self
                .get_json(
                    &endpoint,
                    &[
                        ("Recursive", "true".to_string()),
                        ("IncludeItemTypes", "Movie,Episode".to_string()),
                        ("Fields", "ProviderIds,MediaSources".to_string()),
                        ("StartIndex", start_index.to_string()),
                        ("Limit", PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.items.len() as u64;
            entries.extend(page.items.into_iter().map(LibraryEntry::from));
            debug!(
                fetched = entries.len(),
                total = page.total_record_count,
                "Fetched Jellyfin library page"
            );

            if fetched == 0 {
                break;
            }
            start_index += fetched;
        }

        info!(count = entries.len(), "Collected Jellyfin library");
        Ok(entries)
    }
}

#[async_trait]
impl MarkWatched for JellyfinClient {
    async fn mark_watched(&self, user_id: &str, item_id: &str) -> Result<(), SourceError> {
        let endpoint = format!(
            "/Users/{}/PlayedItems/{}",
            urlencoding::encode(user_id),
            urlencoding::encode(item_id)
        );
        let url = format!("{}{}", self.server_url, endpoint);
        let response = self
            .client
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api {
                service: "jellyfin",
                status,
                endpoint,
            });
        }
        debug!(item_id, "Marked Jellyfin item played");
        Ok(())
    }
}
