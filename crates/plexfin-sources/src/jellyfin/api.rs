use plexfin_models::LibraryEntry;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct UserDto {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemsPage {
    #[serde(rename = "Items", default)]
    pub items: Vec<ItemDto>,
    #[serde(rename = "TotalRecordCount", default)]
    pub total_record_count: u64,
}

/// Raw Jellyfin item as returned by `/Users/{id}/Items`. Converted into the
/// typed [`LibraryEntry`] at this boundary; items missing `ProviderIds`,
/// `MediaSources` or `UserData` are kept with those fields treated as empty.
#[derive(Debug, Deserialize)]
pub struct ItemDto {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "ProviderIds", default)]
    pub provider_ids: HashMap<String, String>,
    #[serde(rename = "UserData")]
    pub user_data: Option<UserDataDto>,
    #[serde(rename = "MediaSources", default)]
    pub media_sources: Vec<MediaSourceDto>,
}

#[derive(Debug, Deserialize)]
pub struct UserDataDto {
    #[serde(rename = "Played", default)]
    pub played: bool,
}

#[derive(Debug, Deserialize)]
pub struct MediaSourceDto {
    #[serde(rename = "Path")]
    pub path: Option<String>,
}

impl From<ItemDto> for LibraryEntry {
    fn from(dto: ItemDto) -> Self {
        LibraryEntry {
            id: dto.id,
            name: dto.name,
            provider_ids: dto.provider_ids,
            played: dto.user_data.map(|u| u.played).unwrap_or(false),
            media_paths: dto
                .media_sources
                .into_iter()
                .filter_map(|m| m.path)
                .collect(),
        }
    }
}
