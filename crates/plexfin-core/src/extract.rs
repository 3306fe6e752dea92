//! Identity extraction: turning a raw Plex item into the normalized keys used
//! to look it up in the Jellyfin index.

use crate::translate::{translate_path, PathTranslation};
use plexfin_config::MatchMode;
use plexfin_models::{Provider, WatchedIdentity, WatchedItem};
use plexfin_sources::PlexItem;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Raised only under strict mode, when a watched item yields no usable
/// identity. Fatal by design: it fires during extraction, before any remote
/// call has been issued.
#[derive(Debug, thiserror::Error)]
#[error("no usable identity for watched item '{title}' (strict mode)")]
pub struct UnmatchedItemError {
    pub title: String,
}

/// Parse a legacy Plex agent GUID of the form
/// `<namespace>.<agent>://<externalId>?<query>`, e.g.
/// `com.plexapp.agents.imdb://tt1068680?lang=en`.
///
/// Returns the normalized provider and external id, or `None` when the string
/// does not match this shape or the agent is not in the translation table.
/// A `None` here is always a soft miss, never a fatal error.
pub fn extract_provider(guid: &str) -> Option<(Provider, String)> {
    let (scheme, rest) = guid.split_once("://")?;
    let (_, agent) = scheme.rsplit_once('.')?;
    let (id, _query) = rest.split_once('?')?;
    if id.is_empty() {
        return None;
    }
    let provider = Provider::from_plex_agent(agent)?;
    Some((provider, id.to_string()))
}

/// Provider-mode identities for one item: the first GUID per distinct
/// provider, each an independent identity.
fn provider_identities(item: &PlexItem) -> Vec<WatchedIdentity> {
    let mut seen: HashSet<Provider> = HashSet::new();
    let mut identities = Vec::new();
    for guid in &item.guids {
        match extract_provider(guid) {
            Some((provider, id)) => {
                if seen.insert(provider) {
                    identities.push(WatchedIdentity::provider(provider, id));
                } else {
                    debug!(title = %item.title, %provider, "Skipping additional GUID for already-matched provider");
                }
            }
            None => {
                debug!(title = %item.title, guid = %guid, "GUID did not match any known agent");
            }
        }
    }
    identities
}

/// Path-mode identities: the distinct file paths of the item's media parts,
/// translated into the Jellyfin namespace.
fn path_identities(item: &PlexItem, table: &[PathTranslation]) -> Vec<WatchedIdentity> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut identities = Vec::new();
    for path in &item.paths {
        let translated = translate_path(path, table);
        if seen.insert(translated.clone()) {
            identities.push(WatchedIdentity::Path(translated));
        }
    }
    identities
}

/// Convert the Plex watched set into [`WatchedItem`]s carrying normalized
/// identities. Items that yield no identity are kept (they are counted as
/// missing later, never silently dropped) unless `strict` is set, in which
/// case the run aborts here, before any remote call.
pub fn collect_watched(
    items: &[PlexItem],
    mode: MatchMode,
    table: &[PathTranslation],
    strict: bool,
) -> Result<Vec<WatchedItem>, UnmatchedItemError> {
    let mut watched = Vec::with_capacity(items.len());
    for item in items {
        let identities = match mode {
            MatchMode::Provider => provider_identities(item),
            MatchMode::Path => path_identities(item, table),
        };
        if identities.is_empty() {
            if strict {
                return Err(UnmatchedItemError {
                    title: item.title.clone(),
                });
            }
            warn!(title = %item.title, "No match for Plex item");
        }
        watched.push(WatchedItem::new(item.title.clone(), identities));
    }
    Ok(watched)
}
