use crate::error::SourceError;
use async_trait::async_trait;

/// The single mutation the reconciliation core performs against Jellyfin.
///
/// Kept behind a trait so the core can be driven by a recording stub in tests
/// and by [`crate::JellyfinClient`] in production.
#[async_trait]
pub trait MarkWatched: Send + Sync {
    /// Mark one library item played for one user. Best-effort fire call: the
    /// caller does not read the state back, a later run observes it from a
    /// fresh catalog fetch.
    async fn mark_watched(&self, user_id: &str, item_id: &str) -> Result<(), SourceError>;
}
