//! The reconciliation loop: correlate each watched identity with the Jellyfin
//! index, classify the outcome, and issue minimal watched-state updates.

use crate::index::LibraryIndex;
use crate::report::RunReport;
use plexfin_config::MatchMode;
use plexfin_models::{LibraryEntry, MigrationSummary, Outcome, WatchedIdentity, WatchedItem};
use plexfin_sources::{MarkWatched, SourceError};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Attempts per mark-watched call; only transient errors are retried.
const MARK_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct MigrateOptions {
    pub match_mode: MatchMode,
    pub dry_run: bool,
}

/// Drives one reconciliation run against a prebuilt, read-only index.
///
/// Identities are evaluated independently; no ordering is guaranteed between
/// them. The mark-watched side effect is issued at most once per library
/// entry per run, also when several identities resolve to the same entry.
pub struct Migrator<'a> {
    target: &'a dyn MarkWatched,
    user_id: String,
    index: &'a LibraryIndex,
    options: MigrateOptions,
}

impl<'a> Migrator<'a> {
    pub fn new(
        target: &'a dyn MarkWatched,
        user_id: impl Into<String>,
        index: &'a LibraryIndex,
        options: MigrateOptions,
    ) -> Self {
        Self {
            target,
            user_id: user_id.into(),
            index,
            options,
        }
    }

    /// Reconcile the whole watched set and return the aggregated counters.
    pub async fn run(&self, watched: &[WatchedItem]) -> MigrationSummary {
        let mut report = RunReport::new();
        // Set semantics over the input: duplicate identities from multiple
        // parts/versions of the same logical media are evaluated once.
        let mut seen_identities: HashSet<&WatchedIdentity> = HashSet::new();
        // Idempotence boundary: entry ids already acted on this run.
        let mut handled_entries: HashSet<String> = HashSet::new();

        info!(
            operation = "migrate_start",
            items = watched.len(),
            index_entries = self.index.len(),
            mode = ?self.options.match_mode,
            dry_run = self.options.dry_run,
            "Starting reconciliation"
        );

        for item in watched {
            if item.identities.is_empty() {
                // Extraction found nothing usable; surfaced in the counters
                // rather than silently dropped.
                report.record(&Outcome::Missing);
                continue;
            }
            for identity in &item.identities {
                if !seen_identities.insert(identity) {
                    debug!(title = %item.title, %identity, "Duplicate identity, already evaluated");
                    continue;
                }
                for outcome in self
                    .reconcile_identity(&item.title, identity, &mut handled_entries)
                    .await
                {
                    report.record(&outcome);
                }
            }
        }

        report.finish(self.options.dry_run)
    }

    /// Classify one identity against the index. Provider keys resolve to at
    /// most one entry; a path key may legitimately resolve to several
    /// (multi-version files), each evaluated independently.
    async fn reconcile_identity(
        &self,
        title: &str,
        identity: &WatchedIdentity,
        handled: &mut HashSet<String>,
    ) -> Vec<Outcome> {
        let entries: Vec<&LibraryEntry> = match identity {
            WatchedIdentity::Provider { provider, id } => self
                .index
                .lookup_provider(*provider, id)
                .into_iter()
                .collect(),
            WatchedIdentity::Path(path) => self.index.lookup_path(path),
        };

        if entries.is_empty() {
            warn!(title, %identity, "No Jellyfin match");
            return vec![Outcome::Missing];
        }

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in entries {
            if !handled.insert(entry.id.clone()) {
                debug!(title, entry_id = %entry.id, "Entry already handled this run");
                continue;
            }
            outcomes.push(self.apply(title, entry).await);
        }
        outcomes
    }

    async fn apply(&self, title: &str, entry: &LibraryEntry) -> Outcome {
        if entry.played {
            debug!(title, entry_id = %entry.id, "Already marked as watched");
            return Outcome::AlreadyWatched {
                entry_id: entry.id.clone(),
            };
        }

        if self.options.dry_run {
            info!(title, entry_id = %entry.id, "Would mark as watched (dry run)");
            return Outcome::Marked {
                entry_id: entry.id.clone(),
            };
        }

        match self.mark_with_retry(&entry.id).await {
            Ok(()) => {
                info!(title, entry_id = %entry.id, "Marked as watched");
                Outcome::Marked {
                    entry_id: entry.id.clone(),
                }
            }
            Err(e) => {
                warn!(title, entry_id = %entry.id, error = %e, "Failed to mark as watched");
                Outcome::MarkFailed {
                    entry_id: entry.id.clone(),
                }
            }
        }
    }

    async fn mark_with_retry(&self, entry_id: &str) -> Result<(), SourceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.target.mark_watched(&self.user_id, entry_id).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < MARK_ATTEMPTS => {
                    warn!(
                        entry_id,
                        attempt,
                        error = %e,
                        "Transient failure marking item, retrying"
                    );
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
