use serde::Serialize;

/// Per-identity reconciliation result. Never persisted; aggregated into the
/// run-level [`MigrationSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A mark-watched command was issued (or would have been, under dry-run).
    Marked { entry_id: String },
    /// The matched entry is already played; nothing to do.
    AlreadyWatched { entry_id: String },
    /// No corresponding Jellyfin entry.
    Missing,
    /// The mark-watched call failed after retries.
    MarkFailed { entry_id: String },
}

/// Run-level counters reported at the end of a migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    /// Entries newly marked watched (or that would be, under dry-run).
    pub marked: u64,
    /// Entries already watched, skipped.
    pub skipped: u64,
    /// Identities with no corresponding Jellyfin entry.
    pub missing: u64,
    /// Entries whose mark-watched call failed after retries.
    pub failed: u64,
}

impl MigrationSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Marked { .. } => self.marked += 1,
            Outcome::AlreadyWatched { .. } => self.skipped += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::MarkFailed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.marked + self.skipped + self.missing + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut summary = MigrationSummary::default();
        summary.record(&Outcome::Marked {
            entry_id: "42".into(),
        });
        summary.record(&Outcome::AlreadyWatched {
            entry_id: "7".into(),
        });
        summary.record(&Outcome::Missing);
        summary.record(&Outcome::Missing);
        summary.record(&Outcome::MarkFailed {
            entry_id: "9".into(),
        });
        assert_eq!(summary.marked, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.missing, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 5);
    }
}
