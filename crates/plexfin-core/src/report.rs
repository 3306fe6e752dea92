//! Run-level result aggregation.

use plexfin_models::{MigrationSummary, Outcome};
use std::time::Instant;
use tracing::info;

/// Accumulates outcome counters over a run and emits a single structured
/// summary event when finished. The summary is always emitted, also after a
/// partial failure.
pub struct RunReport {
    summary: MigrationSummary,
    started: Instant,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            summary: MigrationSummary::default(),
            started: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: &Outcome) {
        self.summary.record(outcome);
    }

    pub fn summary(&self) -> MigrationSummary {
        self.summary
    }

    pub fn finish(self, dry_run: bool) -> MigrationSummary {
        info!(
            operation = "migrate_complete",
            dry_run,
            duration_ms = self.started.elapsed().as_millis() as u64,
            marked = self.summary.marked,
            skipped = self.summary.skipped,
            missing = self.summary.missing,
            failed = self.summary.failed,
            "Migration complete"
        );
        self.summary
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_aggregates_outcomes() {
        let mut report = RunReport::new();
        report.record(&Outcome::Marked {
            entry_id: "1".into(),
        });
        report.record(&Outcome::Missing);
        let summary = report.finish(false);
        assert_eq!(summary.marked, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.total(), 2);
    }
}
