pub mod entry;
pub mod identity;
pub mod outcome;
pub mod provider;

pub use entry::LibraryEntry;
pub use identity::{WatchedIdentity, WatchedItem};
pub use outcome::{MigrationSummary, Outcome};
pub use provider::Provider;
