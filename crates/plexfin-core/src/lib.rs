pub mod cache;
pub mod extract;
pub mod index;
pub mod reconcile;
pub mod report;
pub mod translate;

pub use cache::CacheManager;
pub use extract::{collect_watched, extract_provider, UnmatchedItemError};
pub use index::LibraryIndex;
pub use reconcile::{MigrateOptions, Migrator};
pub use report::RunReport;
pub use translate::{parse_path_map, translate_path, PathTranslation};
