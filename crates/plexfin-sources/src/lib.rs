pub mod error;
pub mod jellyfin;
pub mod plex;
pub mod traits;

pub use error::SourceError;
pub use jellyfin::JellyfinClient;
pub use plex::{PlexClient, PlexItem};
pub use traits::MarkWatched;
