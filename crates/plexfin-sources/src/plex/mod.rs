pub mod api;
pub mod client;

pub use api::{MediaKind, PlexItem};
pub use client::PlexClient;
