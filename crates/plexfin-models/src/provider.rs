use serde::{Deserialize, Serialize};
use std::fmt;

/// External metadata providers shared by both servers.
///
/// Plex names its metadata agents one way (`imdb`, `themoviedb`, `thetvdb`),
/// Jellyfin keys its `ProviderIds` map another way (`Imdb`, `Tmdb`, `Tvdb`).
/// This enum is the normalized vocabulary used for matching; the translation
/// table between the two spellings lives here so nothing else has to know
/// about either server's naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Imdb,
    Tmdb,
    Tvdb,
}

impl Provider {
    /// All providers, in the order agents are probed on a Plex item.
    pub const ALL: [Provider; 3] = [Provider::Imdb, Provider::Tmdb, Provider::Tvdb];

    /// Map a Plex agent name to a provider. Unrecognized agents yield `None`
    /// and the caller treats the identity as unmatchable.
    pub fn from_plex_agent(agent: &str) -> Option<Self> {
        match agent {
            "imdb" => Some(Provider::Imdb),
            "themoviedb" => Some(Provider::Tmdb),
            "thetvdb" => Some(Provider::Tvdb),
            _ => None,
        }
    }

    /// The exact key Jellyfin uses in an item's `ProviderIds` map.
    pub fn as_jellyfin_key(&self) -> &'static str {
        match self {
            Provider::Imdb => "Imdb",
            Provider::Tmdb => "Tmdb",
            Provider::Tvdb => "Tvdb",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_jellyfin_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_plex_agent_known() {
        assert_eq!(Provider::from_plex_agent("imdb"), Some(Provider::Imdb));
        assert_eq!(Provider::from_plex_agent("themoviedb"), Some(Provider::Tmdb));
        assert_eq!(Provider::from_plex_agent("thetvdb"), Some(Provider::Tvdb));
    }

    #[test]
    fn test_from_plex_agent_unknown() {
        assert_eq!(Provider::from_plex_agent("none"), None);
        assert_eq!(Provider::from_plex_agent("localmedia"), None);
        assert_eq!(Provider::from_plex_agent(""), None);
    }

    #[test]
    fn test_jellyfin_keys() {
        assert_eq!(Provider::Imdb.as_jellyfin_key(), "Imdb");
        assert_eq!(Provider::Tmdb.as_jellyfin_key(), "Tmdb");
        assert_eq!(Provider::Tvdb.as_jellyfin_key(), "Tvdb");
    }
}
