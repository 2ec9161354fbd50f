//! Album release type

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Kind of release an album represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlbumType {
    #[default]
    Album,
    Lp,
    Single,
    Ep,
    Compilation,
    Soundtrack,
    Mixtape,
    Demo,
    Live,
    Remix,
    GreatestHits,
    Bootleg,
}

impl AlbumType {
    /// All album types, in display order
    pub const ALL: [Self; 12] = [
        Self::Album,
        Self::Lp,
        Self::Single,
        Self::Ep,
        Self::Compilation,
        Self::Soundtrack,
        Self::Mixtape,
        Self::Demo,
        Self::Live,
        Self::Remix,
        Self::GreatestHits,
        Self::Bootleg,
    ];

    /// Stored/serialized form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "ALBUM",
            Self::Lp => "LP",
            Self::Single => "SINGLE",
            Self::Ep => "EP",
            Self::Compilation => "COMPILATION",
            Self::Soundtrack => "SOUNDTRACK",
            Self::Mixtape => "MIXTAPE",
            Self::Demo => "DEMO",
            Self::Live => "LIVE",
            Self::Remix => "REMIX",
            Self::GreatestHits => "GREATEST_HITS",
            Self::Bootleg => "BOOTLEG",
        }
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Lp => "LP (Long Play)",
            Self::Single => "Single",
            Self::Ep => "EP (Extended Play)",
            Self::Compilation => "Compilation",
            Self::Soundtrack => "Soundtrack",
            Self::Mixtape => "Mixtape",
            Self::Demo => "Demo",
            Self::Live => "Live",
            Self::Remix => "Remix",
            Self::GreatestHits => "Greatest Hits",
            Self::Bootleg => "Bootleg",
        }
    }
}

impl fmt::Display for AlbumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AlbumType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::InvalidAlbumType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_album() {
        assert_eq!(AlbumType::default(), AlbumType::Album);
    }

    #[test]
    fn stored_form_parses_back() {
        for t in AlbumType::ALL {
            assert_eq!(t.as_str().parse::<AlbumType>().unwrap(), t);
        }
    }

    #[test]
    fn serde_matches_stored_form() {
        let json = serde_json::to_string(&AlbumType::GreatestHits).unwrap();
        assert_eq!(json, "\"GREATEST_HITS\"");
    }

    #[test]
    fn unknown_type_rejected() {
        assert!("CASSETTE".parse::<AlbumType>().is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(AlbumType::Ep.label(), "EP (Extended Play)");
        assert_eq!(AlbumType::Lp.to_string(), "LP (Long Play)");
    }
}
