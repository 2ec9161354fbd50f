//! URL slug value object
//!
//! Slugs are derived from a display name: lower-cased, every run of
//! characters outside `[a-z0-9]` collapsed to a single `-`, and leading or
//! trailing dashes removed. The catalog stores them under a UNIQUE index, so
//! two records whose names slug to the same value collide.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A URL-safe identifier derived from a name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a human-readable name
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::Slug;
    ///
    /// assert_eq!(Slug::from_name("Shake It Off").as_str(), "shake-it-off");
    /// assert_eq!(Slug::from_name("  AC/DC!! ").as_str(), "ac-dc");
    /// ```
    pub fn from_name(name: &str) -> Self {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for ch in name.chars().flat_map(char::to_lowercase) {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(ch);
            } else {
                pending_dash = true;
            }
        }

        Self(slug)
    }

    /// Wrap a slug read back from storage
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the slug as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name contained no slug-able characters at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_title() {
        assert_eq!(Slug::from_name("Rock").as_str(), "rock");
    }

    #[test]
    fn collapses_punctuation_runs() {
        assert_eq!(
            Slug::from_name("1989 (Taylor's Version)").as_str(),
            "1989-taylor-s-version"
        );
    }

    #[test]
    fn trims_edges() {
        assert_eq!(Slug::from_name("--Hello--").as_str(), "hello");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(Slug::from_name("Björk Live").as_str(), "bj-rk-live");
    }

    #[test]
    fn only_symbols_gives_empty_slug() {
        assert!(Slug::from_name("!!!").is_empty());
    }
}
