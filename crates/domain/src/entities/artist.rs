//! Artist entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ArtistId, Slug, UserId};

/// A performing artist or band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub slug: Slug,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub website: Option<String>,
    pub spotify_url: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<i32>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an artist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub website: Option<String>,
    pub spotify_url: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<i32>,
}

impl Artist {
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: ArtistId::new(),
            slug: Slug::from_name(&name),
            name,
            bio: None,
            image: None,
            website: None,
            spotify_url: None,
            country: None,
            debut_year: None,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update made by `by`
    pub fn apply(&mut self, changes: ArtistChanges, by: UserId) {
        if let Some(name) = changes.name {
            self.slug = Slug::from_name(&name);
            self.name = name;
        }
        set_if_some(&mut self.bio, changes.bio);
        set_if_some(&mut self.image, changes.image);
        set_if_some(&mut self.website, changes.website);
        set_if_some(&mut self.spotify_url, changes.spotify_url);
        set_if_some(&mut self.country, changes.country);
        if changes.debut_year.is_some() {
            self.debut_year = changes.debut_year;
        }
        self.updated_by = by;
        self.updated_at = Utc::now();
    }
}

fn set_if_some(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_artist_has_slug() {
        let artist = Artist::new("Taylor Swift", UserId::new());
        assert_eq!(artist.slug.as_str(), "taylor-swift");
        assert!(artist.debut_year.is_none());
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut artist = Artist::new("Björk", UserId::new());
        artist.country = Some("Iceland".to_string());
        artist.apply(
            ArtistChanges {
                debut_year: Some(1977),
                ..Default::default()
            },
            UserId::new(),
        );
        assert_eq!(artist.country.as_deref(), Some("Iceland"));
        assert_eq!(artist.debut_year, Some(1977));
        assert_eq!(artist.name, "Björk");
    }
}
