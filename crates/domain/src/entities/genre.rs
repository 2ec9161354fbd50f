//! Genre entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{GenreId, Slug, UserId};

/// A musical genre used to tag albums and songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    /// Hex colour such as `#FF5722`
    pub color: Option<String>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a genre. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl Genre {
    /// Create a new genre; the slug is derived from the name
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: GenreId::new(),
            slug: Slug::from_name(&name),
            name,
            description: None,
            color: None,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Apply a partial update made by `by`
    pub fn apply(&mut self, changes: GenreChanges, by: UserId) {
        if let Some(name) = changes.name {
            self.slug = Slug::from_name(&name);
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(color) = changes.color {
            self.color = Some(color);
        }
        self.updated_by = by;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_follows_name() {
        let genre = Genre::new("Hip Hop", UserId::new());
        assert_eq!(genre.slug.as_str(), "hip-hop");
    }

    #[test]
    fn rename_regenerates_slug() {
        let owner = UserId::new();
        let editor = UserId::new();
        let mut genre = Genre::new("Rock", owner);
        genre.apply(
            GenreChanges {
                name: Some("Hard Rock".to_string()),
                ..Default::default()
            },
            editor,
        );
        assert_eq!(genre.slug.as_str(), "hard-rock");
        assert_eq!(genre.created_by, owner);
        assert_eq!(genre.updated_by, editor);
    }

    #[test]
    fn absent_fields_are_untouched() {
        let mut genre = Genre::new("Jazz", UserId::new()).with_color(Some("#112233".to_string()));
        genre.apply(
            GenreChanges {
                description: Some("Swing".to_string()),
                ..Default::default()
            },
            UserId::new(),
        );
        assert_eq!(genre.name, "Jazz");
        assert_eq!(genre.color.as_deref(), Some("#112233"));
        assert_eq!(genre.description.as_deref(), Some("Swing"));
    }
}
