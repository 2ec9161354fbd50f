//! Album entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AlbumId, AlbumType, Slug, UserId};

/// A release grouping songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub album_type: AlbumType,
    pub total_tracks: Option<i32>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an album
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub album_type: Option<AlbumType>,
    pub total_tracks: Option<i32>,
}

impl Album {
    #[must_use]
    pub fn new(title: impl Into<String>, created_by: UserId) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: AlbumId::new(),
            slug: Slug::from_name(&title),
            title,
            description: None,
            cover_image: None,
            release_date: None,
            album_type: AlbumType::default(),
            total_tracks: None,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update made by `by`
    pub fn apply(&mut self, changes: AlbumChanges, by: UserId) {
        if let Some(title) = changes.title {
            self.slug = Slug::from_name(&title);
            self.title = title;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.cover_image.is_some() {
            self.cover_image = changes.cover_image;
        }
        if changes.release_date.is_some() {
            self.release_date = changes.release_date;
        }
        if let Some(album_type) = changes.album_type {
            self.album_type = album_type;
        }
        if changes.total_tracks.is_some() {
            self.total_tracks = changes.total_tracks;
        }
        self.updated_by = by;
        self.updated_at = Utc::now();
    }
}
