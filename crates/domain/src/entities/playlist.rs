//! Playlist and playlist item entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{PlaylistId, PlaylistItemId, SongId, UserId};

/// A user-curated, ordered list of songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: bool,
    /// Owner
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: Option<bool>,
}

impl Playlist {
    #[must_use]
    pub fn new(name: impl Into<String>, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::new(),
            name: name.into(),
            description: None,
            cover_image: None,
            is_public: true,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: PlaylistChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.cover_image.is_some() {
            self.cover_image = changes.cover_image;
        }
        if let Some(is_public) = changes.is_public {
            self.is_public = is_public;
        }
        self.updated_at = Utc::now();
    }
}

/// A song placed in a playlist. A song appears at most once per playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: PlaylistItemId,
    pub playlist_id: PlaylistId,
    pub song_id: SongId,
    /// 1-based position
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl PlaylistItem {
    #[must_use]
    pub fn new(playlist_id: PlaylistId, song_id: SongId, position: i32) -> Self {
        Self {
            id: PlaylistItemId::new(),
            playlist_id,
            song_id,
            position,
            created_at: Utc::now(),
        }
    }
}
