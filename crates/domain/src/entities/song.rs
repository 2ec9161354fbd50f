//! Song entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AlbumId, Slug, SongId, UserId};

/// A song with its lyrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub slug: Slug,
    pub lyrics: String,
    /// Length in seconds
    pub duration: Option<i32>,
    pub track_number: Option<i32>,
    pub album_id: Option<AlbumId>,
    pub release_date: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub is_explicit: bool,
    pub is_published: bool,
    pub lyrics_source: Option<String>,
    pub lyrics_verified: bool,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub view_count: i64,
    pub favorite_count: i64,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a song
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongChanges {
    pub title: Option<String>,
    pub lyrics: Option<String>,
    pub duration: Option<i32>,
    pub track_number: Option<i32>,
    pub album_id: Option<AlbumId>,
    pub release_date: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub is_explicit: Option<bool>,
    pub is_published: Option<bool>,
    pub lyrics_source: Option<String>,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub apple_music_url: Option<String>,
}

impl Song {
    #[must_use]
    pub fn new(title: impl Into<String>, lyrics: impl Into<String>, created_by: UserId) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: SongId::new(),
            slug: Slug::from_name(&title),
            title,
            lyrics: lyrics.into(),
            duration: None,
            track_number: None,
            album_id: None,
            release_date: None,
            language: None,
            is_explicit: false,
            is_published: false,
            lyrics_source: None,
            lyrics_verified: false,
            spotify_url: None,
            youtube_url: None,
            apple_music_url: None,
            view_count: 0,
            favorite_count: 0,
            created_by,
            updated_by: created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update made by `by`
    pub fn apply(&mut self, changes: SongChanges, by: UserId) {
        if let Some(title) = changes.title {
            self.slug = Slug::from_name(&title);
            self.title = title;
        }
        if let Some(lyrics) = changes.lyrics {
            self.lyrics = lyrics;
        }
        replace(&mut self.duration, changes.duration);
        replace(&mut self.track_number, changes.track_number);
        replace(&mut self.album_id, changes.album_id);
        replace(&mut self.release_date, changes.release_date);
        replace(&mut self.language, changes.language);
        replace(&mut self.lyrics_source, changes.lyrics_source);
        replace(&mut self.spotify_url, changes.spotify_url);
        replace(&mut self.youtube_url, changes.youtube_url);
        replace(&mut self.apple_music_url, changes.apple_music_url);
        if let Some(explicit) = changes.is_explicit {
            self.is_explicit = explicit;
        }
        if let Some(published) = changes.is_published {
            self.is_published = published;
        }
        self.updated_by = by;
        self.updated_at = Utc::now();
    }
}

fn replace<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_song_is_unpublished() {
        let song = Song::new("Shake It Off", "I stay out too late", UserId::new());
        assert_eq!(song.slug.as_str(), "shake-it-off");
        assert!(!song.is_published);
        assert!(!song.is_explicit);
        assert_eq!(song.view_count, 0);
    }

    #[test]
    fn publish_and_move_to_album() {
        let album = AlbumId::new();
        let mut song = Song::new("Style", "Midnight", UserId::new());
        song.apply(
            SongChanges {
                album_id: Some(album),
                is_published: Some(true),
                ..Default::default()
            },
            UserId::new(),
        );
        assert_eq!(song.album_id, Some(album));
        assert!(song.is_published);
        assert_eq!(song.title, "Style");
    }
}
