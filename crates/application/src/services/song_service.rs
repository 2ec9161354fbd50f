//! Song service

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{AlbumId, Attributed, Song, SongChanges, SongId, User, UserId};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{CatalogLinks, ListQuery, Page, SongStore},
};

/// Input for creating a song
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub lyrics: String,
    pub duration: Option<i32>,
    pub track_number: Option<i32>,
    pub album_id: Option<AlbumId>,
    pub release_date: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub is_explicit: bool,
    pub is_published: bool,
    pub lyrics_source: Option<String>,
    pub spotify_url: Option<String>,
    pub youtube_url: Option<String>,
    pub apple_music_url: Option<String>,
    pub links: CatalogLinks,
}

/// Service for managing songs
#[derive(Clone)]
pub struct SongService {
    store: Arc<dyn SongStore>,
}

impl fmt::Debug for SongService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SongService").finish_non_exhaustive()
    }
}

impl SongService {
    #[must_use]
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<Page<Attributed<Song>>, ApplicationError> {
        self.store.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &SongId) -> Result<Attributed<Song>, ApplicationError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Song"))
    }

    #[instrument(skip(self, input, creator), fields(title = %input.title))]
    pub async fn create(
        &self,
        input: NewSong,
        creator: &User,
    ) -> Result<Attributed<Song>, ApplicationError> {
        let mut song = Song::new(input.title, input.lyrics, creator.id);
        song.duration = input.duration;
        song.track_number = input.track_number;
        song.album_id = input.album_id;
        song.release_date = input.release_date;
        song.language = input.language;
        song.is_explicit = input.is_explicit;
        song.is_published = input.is_published;
        song.lyrics_source = input.lyrics_source;
        song.spotify_url = input.spotify_url;
        song.youtube_url = input.youtube_url;
        song.apple_music_url = input.apple_music_url;

        self.store.insert(&song, &input.links).await?;

        info!(id = %song.id, slug = %song.slug, "Song created");
        Ok(Attributed {
            record: song,
            creator: creator.as_creator(),
        })
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: &SongId,
        changes: SongChanges,
        editor: UserId,
    ) -> Result<Attributed<Song>, ApplicationError> {
        let Attributed {
            record: mut song,
            creator,
        } = self.get(id).await?;

        song.apply(changes, editor);
        self.store.update(&song).await?;

        Ok(Attributed {
            record: song,
            creator,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &SongId) -> Result<(), ApplicationError> {
        self.get(id).await?;
        self.store.delete(id).await?;
        info!(%id, "Song deleted");
        Ok(())
    }
}
