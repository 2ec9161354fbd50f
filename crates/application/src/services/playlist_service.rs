//! Playlist service
//!
//! Playlists belong to a user and hold an ordered list of songs. Adding a
//! song without a position appends it after the current last item.

use std::{fmt, sync::Arc};

use domain::{Playlist, PlaylistChanges, PlaylistId, PlaylistItem, SongId, User, UserId};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{ListQuery, Page, PlaylistStore, SongStore},
};

/// Input for creating a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlaylist {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub is_public: bool,
    /// Owner; defaults to the user creating the playlist
    pub user_id: Option<UserId>,
}

/// A playlist with its items in position order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDetails {
    pub playlist: Playlist,
    pub items: Vec<PlaylistItem>,
}

/// Service for managing playlists
#[derive(Clone)]
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistStore>,
    songs: Arc<dyn SongStore>,
}

impl fmt::Debug for PlaylistService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistService").finish_non_exhaustive()
    }
}

impl PlaylistService {
    #[must_use]
    pub fn new(playlists: Arc<dyn PlaylistStore>, songs: Arc<dyn SongStore>) -> Self {
        Self { playlists, songs }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<Playlist>, ApplicationError> {
        self.playlists.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &PlaylistId) -> Result<PlaylistDetails, ApplicationError> {
        let playlist = self.find(id).await?;
        let items = self.playlists.items(id).await?;
        Ok(PlaylistDetails { playlist, items })
    }

    #[instrument(skip(self, input, creator), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: NewPlaylist,
        creator: &User,
    ) -> Result<Playlist, ApplicationError> {
        let mut playlist = Playlist::new(input.name, input.user_id.unwrap_or(creator.id));
        playlist.description = input.description;
        playlist.cover_image = input.cover_image;
        playlist.is_public = input.is_public;

        self.playlists.insert(&playlist).await?;

        info!(id = %playlist.id, owner = %playlist.user_id, "Playlist created");
        Ok(playlist)
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: &PlaylistId,
        changes: PlaylistChanges,
    ) -> Result<Playlist, ApplicationError> {
        let mut playlist = self.find(id).await?;
        playlist.apply(changes);
        self.playlists.update(&playlist).await?;
        Ok(playlist)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &PlaylistId) -> Result<(), ApplicationError> {
        self.find(id).await?;
        self.playlists.delete(id).await?;
        info!(%id, "Playlist deleted");
        Ok(())
    }

    /// Add a song, at `position` or at the end
    #[instrument(skip(self))]
    pub async fn add_song(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
        position: Option<i32>,
    ) -> Result<PlaylistItem, ApplicationError> {
        self.find(playlist_id).await?;

        if self.songs.get(song_id).await?.is_none() {
            return Err(ApplicationError::not_found("Song"));
        }

        let position = match position {
            Some(position) => position,
            None => {
                let count = self.playlists.item_count(playlist_id).await?;
                i32::try_from(count + 1).map_err(|_| {
                    ApplicationError::InvalidOperation("Playlist is full".to_string())
                })?
            },
        };

        let item = PlaylistItem::new(*playlist_id, *song_id, position);
        self.playlists.add_item(&item).await?;

        debug!(item = %item.id, position, "Song added to playlist");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn remove_song(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> Result<(), ApplicationError> {
        let item = self
            .playlists
            .find_item(playlist_id, song_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound("Song not found in playlist".to_string()))?;

        self.playlists.remove_item(&item.id).await?;
        Ok(())
    }

    async fn find(&self, id: &PlaylistId) -> Result<Playlist, ApplicationError> {
        self.playlists
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Playlist"))
    }
}
