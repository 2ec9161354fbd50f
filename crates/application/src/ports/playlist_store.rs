//! Playlist persistence port

use async_trait::async_trait;
use domain::{Playlist, PlaylistId, PlaylistItem, PlaylistItemId, SongId};
#[cfg(test)]
use mockall::automock;

use super::pagination::{ListQuery, Page};
use crate::error::ApplicationError;

/// Port for playlists and their items
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// List playlists ordered by name, filtered on name and description
    async fn list(&self, query: &ListQuery) -> Result<Page<Playlist>, ApplicationError>;

    async fn get(&self, id: &PlaylistId) -> Result<Option<Playlist>, ApplicationError>;

    async fn insert(&self, playlist: &Playlist) -> Result<(), ApplicationError>;

    async fn update(&self, playlist: &Playlist) -> Result<(), ApplicationError>;

    /// Delete the playlist and its items
    async fn delete(&self, id: &PlaylistId) -> Result<(), ApplicationError>;

    /// Items ordered by position
    async fn items(&self, id: &PlaylistId) -> Result<Vec<PlaylistItem>, ApplicationError>;

    async fn item_count(&self, id: &PlaylistId) -> Result<u64, ApplicationError>;

    async fn find_item(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> Result<Option<PlaylistItem>, ApplicationError>;

    /// Add an item; a song already in the playlist is a unique-constraint error
    async fn add_item(&self, item: &PlaylistItem) -> Result<(), ApplicationError>;

    async fn remove_item(&self, id: &PlaylistItemId) -> Result<(), ApplicationError>;
}
