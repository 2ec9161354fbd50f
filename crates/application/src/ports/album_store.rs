//! Album persistence port

use async_trait::async_trait;
use domain::{Album, AlbumId, Attributed};
#[cfg(test)]
use mockall::automock;

use super::{
    CatalogLinks,
    pagination::{ListQuery, Page},
};
use crate::error::ApplicationError;

/// Port for album persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// List albums ordered by title, filtered on title and description
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Album>>, ApplicationError>;

    async fn get(&self, id: &AlbumId) -> Result<Option<Attributed<Album>>, ApplicationError>;

    /// Insert the album and link it to the given artists and genres in one transaction
    async fn insert(&self, album: &Album, links: &CatalogLinks) -> Result<(), ApplicationError>;

    async fn update(&self, album: &Album) -> Result<(), ApplicationError>;

    async fn delete(&self, id: &AlbumId) -> Result<(), ApplicationError>;

    /// Number of songs on the album
    async fn song_count(&self, id: &AlbumId) -> Result<u64, ApplicationError>;
}
