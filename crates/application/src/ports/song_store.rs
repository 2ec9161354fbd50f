//! Song persistence port

use async_trait::async_trait;
use domain::{Attributed, Song, SongId};
#[cfg(test)]
use mockall::automock;

use super::{
    CatalogLinks,
    pagination::{ListQuery, Page},
};
use crate::error::ApplicationError;

/// Port for song persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SongStore: Send + Sync {
    /// List songs ordered by title, filtered on title and lyrics
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Song>>, ApplicationError>;

    async fn get(&self, id: &SongId) -> Result<Option<Attributed<Song>>, ApplicationError>;

    async fn insert(&self, song: &Song, links: &CatalogLinks) -> Result<(), ApplicationError>;

    async fn update(&self, song: &Song) -> Result<(), ApplicationError>;

    async fn delete(&self, id: &SongId) -> Result<(), ApplicationError>;
}
