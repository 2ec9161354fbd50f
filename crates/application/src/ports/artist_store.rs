//! Artist persistence port

use async_trait::async_trait;
use domain::{Artist, ArtistId, Attributed, Slug};
#[cfg(test)]
use mockall::automock;

use super::pagination::{ListQuery, Page};
use crate::error::ApplicationError;

/// Port for artist persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtistStore: Send + Sync {
    /// List artists ordered by name, filtered on name and bio
    async fn list(&self, query: &ListQuery)
    -> Result<Page<Attributed<Artist>>, ApplicationError>;

    async fn get(&self, id: &ArtistId) -> Result<Option<Attributed<Artist>>, ApplicationError>;

    async fn get_by_slug(&self, slug: &Slug)
    -> Result<Option<Attributed<Artist>>, ApplicationError>;

    async fn insert(&self, artist: &Artist) -> Result<(), ApplicationError>;

    async fn update(&self, artist: &Artist) -> Result<(), ApplicationError>;

    async fn delete(&self, id: &ArtistId) -> Result<(), ApplicationError>;

    /// Number of albums and songs credited to the artist
    async fn usage_count(&self, id: &ArtistId) -> Result<u64, ApplicationError>;
}
