//! Genre persistence port

use async_trait::async_trait;
use domain::{Attributed, Genre, GenreId};
#[cfg(test)]
use mockall::automock;

use super::pagination::{ListQuery, Page};
use crate::error::ApplicationError;

/// Port for genre persistence
///
/// Reads return the genre together with its creator. Writes surface
/// constraint failures as [`ApplicationError::Database`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// List genres ordered by name, filtered on name and description
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Genre>>, ApplicationError>;

    async fn get(&self, id: &GenreId) -> Result<Option<Attributed<Genre>>, ApplicationError>;

    async fn insert(&self, genre: &Genre) -> Result<(), ApplicationError>;

    /// Overwrite a stored genre; a missing row is a record-not-found error
    async fn update(&self, genre: &Genre) -> Result<(), ApplicationError>;

    async fn delete(&self, id: &GenreId) -> Result<(), ApplicationError>;

    /// Number of albums and songs tagged with the genre
    async fn usage_count(&self, id: &GenreId) -> Result<u64, ApplicationError>;
}
