//! Genre service
//!
//! CRUD orchestration for genres. Deleting a genre that still tags albums
//! or songs is refused.

use std::{fmt, sync::Arc};

use domain::{Attributed, Genre, GenreChanges, GenreId, User, UserId};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{GenreStore, ListQuery, Page},
};

/// Input for creating a genre
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGenre {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Service for managing genres
#[derive(Clone)]
pub struct GenreService {
    store: Arc<dyn GenreStore>,
}

impl fmt::Debug for GenreService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenreService").finish_non_exhaustive()
    }
}

impl GenreService {
    #[must_use]
    pub fn new(store: Arc<dyn GenreStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<Page<Attributed<Genre>>, ApplicationError> {
        self.store.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &GenreId) -> Result<Attributed<Genre>, ApplicationError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Genre"))
    }

    #[instrument(skip(self, input, creator), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: NewGenre,
        creator: &User,
    ) -> Result<Attributed<Genre>, ApplicationError> {
        let genre = Genre::new(input.name, creator.id)
            .with_description(input.description)
            .with_color(input.color);

        self.store.insert(&genre).await?;

        info!(id = %genre.id, slug = %genre.slug, "Genre created");
        Ok(Attributed {
            record: genre,
            creator: creator.as_creator(),
        })
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: &GenreId,
        changes: GenreChanges,
        editor: UserId,
    ) -> Result<Attributed<Genre>, ApplicationError> {
        let Attributed {
            record: mut genre,
            creator,
        } = self.get(id).await?;

        genre.apply(changes, editor);
        self.store.update(&genre).await?;

        debug!(id = %genre.id, "Genre updated");
        Ok(Attributed {
            record: genre,
            creator,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &GenreId) -> Result<(), ApplicationError> {
        self.get(id).await?;

        if self.store.usage_count(id).await? > 0 {
            return Err(ApplicationError::InvalidOperation(
                "Cannot delete genre with associated songs or albums".to_string(),
            ));
        }

        self.store.delete(id).await?;
        info!(%id, "Genre deleted");
        Ok(())
    }
}
