//! Artist service
//!
//! Artists are looked up by slug for reads and updates and by id for deletes.

use std::{fmt, sync::Arc};

use domain::{Artist, ArtistChanges, ArtistId, Attributed, Slug, User, UserId};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{ArtistStore, ListQuery, Page},
};

/// Input for creating an artist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub website: Option<String>,
    pub spotify_url: Option<String>,
    pub country: Option<String>,
    pub debut_year: Option<i32>,
}

/// Service for managing artists
#[derive(Clone)]
pub struct ArtistService {
    store: Arc<dyn ArtistStore>,
}

impl fmt::Debug for ArtistService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtistService").finish_non_exhaustive()
    }
}

impl ArtistService {
    #[must_use]
    pub fn new(store: Arc<dyn ArtistStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<Page<Attributed<Artist>>, ApplicationError> {
        self.store.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Attributed<Artist>, ApplicationError> {
        self.store
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Artist"))
    }

    #[instrument(skip(self, input, creator), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: NewArtist,
        creator: &User,
    ) -> Result<Attributed<Artist>, ApplicationError> {
        let mut artist = Artist::new(input.name, creator.id);
        artist.bio = input.bio;
        artist.image = input.image;
        artist.website = input.website;
        artist.spotify_url = input.spotify_url;
        artist.country = input.country;
        artist.debut_year = input.debut_year;

        self.store.insert(&artist).await?;

        info!(id = %artist.id, slug = %artist.slug, "Artist created");
        Ok(Attributed {
            record: artist,
            creator: creator.as_creator(),
        })
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        slug: &Slug,
        changes: ArtistChanges,
        editor: UserId,
    ) -> Result<Attributed<Artist>, ApplicationError> {
        let Attributed {
            record: mut artist,
            creator,
        } = self.get_by_slug(slug).await?;

        artist.apply(changes, editor);
        self.store.update(&artist).await?;

        Ok(Attributed {
            record: artist,
            creator,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ArtistId) -> Result<(), ApplicationError> {
        if self.store.get(id).await?.is_none() {
            return Err(ApplicationError::not_found("Artist"));
        }

        if self.store.usage_count(id).await? > 0 {
            return Err(ApplicationError::InvalidOperation(
                "Cannot delete artist with associated songs or albums".to_string(),
            ));
        }

        self.store.delete(id).await?;
        info!(%id, "Artist deleted");
        Ok(())
    }
}
