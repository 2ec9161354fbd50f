//! Album service

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{Album, AlbumChanges, AlbumId, AlbumType, Attributed, User, UserId};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{AlbumStore, CatalogLinks, ListQuery, Page},
};

/// Input for creating an album
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAlbum {
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub album_type: AlbumType,
    pub total_tracks: Option<i32>,
    pub links: CatalogLinks,
}

/// Service for managing albums
#[derive(Clone)]
pub struct AlbumService {
    store: Arc<dyn AlbumStore>,
}

impl fmt::Debug for AlbumService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlbumService").finish_non_exhaustive()
    }
}

impl AlbumService {
    #[must_use]
    pub fn new(store: Arc<dyn AlbumStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<Page<Attributed<Album>>, ApplicationError> {
        self.store.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &AlbumId) -> Result<Attributed<Album>, ApplicationError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Album"))
    }

    #[instrument(skip(self, input, creator), fields(title = %input.title, links = input.links.artist_ids.len() + input.links.genre_ids.len()))]
    pub async fn create(
        &self,
        input: NewAlbum,
        creator: &User,
    ) -> Result<Attributed<Album>, ApplicationError> {
        let mut album = Album::new(input.title, creator.id);
        album.description = input.description;
        album.cover_image = input.cover_image;
        album.release_date = input.release_date;
        album.album_type = input.album_type;
        album.total_tracks = input.total_tracks;

        self.store.insert(&album, &input.links).await?;

        info!(id = %album.id, slug = %album.slug, "Album created");
        Ok(Attributed {
            record: album,
            creator: creator.as_creator(),
        })
    }

    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        id: &AlbumId,
        changes: AlbumChanges,
        editor: UserId,
    ) -> Result<Attributed<Album>, ApplicationError> {
        let Attributed {
            record: mut album,
            creator,
        } = self.get(id).await?;

        album.apply(changes, editor);
        self.store.update(&album).await?;

        Ok(Attributed {
            record: album,
            creator,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &AlbumId) -> Result<(), ApplicationError> {
        self.get(id).await?;

        if self.store.song_count(id).await? > 0 {
            return Err(ApplicationError::InvalidOperation(
                "Cannot delete album with associated songs".to_string(),
            ));
        }

        self.store.delete(id).await?;
        info!(%id, "Album deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use domain::{ArtistId, EmailAddress};

    use super::*;
    use crate::{
        db_error::{DatabaseError, DbErrorCode},
        ports::MockAlbumStore,
    };

    fn user() -> User {
        User::new(EmailAddress::new("a@r.io").unwrap())
    }

    #[tokio::test]
    async fn create_passes_links_to_store() {
        let artist = ArtistId::new();
        let mut store = MockAlbumStore::new();
        store
            .expect_insert()
            .withf(move |album, links| {
                album.album_type == AlbumType::Ep && links.artist_ids == vec![artist]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = AlbumService::new(Arc::new(store));
        let created = service
            .create(
                NewAlbum {
                    title: "Tiny Changes".to_string(),
                    album_type: AlbumType::Ep,
                    links: CatalogLinks {
                        artist_ids: vec![artist],
                        genre_ids: vec![],
                    },
                    ..Default::default()
                },
                &user(),
            )
            .await
            .unwrap();

        assert_eq!(created.record.slug.as_str(), "tiny-changes");
    }

    #[tokio::test]
    async fn dangling_link_is_foreign_key_error() {
        let mut store = MockAlbumStore::new();
        store.expect_insert().returning(|_, _| {
            Err(DatabaseError::new(DbErrorCode::ForeignKeyConstraint).into())
        });

        let service = AlbumService::new(Arc::new(store));
        let err = service
            .create(
                NewAlbum {
                    title: "Ghost".to_string(),
                    ..Default::default()
                },
                &user(),
            )
            .await
            .unwrap_err();

        assert!(err.is_db_code(&DbErrorCode::ForeignKeyConstraint));
    }

    #[tokio::test]
    async fn delete_refuses_album_with_songs() {
        let owner = user();
        let existing = Attributed {
            record: Album::new("1989", owner.id),
            creator: owner.as_creator(),
        };
        let id = existing.record.id;

        let mut store = MockAlbumStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        store.expect_song_count().returning(|_| Ok(13));
        store.expect_delete().never();

        let service = AlbumService::new(Arc::new(store));
        let err = service.delete(&id).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete album with associated songs");
    }

    #[tokio::test]
    async fn delete_missing_album() {
        let mut store = MockAlbumStore::new();
        store.expect_get().returning(|_| Ok(None));

        let service = AlbumService::new(Arc::new(store));
        let err = service.delete(&AlbumId::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Album not found");
    }
}
