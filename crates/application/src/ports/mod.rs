//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod album_store;
mod artist_store;
mod database_health_port;
mod genre_store;
mod pagination;
mod password_hasher_port;
mod playlist_store;
mod session_store;
mod song_store;
mod user_store;

use domain::{ArtistId, GenreId};

#[cfg(test)]
pub use album_store::MockAlbumStore;
pub use album_store::AlbumStore;
#[cfg(test)]
pub use artist_store::MockArtistStore;
pub use artist_store::ArtistStore;
#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use genre_store::MockGenreStore;
pub use genre_store::GenreStore;
pub use pagination::{ListQuery, Page, Pagination};
#[cfg(test)]
pub use password_hasher_port::MockPasswordHasherPort;
pub use password_hasher_port::PasswordHasherPort;
#[cfg(test)]
pub use playlist_store::MockPlaylistStore;
pub use playlist_store::PlaylistStore;
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::SessionStore;
#[cfg(test)]
pub use song_store::MockSongStore;
pub use song_store::SongStore;
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserCredentials, UserStore};

/// Artists and genres an album or song is linked to on creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogLinks {
    pub artist_ids: Vec<ArtistId>,
    pub genre_ids: Vec<GenreId>,
}

impl CatalogLinks {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artist_ids.is_empty() && self.genre_ids.is_empty()
    }
}
