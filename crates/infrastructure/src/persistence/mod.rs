//! Persistence module
//!
//! SQLite storage via sqlx for the catalog, users, sessions and playlists.

mod album_store;
mod artist_store;
pub mod database;
mod database_health;
pub mod error;
mod genre_store;
mod playlist_store;
mod session_store;
mod song_store;
mod sql;
mod user_store;

pub use album_store::SqliteAlbumStore;
pub use artist_store::SqliteArtistStore;
pub use database::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use error::map_sqlx_error;
pub use genre_store::SqliteGenreStore;
pub use playlist_store::SqlitePlaylistStore;
pub use session_store::SqliteSessionStore;
pub use song_store::SqliteSongStore;
pub use user_store::SqliteUserStore;
