//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on SQLite (via sqlx) and Argon2, and
//! owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::{Argon2PasswordHasher, PasswordHashError};
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, LogFormat, ServerConfig,
    TelemetryAppConfig,
};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteAlbumStore, SqliteArtistStore,
    SqliteDatabaseHealth, SqliteGenreStore, SqlitePlaylistStore, SqliteSessionStore,
    SqliteSongStore, SqliteUserStore, map_sqlx_error,
};
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
