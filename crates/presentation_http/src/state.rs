//! Application state shared across handlers

use std::sync::Arc;

use application::{
    AlbumService, ArtistService, AuthService, AuthServiceConfig, GenreService, HealthService,
    PasswordHasherPort, PlaylistService, SongService, SongStore, UserService, UserStore,
};
use infrastructure::{
    AppConfig, Argon2PasswordHasher, AsyncDatabase, SqliteAlbumStore, SqliteArtistStore,
    SqliteDatabaseHealth, SqliteGenreStore, SqlitePlaylistStore, SqliteSessionStore,
    SqliteSongStore, SqliteUserStore,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub genres: Arc<GenreService>,
    pub artists: Arc<ArtistService>,
    pub albums: Arc<AlbumService>,
    pub songs: Arc<SongService>,
    pub playlists: Arc<PlaylistService>,
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
    /// Readiness checks for `/ready`
    pub health: Arc<HealthService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire every service to the SQLite stores of `database`
    #[must_use]
    pub fn from_database(database: &AsyncDatabase, config: AppConfig) -> Self {
        let pool = database.pool().clone();

        let users: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new(pool.clone()));
        let songs: Arc<dyn SongStore> = Arc::new(SqliteSongStore::new(pool.clone()));
        let hasher: Arc<dyn PasswordHasherPort> = Arc::new(Argon2PasswordHasher::new());

        Self {
            genres: Arc::new(GenreService::new(Arc::new(SqliteGenreStore::new(
                pool.clone(),
            )))),
            artists: Arc::new(ArtistService::new(Arc::new(SqliteArtistStore::new(
                pool.clone(),
            )))),
            albums: Arc::new(AlbumService::new(Arc::new(SqliteAlbumStore::new(
                pool.clone(),
            )))),
            songs: Arc::new(SongService::new(Arc::clone(&songs))),
            playlists: Arc::new(PlaylistService::new(
                Arc::new(SqlitePlaylistStore::new(pool.clone())),
                songs,
            )),
            users: Arc::new(UserService::new(Arc::clone(&users), Arc::clone(&hasher))),
            auth: Arc::new(AuthService::new(
                users,
                Arc::new(SqliteSessionStore::new(pool.clone())),
                hasher,
                AuthServiceConfig {
                    session_ttl: config.auth.session_ttl(),
                },
            )),
            health: Arc::new(HealthService::new(Arc::new(SqliteDatabaseHealth::new(pool)))),
            config: Arc::new(config),
        }
    }
}
