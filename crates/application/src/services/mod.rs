//! Application services - Use case implementations

mod album_service;
mod artist_service;
mod auth_service;
mod genre_service;
mod health_service;
mod playlist_service;
mod song_service;
mod user_service;

pub use album_service::{AlbumService, NewAlbum};
pub use artist_service::{ArtistService, NewArtist};
pub use auth_service::{AuthService, AuthServiceConfig, IssuedSession, SignUp, hash_token};
pub use genre_service::{GenreService, NewGenre};
pub use health_service::{HealthReport, HealthService, ServiceHealth};
pub use playlist_service::{NewPlaylist, PlaylistDetails, PlaylistService};
pub use song_service::{NewSong, SongService};
pub use user_service::{NewUser, UserService};
