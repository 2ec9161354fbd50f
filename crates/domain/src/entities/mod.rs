//! Domain entities - Objects with identity and lifecycle

mod album;
mod artist;
mod genre;
mod playlist;
mod session;
mod song;
mod user;

pub use album::{Album, AlbumChanges};
pub use artist::{Artist, ArtistChanges};
pub use genre::{Genre, GenreChanges};
pub use playlist::{Playlist, PlaylistChanges, PlaylistItem};
pub use session::Session;
pub use song::{Song, SongChanges};
pub use user::{Attributed, Creator, User};
