//! Value Objects - Immutable, identity-less domain primitives

mod album_type;
mod email_address;
mod entity_id;
mod slug;

pub use album_type::AlbumType;
pub use email_address::EmailAddress;
pub use entity_id::{
    AlbumId, ArtistId, GenreId, PlaylistId, PlaylistItemId, SessionId, SongId, UserId,
};
pub use slug::Slug;
