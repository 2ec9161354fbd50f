//! HTTP request handlers

pub mod albums;
pub mod artists;
pub mod auth;
pub mod common;
pub mod genres;
pub mod health;
pub mod playlists;
pub mod songs;
pub mod users;
