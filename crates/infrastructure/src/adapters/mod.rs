//! Adapters implementing application ports outside persistence

mod password_hasher;

pub use password_hasher::{Argon2PasswordHasher, PasswordHashError};
