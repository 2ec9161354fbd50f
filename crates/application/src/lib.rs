//! Application layer - Use cases and orchestration
//!
//! Contains the catalog and auth services, the store ports they depend on,
//! and the error types shared with the adapters.

pub mod db_error;
pub mod error;
pub mod ports;
pub mod services;

pub use db_error::{DatabaseError, DbErrorCode, DbErrorMeta, DbErrorTarget};
pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
