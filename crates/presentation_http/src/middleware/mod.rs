//! HTTP middleware components
//!
//! Session authentication extractors, request correlation ids and
//! validating extractors.

pub mod auth;
pub mod request_id;
pub mod validation;

pub use auth::{CurrentUser, SessionToken, clear_session_cookie, session_cookie};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use validation::{ValidatedJson, ValidatedQuery};
