//! Lyriko HTTP presentation layer
//!
//! axum router, handlers, session authentication and the classifier that
//! turns store failures into client-facing error responses.

pub mod error;
pub mod error_mapping;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod shutdown;
pub mod state;
pub mod tasks;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use error_mapping::{
    Classification, ClassifyExt, ErrorClassifier, map_to_allowed_status,
};
pub use middleware::{CurrentUser, RequestIdLayer, ValidatedJson, ValidatedQuery};
pub use routes::create_router;
pub use shutdown::{ShutdownOutcome, run_until_shutdown, shutdown_signal};
pub use state::AppState;
