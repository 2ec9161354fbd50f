//! Session persistence port

use async_trait::async_trait;
use domain::Session;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for login sessions, looked up by token hash
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<(), ApplicationError>;

    async fn get_by_token_hash(&self, token_hash: &str)
    -> Result<Option<Session>, ApplicationError>;

    /// Returns whether a session was removed
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, ApplicationError>;

    /// Remove expired sessions, returning how many were deleted
    async fn delete_expired(&self) -> Result<u64, ApplicationError>;
}
