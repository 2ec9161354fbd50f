//! User persistence port

use async_trait::async_trait;
use domain::{EmailAddress, User, UserId};
#[cfg(test)]
use mockall::automock;

use super::pagination::{ListQuery, Page};
use crate::error::ApplicationError;

/// A user with the stored password hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: Option<String>,
}

/// Port for user persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// List users newest first, filtered on first name, last name and email
    async fn list(&self, query: &ListQuery) -> Result<Page<User>, ApplicationError>;

    async fn get(&self, id: &UserId) -> Result<Option<User>, ApplicationError>;

    async fn credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, ApplicationError>;

    /// Insert a user; a taken email is a unique-constraint error on `email`
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), ApplicationError>;
}
