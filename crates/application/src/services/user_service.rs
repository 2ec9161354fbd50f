//! User service

use std::{fmt, sync::Arc};

use domain::{EmailAddress, User, UserId};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    ports::{ListQuery, Page, PasswordHasherPort, UserStore},
};

/// Input for creating a user account directly
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: SecretString,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub is_public: bool,
}

/// Service for browsing and creating users
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasherPort>,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasherPort>) -> Self {
        Self { users, hasher }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<User>, ApplicationError> {
        self.users.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &UserId) -> Result<User, ApplicationError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User"))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewUser) -> Result<User, ApplicationError> {
        let mut user = User::new(EmailAddress::new(input.email)?);
        user.name = input.name;
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.bio = input.bio;
        user.is_public = input.is_public;

        let hash = hash_password(&self.hasher, input.password).await?;
        self.users.insert(&user, &hash).await?;

        info!(id = %user.id, "User created");
        Ok(user)
    }
}

/// Hash on the blocking pool
pub(crate) async fn hash_password(
    hasher: &Arc<dyn PasswordHasherPort>,
    password: SecretString,
) -> Result<String, ApplicationError> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
        .await
        .map_err(|e| ApplicationError::Internal(format!("Password hashing task failed: {e}")))?
}

/// Verify on the blocking pool
pub(crate) async fn verify_password(
    hasher: &Arc<dyn PasswordHasherPort>,
    password: SecretString,
    hash: String,
) -> Result<bool, ApplicationError> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.verify(password.expose_secret(), &hash))
        .await
        .map_err(|e| ApplicationError::Internal(format!("Password verification task failed: {e}")))?
}
