//! Authentication service
//!
//! Sign-up and sign-in issue an opaque bearer token. Only its BLAKE3 hash
//! is stored.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use domain::{EmailAddress, Session, User};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::user_service::{hash_password, verify_password};
use crate::{
    error::ApplicationError,
    ports::{PasswordHasherPort, SessionStore, UserStore},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Configuration for the auth service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// How long an issued session stays valid (default: 7 days)
    pub session_ttl: Duration,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::days(7),
        }
    }
}

/// Input for self-service registration
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: SecretString,
    pub name: String,
}

/// A freshly issued session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: User,
    /// Bearer token; shown to the client once
    pub token: SecretString,
    pub expires_at: DateTime<Utc>,
}

/// Service for sign-up, sign-in and session resolution
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn PasswordHasherPort>,
    config: AuthServiceConfig,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn PasswordHasherPort>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            config,
        }
    }

    /// Register a user and open a session for them
    #[instrument(skip(self, input))]
    pub async fn sign_up(&self, input: SignUp) -> Result<IssuedSession, ApplicationError> {
        let user = User::new(EmailAddress::new(input.email)?).with_name(input.name);
        let hash = hash_password(&self.hasher, input.password).await?;

        self.users.insert(&user, &hash).await?;
        info!(id = %user.id, "User signed up");

        self.open_session(user).await
    }

    /// Check credentials and open a session
    #[instrument(skip(self, email, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<IssuedSession, ApplicationError> {
        let not_authorized = || ApplicationError::NotAuthorized(INVALID_CREDENTIALS.to_string());

        let email = EmailAddress::new(email).map_err(|_| not_authorized())?;
        let Some(credentials) = self.users.credentials_by_email(&email).await? else {
            debug!("Sign-in for unknown email");
            return Err(not_authorized());
        };
        let Some(stored_hash) = credentials.password_hash else {
            return Err(not_authorized());
        };

        if !verify_password(&self.hasher, password, stored_hash).await? {
            warn!(user = %credentials.user.id, "Sign-in with wrong password");
            return Err(not_authorized());
        }

        self.open_session(credentials.user).await
    }

    /// End the session identified by `token`
    #[instrument(skip_all)]
    pub async fn sign_out(&self, token: &str) -> Result<bool, ApplicationError> {
        self.sessions.delete_by_token_hash(&hash_token(token)).await
    }

    /// Resolve the user behind a bearer token
    ///
    /// Unknown and expired tokens yield `None`; expired sessions are removed.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<Option<User>, ApplicationError> {
        let token_hash = hash_token(token);
        let Some(session) = self.sessions.get_by_token_hash(&token_hash).await? else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            debug!(session = %session.id, "Session expired");
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Ok(None);
        }

        self.users.get(&session.user_id).await
    }

    /// Drop all expired sessions
    #[instrument(skip(self))]
    pub async fn purge_expired_sessions(&self) -> Result<u64, ApplicationError> {
        let removed = self.sessions.delete_expired().await?;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }

    async fn open_session(&self, user: User) -> Result<IssuedSession, ApplicationError> {
        let token = generate_token();
        let session = Session::open(
            user.id,
            hash_token(token.expose_secret()),
            self.config.session_ttl,
        );
        self.sessions.insert(&session).await?;

        Ok(IssuedSession {
            user,
            token,
            expires_at: session.expires_at,
        })
    }
}

/// 64 hex characters drawn from two random v4 UUIDs
fn generate_token() -> SecretString {
    SecretString::from(format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    ))
}

/// Hex BLAKE3 digest of a bearer token
#[must_use]
pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}
