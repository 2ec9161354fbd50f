//! User entity and the creator attribution attached to catalog records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EmailAddress, UserId};

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    /// Display name chosen at sign-up
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub is_public: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new public, unverified user
    #[must_use]
    pub fn new(email: EmailAddress) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            name: None,
            first_name: None,
            last_name: None,
            bio: None,
            is_public: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attribution used on records this user creates
    #[must_use]
    pub fn as_creator(&self) -> Creator {
        Creator {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Who created a catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: UserId,
    pub name: Option<String>,
    pub email: EmailAddress,
}

/// A catalog record together with its creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributed<T> {
    pub record: T,
    pub creator: Creator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let user = User::new(EmailAddress::new("fan@example.com").unwrap());
        assert!(user.is_public);
        assert!(!user.email_verified);
        assert!(user.name.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn creator_carries_identity() {
        let user = User::new(EmailAddress::new("fan@example.com").unwrap()).with_name("Fan");
        let creator = user.as_creator();
        assert_eq!(creator.id, user.id);
        assert_eq!(creator.name.as_deref(), Some("Fan"));
        assert_eq!(creator.email.as_str(), "fan@example.com");
    }
}
