//! Session authentication configuration.

use serde::{Deserialize, Serialize};

/// Session authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of an issued session in hours (default: 7 days)
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,

    /// Cookie carrying the session token when no `Authorization` header is sent
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

const fn default_session_ttl_hours() -> u32 {
    24 * 7
}

fn default_cookie_name() -> String {
    "lyriko_session".to_string()
}

impl AuthConfig {
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_ttl_hours))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            cookie_name: default_cookie_name(),
        }
    }
}
