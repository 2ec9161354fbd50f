//! Session authentication
//!
//! Protected handlers take a [`CurrentUser`]. The session token is read from
//! `Authorization: Bearer <token>` or, failing that, from the session cookie.
//! A missing, unknown or expired token rejects the request with 401.

use std::ops::Deref;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use domain::User;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Bearer token presented with the request
#[derive(Debug, Clone)]
pub struct SessionToken(pub SecretString);

impl SessionToken {
    /// Token from the `Authorization` header, else from cookie `cookie_name`
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Self> {
        bearer_token(headers)
            .or_else(|| cookie_token(headers, cookie_name))
            .map(|token| Self(SecretString::from(token)))
    }
}

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, &state.config.auth.cookie_name)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// The signed-in user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;

        match state.auth.authenticate(token.expose_secret()).await? {
            Some(user) => Ok(Self(user)),
            None => {
                debug!("Rejected unknown or expired session token");
                Err(ApiError::Unauthenticated)
            },
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Session cookie carrying `token` until `expires_at`
#[must_use]
pub fn session_cookie(
    name: &str,
    token: &SecretString,
    expires_at: DateTime<Utc>,
    secure: bool,
) -> Cookie<'static> {
    let max_age = (expires_at - Utc::now()).num_seconds().max(0);

    Cookie::build((name.to_string(), token.expose_secret().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Removal cookie for the session
#[must_use]
pub fn clear_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .removal()
        .build()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Duration;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    fn token(headers: &HeaderMap) -> Option<String> {
        SessionToken::from_headers(headers, "lyriko_session")
            .map(|t| t.0.expose_secret().to_string())
    }

    #[test]
    fn bearer_token_is_read() {
        assert_eq!(
            token(&headers(&[("authorization", "Bearer abc123")])),
            Some("abc123".to_string())
        );
        assert_eq!(
            token(&headers(&[("authorization", "bearer  abc123 ")])),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn other_schemes_are_ignored() {
        assert_eq!(token(&headers(&[("authorization", "Basic dXNlcg==")])), None);
        assert_eq!(token(&headers(&[("authorization", "Bearer ")])), None);
    }

    #[test]
    fn cookie_is_fallback() {
        let map = headers(&[("cookie", "theme=dark; lyriko_session=tok-1; lang=de")]);
        assert_eq!(token(&map), Some("tok-1".to_string()));

        let both = headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "lyriko_session=from-cookie"),
        ]);
        assert_eq!(token(&both), Some("from-header".to_string()));
    }

    #[test]
    fn missing_token() {
        assert_eq!(token(&HeaderMap::new()), None);
        assert_eq!(token(&headers(&[("cookie", "lyriko_session=")])), None);
        assert_eq!(token(&headers(&[("cookie", "other=value")])), None);
    }

    #[test]
    fn cookie_in_second_header() {
        let map = headers(&[("cookie", "a=1"), ("cookie", "lyriko_session=tok-3")]);
        assert_eq!(token(&map), Some("tok-3".to_string()));
    }

    #[test]
    fn session_cookie_attributes() {
        let secret = SecretString::from("tok-2");
        let cookie = session_cookie(
            "lyriko_session",
            &secret,
            Utc::now() + Duration::hours(1),
            true,
        );

        assert_eq!(cookie.name(), "lyriko_session");
        assert_eq!(cookie.value(), "tok-2");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        let max_age = cookie.max_age().unwrap().whole_seconds();
        assert!((3590..=3600).contains(&max_age));
    }

    #[test]
    fn expired_session_gets_zero_max_age() {
        let cookie = session_cookie(
            "lyriko_session",
            &SecretString::from("old"),
            Utc::now() - Duration::hours(1),
            false,
        );
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn clearing_cookie_expires_it() {
        let cookie = clear_session_cookie("lyriko_session");
        assert_eq!(cookie.name(), "lyriko_session");
        assert!(cookie.value().is_empty());
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert!(cookie.to_string().contains("Max-Age=0"));
    }
}
