//! Sign-up, sign-in and session handlers
//!
//! Successful sign-up and sign-in return the bearer token in the body and
//! also set it as an HttpOnly session cookie.

use application::{IssuedSession, SignUp};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::{
    common::{ApiResponse, Reply, ok, reply},
    users::{UserResponse, classifier},
};
use crate::{
    error::{ApiError, ErrorResponse},
    error_mapping::ClassifyExt,
    middleware::{CurrentUser, SessionToken, ValidatedJson, clear_session_cookie, session_cookie},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    #[schema(format = Password)]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    #[schema(format = Password)]
    pub password: String,
}

/// Issued session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    /// Bearer token for the `Authorization` header
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedSession> for SessionResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.token.expose_secret().to_string(),
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedOut {
    pub signed_out: bool,
}

fn with_session_cookie(state: &AppState, status: StatusCode, session: IssuedSession) -> Response {
    let jar = CookieJar::new().add(session_cookie(
        &state.config.auth.cookie_name,
        &session.token,
        session.expires_at,
        state.config.is_production(),
    ));

    (jar, reply(status, SessionResponse::from(session))).into_response()
}

/// Register and sign in
#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email address taken", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SignUpRequest>,
) -> Result<Response, ApiError> {
    let session = state
        .auth
        .sign_up(SignUp {
            email: body.email,
            password: SecretString::from(body.password),
            name: body.name,
        })
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST, StatusCode::CONFLICT]))?;

    Ok(with_session_cookie(&state, StatusCode::CREATED, session))
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
#[instrument(skip(state, body))]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SignInRequest>,
) -> Result<Response, ApiError> {
    let session = state
        .auth
        .sign_in(&body.email, SecretString::from(body.password))
        .await
        .classify_err(&classifier(&[StatusCode::BAD_REQUEST]))?;

    Ok(with_session_cookie(&state, StatusCode::OK, session))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    tag = "auth",
    responses(
        (status = 200, description = "Session ended", body = ApiResponse<SignedOut>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("session" = []))
)]
#[instrument(skip_all, fields(user = %user.id))]
pub async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
    SessionToken(token): SessionToken,
) -> Result<Response, ApiError> {
    let signed_out = state.auth.sign_out(token.expose_secret()).await?;
    info!("Signed out");

    let jar = CookieJar::new().add(clear_session_cookie(&state.config.auth.cookie_name));

    Ok((jar, ok(SignedOut { signed_out })).into_response())
}

/// The signed-in user
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("session" = []))
)]
pub async fn session(CurrentUser(user): CurrentUser) -> Reply<UserResponse> {
    ok(user.into())
}
