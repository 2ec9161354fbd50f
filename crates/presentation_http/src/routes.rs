//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::{error::ApiError, handlers, openapi::create_openapi_routes, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_size_json_bytes;

    Router::new()
        // Banner and health
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api", api_routes())
        .merge(create_openapi_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/sign-up", post(handlers::auth::sign_up))
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        .route("/auth/session", get(handlers::auth::session))
        // Users
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/users/{id}", get(handlers::users::get_user))
        // Genres
        .route(
            "/genres",
            get(handlers::genres::list_genres).post(handlers::genres::create_genre),
        )
        .route(
            "/genres/{id}",
            get(handlers::genres::get_genre)
                .put(handlers::genres::update_genre)
                .delete(handlers::genres::delete_genre),
        )
        // Artists: GET/PUT take a slug, DELETE an id
        .route(
            "/artists",
            get(handlers::artists::list_artists).post(handlers::artists::create_artist),
        )
        .route(
            "/artists/{key}",
            get(handlers::artists::get_artist)
                .put(handlers::artists::update_artist)
                .delete(handlers::artists::delete_artist),
        )
        // Albums
        .route(
            "/albums",
            get(handlers::albums::list_albums).post(handlers::albums::create_album),
        )
        .route(
            "/albums/{id}",
            get(handlers::albums::get_album)
                .put(handlers::albums::update_album)
                .delete(handlers::albums::delete_album),
        )
        // Songs
        .route(
            "/songs",
            get(handlers::songs::list_songs).post(handlers::songs::create_song),
        )
        .route(
            "/songs/{id}",
            get(handlers::songs::get_song)
                .put(handlers::songs::update_song)
                .delete(handlers::songs::delete_song),
        )
        // Playlists
        .route(
            "/playlists",
            get(handlers::playlists::list_playlists).post(handlers::playlists::create_playlist),
        )
        .route(
            "/playlists/{id}",
            get(handlers::playlists::get_playlist)
                .put(handlers::playlists::update_playlist)
                .delete(handlers::playlists::delete_playlist),
        )
        .route("/playlists/{id}/songs", post(handlers::playlists::add_song))
        .route(
            "/playlists/{id}/songs/{song_id}",
            delete(handlers::playlists::remove_song),
        )
}

async fn not_found() -> ApiError {
    ApiError::NotFound("404 Not Found".to_string())
}
