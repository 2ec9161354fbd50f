//! OpenAPI documentation module
//!
//! Serves the OpenAPI 3.1 document at `/openapi.json`, Swagger UI at `/doc`
//! and ReDoc at `/redoc`.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::{Router, response::Html, routing::get};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{handlers, state::AppState};

/// Path of the generated document
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// OpenAPI documentation for Lyriko
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lyriko API",
        description = "Music catalog API: genres, artists, albums, songs with lyrics, playlists and users",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "system", description = "Service banner, liveness and readiness"),
        (name = "auth", description = "Sign-up, sign-in and sessions"),
        (name = "users", description = "User accounts"),
        (name = "genres", description = "Music genres"),
        (name = "artists", description = "Artists, addressed by slug"),
        (name = "albums", description = "Albums and their artist/genre links"),
        (name = "songs", description = "Songs and lyrics"),
        (name = "playlists", description = "Playlists and their songs")
    ),
    paths(
        handlers::health::root,
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::sign_out,
        handlers::auth::session,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::genres::list_genres,
        handlers::genres::get_genre,
        handlers::genres::create_genre,
        handlers::genres::update_genre,
        handlers::genres::delete_genre,
        handlers::artists::list_artists,
        handlers::artists::get_artist,
        handlers::artists::create_artist,
        handlers::artists::update_artist,
        handlers::artists::delete_artist,
        handlers::albums::list_albums,
        handlers::albums::get_album,
        handlers::albums::create_album,
        handlers::albums::update_album,
        handlers::albums::delete_album,
        handlers::songs::list_songs,
        handlers::songs::get_song,
        handlers::songs::create_song,
        handlers::songs::update_song,
        handlers::songs::delete_song,
        handlers::playlists::list_playlists,
        handlers::playlists::get_playlist,
        handlers::playlists::create_playlist,
        handlers::playlists::update_playlist,
        handlers::playlists::delete_playlist,
        handlers::playlists::add_song,
        handlers::playlists::remove_song,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            handlers::common::PaginationResponse,
            handlers::common::CreatorResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
#[derive(Debug)]
pub struct ApiDoc;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// Routes serving the document, Swagger UI and ReDoc
pub fn create_openapi_routes() -> Router<AppState> {
    let redoc = Redoc::with_url(OPENAPI_JSON_PATH, ApiDoc::openapi());

    Router::new()
        .route("/redoc", get(|| async move { Html(redoc.to_html()) }))
        // SwaggerUi also serves the JSON document
        .merge(SwaggerUi::new("/doc").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}
