//! Router tests for rows that disappear between a service's existence check
//! and its write
//!
//! The store reports `RecordNotFound`; each route must answer with a status
//! it declares.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use application::{
    ApplicationError, DatabaseError, GenreService, GenreStore, ListQuery, Page,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use domain::{Attributed, Genre, GenreId};
use infrastructure::{AppConfig, AsyncDatabase, SqliteGenreStore};
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};

/// Reads hit SQLite; every write behaves as if the row was already gone
struct VanishingGenreStore {
    inner: SqliteGenreStore,
}

#[async_trait]
impl GenreStore for VanishingGenreStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Attributed<Genre>>, ApplicationError> {
        self.inner.list(query).await
    }

    async fn get(&self, id: &GenreId) -> Result<Option<Attributed<Genre>>, ApplicationError> {
        self.inner.get(id).await
    }

    async fn insert(&self, _genre: &Genre) -> Result<(), ApplicationError> {
        Err(DatabaseError::record_not_found().into())
    }

    async fn update(&self, _genre: &Genre) -> Result<(), ApplicationError> {
        Err(DatabaseError::record_not_found().into())
    }

    async fn delete(&self, _id: &GenreId) -> Result<(), ApplicationError> {
        Err(DatabaseError::record_not_found().into())
    }

    async fn usage_count(&self, id: &GenreId) -> Result<u64, ApplicationError> {
        self.inner.usage_count(id).await
    }
}

/// A server whose genre routes use the vanishing store, plus a bearer token
/// and the id of a genre seeded through the real store
async fn create_test_server() -> (TestServer, String, String) {
    let database = AsyncDatabase::in_memory()
        .await
        .expect("Failed to open database");
    database.migrate().await.expect("Failed to migrate");

    let mut state = AppState::from_database(&database, AppConfig::default());
    let seeding = TestServer::new(create_router(state.clone())).expect("Failed to create server");

    let response = seeding
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "curator@example.com",
            "password": "correct horse battery",
            "name": "Curator"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let token = response.json::<Value>()["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = seeding
        .post("/api/genres")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Shoegaze" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let genre_id = response.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    state.genres = Arc::new(GenreService::new(Arc::new(VanishingGenreStore {
        inner: SqliteGenreStore::new(database.pool().clone()),
    })));
    let server = TestServer::new(create_router(state)).expect("Failed to create server");

    (server, token, genre_id)
}

#[tokio::test]
async fn create_remaps_record_not_found_to_bad_request() {
    let (server, token, _) = create_test_server().await;

    let response = server
        .post("/api/genres")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Dream Pop" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "genre not found");
}

#[tokio::test]
async fn update_of_vanished_genre_is_not_found() {
    let (server, token, genre_id) = create_test_server().await;

    let response = server
        .put(&format!("/api/genres/{genre_id}"))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Nu Gaze" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "genre not found");
    assert_eq!(
        body["details"],
        "The requested item does not exist or has been deleted"
    );
}

#[tokio::test]
async fn delete_of_vanished_genre_is_not_found() {
    let (server, token, genre_id) = create_test_server().await;

    let response = server
        .delete(&format!("/api/genres/{genre_id}"))
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "genre not found");
}

#[tokio::test]
async fn reads_still_see_the_seeded_genre() {
    let (server, _, genre_id) = create_test_server().await;

    let response = server.get(&format!("/api/genres/{genre_id}")).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["name"], "Shoegaze");
}
