//! Integration tests for HTTP handlers
//!
//! Every test runs the full router against a migrated in-memory database.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use infrastructure::{AppConfig, AsyncDatabase};
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};

async fn create_test_server() -> TestServer {
    let database = AsyncDatabase::in_memory()
        .await
        .expect("Failed to open database");
    database.migrate().await.expect("Failed to migrate");

    let state = AppState::from_database(&database, AppConfig::default());
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

/// Sign up a fresh account and return its bearer token
async fn sign_up(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": email,
            "password": "correct horse battery",
            "name": "Test User"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_genre(server: &TestServer, token: &str, name: &str) -> Value {
    let response = server
        .post("/api/genres")
        .authorization_bearer(token)
        .json(&json!({ "name": name, "color": "#FF5733" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

async fn create_song(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/api/songs")
        .authorization_bearer(token)
        .json(&body)
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

// ============ Service Endpoint Tests ============

#[tokio::test]
async fn root_lists_entry_points() {
    let server = create_test_server().await;

    let response = server.get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Lyriko API");
    assert_eq!(body["endpoints"]["users"], "/api/users");
    assert_eq!(body["endpoints"]["docs"], "/doc");
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_reports_database() {
    let server = create_test_server().await;

    let response = server.get("/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ready"], true);
    assert!(body["services"].is_object());
}

#[tokio::test]
async fn unknown_route_returns_not_found_body() {
    let server = create_test_server().await;

    let response = server.get("/api/does-not-exist").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "404 Not Found");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let server = create_test_server().await;

    let response = server.get("/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "Lyriko API");
    assert!(body["paths"]["/api/genres"].is_object());
}

// ============ Auth Endpoint Tests ============

#[tokio::test]
async fn sign_up_sets_session_cookie() {
    let server = create_test_server().await;

    let response = server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "cookie@example.com",
            "password": "correct horse battery",
            "name": "Cookie"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let cookie = response.header("set-cookie");
    assert!(cookie.to_str().unwrap().starts_with("lyriko_session="));
}

#[tokio::test]
async fn duplicate_sign_up_is_conflict() {
    let server = create_test_server().await;
    sign_up(&server, "twice@example.com").await;

    let response = server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "twice@example.com",
            "password": "another long password",
            "name": "Again"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["status"], 409);
    assert_eq!(
        body["error"],
        "An account with this email address already exists"
    );
}

#[tokio::test]
async fn sign_in_with_wrong_password_is_unauthorized() {
    let server = create_test_server().await;
    sign_up(&server, "wrong@example.com").await;

    let response = server
        .post("/api/auth/sign-in")
        .json(&json!({
            "email": "wrong@example.com",
            "password": "not the password"
        }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn session_round_trip() {
    let server = create_test_server().await;
    let token = sign_up(&server, "session@example.com").await;

    let response = server
        .get("/api/auth/session")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "session@example.com");

    server
        .post("/api/auth/sign-out")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    server
        .get("/api/auth/session")
        .authorization_bearer(&token)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn session_cookie_authenticates_and_sign_out_clears_it() {
    let server = create_test_server().await;
    let token = sign_up(&server, "jar@example.com").await;
    let cookie = HeaderValue::from_str(&format!("theme=dark; lyriko_session={token}")).unwrap();

    let response = server
        .get("/api/auth/session")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["email"], "jar@example.com");

    let response = server
        .post("/api/auth/sign-out")
        .add_header(header::COOKIE, cookie)
        .await;
    response.assert_status_ok();
    let cleared = response.header("set-cookie");
    let cleared = cleared.to_str().unwrap();
    assert!(cleared.starts_with("lyriko_session="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn protected_route_without_session_is_unauthorized() {
    let server = create_test_server().await;

    let response = server
        .post("/api/genres")
        .json(&json!({ "name": "Rock" }))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "Authentication required");
    assert_eq!(
        body["details"],
        "You must be signed in to access this resource"
    );
}

// ============ Genre Endpoint Tests ============

#[tokio::test]
async fn create_genre_wraps_record_in_envelope() {
    let server = create_test_server().await;
    let token = sign_up(&server, "genres@example.com").await;

    let response = server
        .post("/api/genres")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Hip Hop", "description": "Beats and rhymes" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["status"], 201);
    assert_eq!(body["data"]["slug"], "hip-hop");
    assert_eq!(body["data"]["createdBy"]["email"], "genres@example.com");
}

#[tokio::test]
async fn duplicate_genre_name_is_conflict() {
    let server = create_test_server().await;
    let token = sign_up(&server, "dupe@example.com").await;
    create_genre(&server, &token, "Jazz").await;

    let response = server
        .post("/api/genres")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Jazz" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "A genre with this information already exists");
    assert_eq!(
        body["details"],
        "Please check your input (genre name must be unique)"
    );
}

#[tokio::test]
async fn names_without_slug_characters_are_rejected_not_conflicting() {
    let server = create_test_server().await;
    let token = sign_up(&server, "kanji@example.com").await;

    for name in ["日本", "中国"] {
        let response = server
            .post("/api/genres")
            .authorization_bearer(&token)
            .json(&json!({ "name": name }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid request data");
        assert!(body["details"].as_str().unwrap().contains("name"));
    }

    let response = server
        .post("/api/songs")
        .authorization_bearer(&token)
        .json(&json!({ "title": "♪♪♪", "lyrics": "la" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn invalid_genre_color_is_rejected() {
    let server = create_test_server().await;
    let token = sign_up(&server, "color@example.com").await;

    let response = server
        .post("/api/genres")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Blues", "color": "blue" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid request data");
    assert!(body["details"].as_str().unwrap().contains("color"));
}

#[tokio::test]
async fn unknown_genre_id_is_not_found() {
    let server = create_test_server().await;

    server
        .get("/api/genres/not-a-uuid")
        .await
        .assert_status_not_found();
    server
        .get("/api/genres/0190a1b2-0000-7000-8000-000000000000")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn genre_in_use_cannot_be_deleted() {
    let server = create_test_server().await;
    let token = sign_up(&server, "inuse@example.com").await;
    let genre = create_genre(&server, &token, "Soul").await;
    let genre_id = genre["id"].as_str().unwrap();

    create_song(
        &server,
        &token,
        json!({
            "title": "Soul Song",
            "lyrics": "la la la",
            "genreIds": [genre_id]
        }),
    )
    .await;

    let response = server
        .delete(&format!("/api/genres/{genre_id}"))
        .authorization_bearer(&token)
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Cannot delete genre with associated songs or albums"
    );
}

#[tokio::test]
async fn list_genres_paginates_and_searches() {
    let server = create_test_server().await;
    let token = sign_up(&server, "pages@example.com").await;
    for name in ["Ambient", "Bluegrass", "Country"] {
        create_genre(&server, &token, name).await;
    }

    let response = server
        .get("/api/genres")
        .add_query_param("page", 2)
        .add_query_param("limit", 2)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["skip"], 2);
    assert_eq!(body["data"]["pagination"]["page"], 2);
    assert_eq!(body["data"]["pagination"]["count"], 1);

    let response = server
        .get("/api/genres")
        .add_query_param("search", "grass")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["genres"][0]["name"], "Bluegrass");
}

#[tokio::test]
async fn list_limit_above_maximum_is_rejected() {
    let server = create_test_server().await;

    let response = server
        .get("/api/genres")
        .add_query_param("limit", 101)
        .await;

    response.assert_status_bad_request();
}

// ============ Album Endpoint Tests ============

#[tokio::test]
async fn duplicate_album_title_is_conflict() {
    let server = create_test_server().await;
    let token = sign_up(&server, "albums@example.com").await;

    server
        .post("/api/albums")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Blue Train", "albumType": "ALBUM" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/albums")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Blue Train" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "A album with this information already exists");
    assert_eq!(
        body["details"],
        "Please check your input (album title must be unique)"
    );
}

#[tokio::test]
async fn album_with_unknown_artist_is_invalid_reference() {
    let server = create_test_server().await;
    let token = sign_up(&server, "refs@example.com").await;

    let response = server
        .post("/api/albums")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Ghost Credits",
            "artistIds": ["0190a1b2-0000-7000-8000-000000000001"]
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid reference in album data");
    assert_eq!(body["details"], "One or more referenced items do not exist");
}

// ============ Song Endpoint Tests ============

#[tokio::test]
async fn overlong_lyrics_source_exceeds_column_limit() {
    let server = create_test_server().await;
    let token = sign_up(&server, "long@example.com").await;

    let response = server
        .post("/api/songs")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Long Source",
            "lyrics": "words",
            "lyricsSource": "s".repeat(150)
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "One or more fields exceed the maximum allowed length"
    );
}

// ============ Playlist Endpoint Tests ============

#[tokio::test]
async fn adding_song_twice_is_conflict() {
    let server = create_test_server().await;
    let token = sign_up(&server, "playlists@example.com").await;
    let song = create_song(
        &server,
        &token,
        json!({ "title": "On Repeat", "lyrics": "again and again" }),
    )
    .await;

    let response = server
        .post("/api/playlists")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Favourites", "isPublic": true }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let playlist_id = response.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let add = || {
        server
            .post(&format!("/api/playlists/{playlist_id}/songs"))
            .authorization_bearer(&token)
            .json(&json!({ "songId": song["id"] }))
    };

    let first = add().await;
    first.assert_status(StatusCode::CREATED);
    assert_eq!(first.json::<Value>()["data"]["position"], 1);

    let second = add().await;
    second.assert_status(StatusCode::CONFLICT);
    let body: Value = second.json();
    assert_eq!(
        body["details"],
        "Please check your input (song in playlist must be unique)"
    );

    let detail: Value = server
        .get(&format!("/api/playlists/{playlist_id}"))
        .await
        .json();
    assert_eq!(detail["data"]["name"], "Favourites");
    assert_eq!(detail["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn removing_missing_song_is_not_found() {
    let server = create_test_server().await;
    let token = sign_up(&server, "remove@example.com").await;

    let response = server
        .post("/api/playlists")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Empty" }))
        .await;
    let playlist_id = response.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    server
        .delete(&format!(
            "/api/playlists/{playlist_id}/songs/0190a1b2-0000-7000-8000-000000000002"
        ))
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}
