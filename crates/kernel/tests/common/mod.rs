#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every [`TestApp`] owns a private in-memory SQLite database, so tests run
//! in parallel without sharing state. The router and state are the real
//! kernel ones.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use tower_sessions::cookie::SameSite;

use pagedesk_kernel::models::{CreateUser, Role, User};
use pagedesk_kernel::{AppState, db, routes, session};

/// Password shared by every seeded account.
pub const PASSWORD: &str = "password";

/// Seeded Admin account: (username, display name).
pub const ADMIN: (&str, &str) = ("admin@test.com", "Admin");

/// Seeded Author accounts.
pub const ANN: (&str, &str) = ("ann@test.com", "Ann");
pub const BOB: (&str, &str) = ("bob@test.com", "Bob");

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub db: SqlitePool,
    pub state: AppState,
}

impl TestApp {
    /// Create a fresh application with the seeded accounts.
    pub async fn new() -> Self {
        let db = db::connect("sqlite::memory:", 1)
            .await
            .expect("Failed to open test database");
        db::run_migrations(&db)
            .await
            .expect("Failed to run migrations");

        for ((username, name), role) in [(ADMIN, Role::Admin), (ANN, Role::Author), (BOB, Role::Author)]
        {
            User::create(
                &db,
                CreateUser {
                    username: username.to_string(),
                    name: name.to_string(),
                    password: PASSWORD.to_string(),
                    role,
                },
            )
            .await
            .expect("Failed to create test user");
        }

        let state = AppState::from_pool(db.clone());

        // Must match main.rs
        let router = routes::router()
            .layer(session::create_session_layer(
                SameSite::Lax,
                false,
                session::DEFAULT_SESSION_EXPIRY_HOURS,
            ))
            .with_state(state.clone());

        Self { router, db, state }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// Send a request with cookies from a previous response.
    pub async fn request_with_cookies(
        &self,
        mut request: Request<Body>,
        cookies: &str,
    ) -> Response {
        if !cookies.is_empty() {
            request.headers_mut().insert(
                header::COOKIE,
                cookies.parse().expect("Invalid cookie header"),
            );
        }
        self.request(request).await
    }

    /// Login via the session API and return session cookies.
    ///
    /// # Panics
    ///
    /// Panics if the login response is not 200 OK.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .request(json_request(
                "POST",
                "/api/sessions",
                &serde_json::json!({ "username": username, "password": PASSWORD }),
            ))
            .await;

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Login failed for user '{username}'"
        );

        extract_cookies(&response)
    }

    /// Send a JSON request, optionally with session cookies.
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: &Value,
        cookies: &str,
    ) -> Response {
        self.request_with_cookies(json_request(method, uri, body), cookies)
            .await
    }

    /// Send a bodyless request, optionally with session cookies.
    pub async fn send(&self, method: &str, uri: &str, cookies: &str) -> Response {
        self.request_with_cookies(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
            cookies,
        )
        .await
    }

    /// Create a page through the API and return its JSON.
    pub async fn create_page(&self, body: &Value, cookies: &str) -> Value {
        let response = self.send_json("POST", "/api/pages", body, cookies).await;
        assert_eq!(response.status(), StatusCode::CREATED, "page creation failed");
        response_json(response).await
    }
}

/// Build a JSON request.
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract Set-Cookie headers from a response for use in subsequent requests.
pub fn extract_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|cookie| {
            // Extract just the cookie name=value, ignoring attributes
            cookie.split(';').next()
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collect a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Titles of a JSON page list, in order.
pub fn titles(pages: &Value) -> Vec<String> {
    pages
        .as_array()
        .expect("expected a page list")
        .iter()
        .map(|p| p["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
