//! Integration tests for Grocer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grocer-integration-tests
//! ```
//!
//! Each [`TestContext`] serves the full application router in-process over
//! a private in-memory `SQLite` database, so tests need no running server
//! and do not share state.
//!
//! # Test Categories
//!
//! - `auth` - Sign-up, login, logout and the login gate
//! - `stores_items` - Store and item create/view/edit
//! - `shopping_list` - Shopping list membership
//! - `service` - Health checks, request IDs and not-found handling

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tower::ServiceExt;

use grocer_web::config::WebConfig;
use grocer_web::middleware::{REQUEST_ID_HEADER, SESSION_COOKIE_NAME};
use grocer_web::state::AppState;
use grocer_web::{build_app, db};

/// A response with its body already collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub request_id: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// Whether this is a redirect to exactly `path`.
    #[must_use]
    pub fn redirects_to(&self, path: &str) -> bool {
        self.status.is_redirection() && self.location.as_deref() == Some(path)
    }
}

/// In-process client for one isolated instance of the application.
///
/// Behaves like a browser with cookies enabled: the session cookie set by
/// one response is sent with the next request.
pub struct TestContext {
    app: Router,
    pub pool: SqlitePool,
    cookie: Option<String>,
}

impl TestContext {
    /// Build the application over a fresh in-memory database.
    pub async fn new() -> Self {
        // A single connection that never closes keeps the in-memory
        // database alive for the whole test.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("valid sqlite url")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("open in-memory database");
        db::migrate(&pool).await.expect("apply migrations");

        let config = WebConfig::from_lookup(|_| None).expect("default config");
        let app = build_app(AppState::new(config, pool.clone()))
            .await
            .expect("build app");

        Self {
            app,
            pool,
            cookie: None,
        }
    }

    /// Whether the client currently holds a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request.expect("valid request")).await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&mut self, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = self.request("GET", uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// Send a url-encoded form POST.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("valid request")).await
    }

    /// Sign up a user and check the redirect to the login page.
    pub async fn sign_up(&mut self, username: &str, password: &str) {
        let resp = self
            .post_form("/signup", &[("username", username), ("password", password)])
            .await;
        assert!(resp.redirects_to("/login"), "sign-up failed: {resp:?}");
    }

    /// Log in and check the redirect home.
    pub async fn log_in(&mut self, username: &str, password: &str) {
        let resp = self
            .post_form("/login", &[("username", username), ("password", password)])
            .await;
        assert!(resp.redirects_to("/"), "login failed: {resp:?}");
    }

    /// Sign up and log in as a fresh user.
    pub async fn logged_in_as(&mut self, username: &str) {
        self.sign_up(username, "pw1").await;
        self.log_in(username, "pw1").await;
    }

    /// Create a store and return its detail path.
    pub async fn create_store(&mut self, title: &str, address: &str) -> String {
        let resp = self
            .post_form("/new_store", &[("title", title), ("address", address)])
            .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "store create failed: {resp:?}");
        resp.location.expect("store redirect location")
    }

    /// Create an item and return its detail path.
    pub async fn create_item(&mut self, fields: &[(&str, &str)]) -> String {
        let resp = self.post_form("/new_item", fields).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "item create failed: {resp:?}");
        resp.location.expect("item redirect location")
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            if let Ok(value) = value.to_str() {
                self.store_cookie(value);
            }
        }

        let header_value = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let status = response.status();
        let location = header_value(header::LOCATION.as_str());
        let request_id = header_value(REQUEST_ID_HEADER);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        TestResponse {
            status,
            location,
            request_id,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default().trim();
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        if name != SESSION_COOKIE_NAME {
            return;
        }

        let expired = set_cookie.to_ascii_lowercase().contains("max-age=0");
        self.cookie = if value.is_empty() || expired {
            None
        } else {
            Some(pair.to_owned())
        };
    }
}
