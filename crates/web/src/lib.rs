//! Grocer web application library.
//!
//! A small grocery-store inventory and shopping-list site: users sign up,
//! log in, create stores and items, and keep a personal shopping list.
//!
//! The router is built here so the binary and the integration tests serve
//! exactly the same application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::time::Duration;

use axum::{Router, extract::Request, response::Response};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::state::AppState;

/// Build the application router with sessions, request IDs and tracing.
///
/// The Sentry layers are left to the binary so tests don't need a hub.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn build_app(state: AppState) -> Result<Router, sqlx::Error> {
    let session_layer = middleware::create_session_layer(state.pool(), state.config()).await?;

    Ok(routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record("latency_ms", u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
                    tracing::debug!("response sent");
                }),
        )
        .with_state(state))
}
