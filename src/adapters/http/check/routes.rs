//! Axum router configuration for check endpoints.
//!
//! This module defines the route structure for the check API and wires the
//! permissive CORS headers every response carries.

use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    analyze_check, analyze_method_not_allowed, health, health_method_not_allowed, preflight,
    CheckAppState,
};

/// Largest accepted request body: a base64-encoded 10 MiB upload plus JSON framing.
pub const MAX_REQUEST_BODY_BYTES: usize = 15 * 1024 * 1024;

/// Methods advertised by the analyze routes.
pub const ANALYZE_ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Methods advertised by the health routes.
pub const HEALTH_ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

fn with_cors(router: Router<CheckAppState>, methods: &'static str) -> Router<CheckAppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(methods),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type"),
            )),
    )
}

/// Create the analyze router.
///
/// # Routes
/// - `POST /analyze` - Extract fields from a check image
/// - `POST /api/analyze` - Same, at the serverless path
/// - `OPTIONS` on both - CORS preflight
pub fn analyze_routes() -> Router<CheckAppState> {
    let endpoint = || {
        post(analyze_check)
            .options(preflight)
            .fallback(analyze_method_not_allowed)
    };

    with_cors(
        Router::new()
            .route("/analyze", endpoint())
            .route("/api/analyze", endpoint()),
        ANALYZE_ALLOWED_METHODS,
    )
}

/// Create the health router.
///
/// # Routes
/// - `GET|POST /health` - Liveness and credential presence
/// - `GET|POST /api/test` - Same, at the serverless path
/// - `OPTIONS` on both - CORS preflight
pub fn health_routes() -> Router<CheckAppState> {
    let endpoint = || {
        get(health)
            .post(health)
            .options(preflight)
            .fallback(health_method_not_allowed)
    };

    with_cors(
        Router::new()
            .route("/health", endpoint())
            .route("/api/test", endpoint()),
        HEALTH_ALLOWED_METHODS,
    )
}

/// Create the complete check module router.
pub fn check_router() -> Router<CheckAppState> {
    Router::new()
        .merge(analyze_routes())
        .merge(health_routes())
}

/// Build the servable application: routes, state, body limit and request tracing.
///
/// # Example
///
/// ```ignore
/// let state = CheckAppState::new(Some(provider), Environment::Development);
/// let app = check_app(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn check_app(state: CheckAppState) -> Router {
    check_router()
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
