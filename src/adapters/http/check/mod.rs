//! HTTP adapter for check endpoints.
//!
//! Exposes check analysis via REST API:
//! - `POST /analyze` (alias `/api/analyze`) - Extract fields from a check image
//! - `GET|POST /health` (alias `/api/test`) - Liveness and credential presence
//!
//! All responses carry `Access-Control-Allow-*` headers; `OPTIONS` answers 200.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{CheckApiError, CheckAppState};
pub use routes::{check_app, check_router, MAX_REQUEST_BODY_BYTES};
