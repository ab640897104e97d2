//! HTTP handlers for check endpoints.
//!
//! These handlers connect Axum routes to the check analysis handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::application::handlers::check::{
    AnalyzeCheckCommand, AnalyzeCheckError, AnalyzeCheckHandler,
};
use crate::config::Environment;
use crate::domain::check::{AnalysisResult, ImagePayload, UploadError};
use crate::ports::VisionProvider;

use super::dto::{AnalyzeRequest, ErrorEnvelope, HealthResponse, SuccessEnvelope};

/// 405 message for the analyze endpoint.
pub const ANALYZE_METHOD_NOT_ALLOWED: &str =
    "Method not allowed. Only POST requests are supported.";

/// 405 message for the health endpoint.
pub const HEALTH_METHOD_NOT_ALLOWED: &str = "Method not allowed";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for check endpoints.
///
/// `provider` is `None` when no API key is configured; analysis requests then
/// fail with a configuration error before any outbound call.
#[derive(Clone)]
pub struct CheckAppState {
    pub provider: Option<Arc<dyn VisionProvider>>,
    pub environment: Environment,
    pub version: &'static str,
}

impl CheckAppState {
    pub fn new(provider: Option<Arc<dyn VisionProvider>>, environment: Environment) -> Self {
        Self {
            provider,
            environment,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Create the analysis handler, if a provider is configured.
    pub fn analyze_handler(&self) -> Option<AnalyzeCheckHandler> {
        self.provider.clone().map(AnalyzeCheckHandler::new)
    }

    pub fn api_key_configured(&self) -> bool {
        self.provider.is_some()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Analyze
// ════════════════════════════════════════════════════════════════════════════════

/// POST /analyze - Extract check fields from an uploaded image
///
/// Input is validated before the credential check, so a bad upload is a 400
/// even on a server without a key.
pub async fn analyze_check(
    State(state): State<CheckAppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<SuccessEnvelope<AnalysisResult>>, CheckApiError> {
    let Json(request) = payload?;

    let (image_data, mime_type) = request.required_fields()?;
    let image = ImagePayload::from_base64(image_data, mime_type)?;

    let handler = state.analyze_handler().ok_or_else(|| {
        error!("GEMINI_API_KEY is not configured");
        AnalyzeCheckError::missing_credential()
    })?;

    let result = handler.handle(AnalyzeCheckCommand { image }).await?;

    Ok(Json(SuccessEnvelope::new(result)))
}

/// Any other method on the analyze path.
pub async fn analyze_method_not_allowed() -> CheckApiError {
    CheckApiError::MethodNotAllowed(ANALYZE_METHOD_NOT_ALLOWED)
}

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

/// GET|POST /health - Liveness and credential presence
pub async fn health(State(state): State<CheckAppState>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        state.environment,
        state.api_key_configured(),
        state.version,
    ))
}

/// Any other method on the health path.
pub async fn health_method_not_allowed() -> CheckApiError {
    CheckApiError::MethodNotAllowed(HEALTH_METHOD_NOT_ALLOWED)
}

/// OPTIONS - CORS preflight; headers come from the router layers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts failures to the failure envelope.
#[derive(Debug)]
pub enum CheckApiError {
    /// Failure from the analysis pipeline, validation included.
    Analyze(AnalyzeCheckError),
    /// The body was not a JSON object.
    MalformedBody(String),
    /// Wrong HTTP method.
    MethodNotAllowed(&'static str),
}

impl From<AnalyzeCheckError> for CheckApiError {
    fn from(err: AnalyzeCheckError) -> Self {
        Self::Analyze(err)
    }
}

impl From<UploadError> for CheckApiError {
    fn from(err: UploadError) -> Self {
        Self::Analyze(AnalyzeCheckError::Validation(err))
    }
}

impl From<JsonRejection> for CheckApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl CheckApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            CheckApiError::Analyze(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            CheckApiError::Analyze(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CheckApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            CheckApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CheckApiError::Analyze(e) => e.to_string(),
            CheckApiError::MalformedBody(detail) => format!("Invalid request body: {detail}"),
            CheckApiError::MethodNotAllowed(message) => (*message).to_string(),
        }
    }
}

impl IntoResponse for CheckApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }
        (status, Json(ErrorEnvelope::new(message))).into_response()
    }
}
