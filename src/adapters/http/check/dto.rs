//! HTTP DTOs (Data Transfer Objects) for check endpoints.
//!
//! Every response is wrapped in an envelope: `{success: true, data}` or
//! `{success: false, error}`.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::domain::check::UploadError;
use crate::domain::foundation::Timestamp;

/// Message reported by the health endpoint.
pub const HEALTH_MESSAGE: &str = "CheckVision API is running successfully";

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /analyze`.
///
/// Both fields are optional at the serde level so that a missing field maps to
/// the validation message instead of a generic JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Base64 image bytes, without a `data:` URL prefix.
    #[serde(default)]
    pub image_data: Option<String>,
    /// Declared MIME type, e.g. `image/jpeg`.
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl AnalyzeRequest {
    /// Returns both fields, rejecting absent or empty values.
    pub fn required_fields(&self) -> Result<(&str, &str), UploadError> {
        let image_data = self.image_data.as_deref().filter(|s| !s.is_empty());
        let mime_type = self.mime_type.as_deref().filter(|s| !s.is_empty());
        match (image_data, mime_type) {
            (Some(data), Some(mime)) => Ok((data, mime)),
            _ => Err(UploadError::MissingFields),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Health check response. Reports key presence, never the key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// ISO 8601, millisecond precision.
    pub timestamp: String,
    pub environment: String,
    pub api_key_configured: bool,
    pub version: String,
}

impl HealthResponse {
    pub fn new(environment: Environment, api_key_configured: bool, version: &str) -> Self {
        Self {
            success: true,
            message: HEALTH_MESSAGE.to_string(),
            timestamp: Timestamp::now()
                .as_datetime()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            environment: environment.to_string(),
            api_key_configured,
            version: version.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_accepts_camel_case_fields() {
        let request: AnalyzeRequest =
            serde_json::from_value(json!({"imageData": "AAAA", "mimeType": "image/png"})).unwrap();
        assert_eq!(request.required_fields().unwrap(), ("AAAA", "image/png"));
    }

    #[test]
    fn missing_or_empty_fields_are_rejected() {
        let missing: AnalyzeRequest = serde_json::from_value(json!({"imageData": "AAAA"})).unwrap();
        assert!(matches!(missing.required_fields(), Err(UploadError::MissingFields)));

        let empty: AnalyzeRequest =
            serde_json::from_value(json!({"imageData": "", "mimeType": "image/png"})).unwrap();
        assert!(matches!(empty.required_fields(), Err(UploadError::MissingFields)));
    }

    #[test]
    fn envelopes_serialize_with_success_flag() {
        let ok = serde_json::to_value(SuccessEnvelope::new(json!({"a": 1}))).unwrap();
        assert_eq!(ok, json!({"success": true, "data": {"a": 1}}));

        let err = serde_json::to_value(ErrorEnvelope::new("boom")).unwrap();
        assert_eq!(err, json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn health_response_uses_camel_case() {
        let value =
            serde_json::to_value(HealthResponse::new(Environment::Staging, true, "2.0.0")).unwrap();
        assert_eq!(value["apiKeyConfigured"], json!(true));
        assert_eq!(value["environment"], json!("staging"));
        assert_eq!(value["message"], json!(HEALTH_MESSAGE));
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
