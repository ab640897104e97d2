//! AnalyzeCheckHandler - Orchestrates one check extraction round trip.
//!
//! encode image → build prompt → one provider call → first text segment →
//! normalize → stamp result. There is no retry: every failure is terminal for
//! the request.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::prompt::extraction_prompt;
use crate::domain::check::{AnalysisResult, ImagePayload, NormalizeError, UploadError};
use crate::domain::foundation::Timestamp;
use crate::ports::{AIError, InlineImage, RequestMetadata, VisionProvider, VisionRequest};

/// Message returned when no credential is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Server configuration error. API key not found.";

/// Command to analyze a single check image.
#[derive(Debug)]
pub struct AnalyzeCheckCommand {
    /// The validated upload. Consumed by the handler.
    pub image: ImagePayload,
}

/// Error taxonomy for a check analysis.
#[derive(Debug, Error)]
pub enum AnalyzeCheckError {
    /// Bad or missing input. Raised before any network call.
    #[error("{0}")]
    Validation(#[from] UploadError),

    /// Missing service credential.
    #[error("{0}")]
    Configuration(String),

    /// The AI service rejected the request or could not be reached.
    #[error("AI service error: {0}")]
    Service(String),

    /// The AI service answered without generated text.
    #[error("No response generated from the AI service")]
    EmptyResponse,

    /// None of the JSON extraction strategies succeeded.
    #[error("{0}")]
    Unparseable(#[from] NormalizeError),
}

impl AnalyzeCheckError {
    /// Configuration error for an absent credential.
    pub fn missing_credential() -> Self {
        AnalyzeCheckError::Configuration(MISSING_CREDENTIAL_MESSAGE.to_string())
    }

    /// True for errors the caller caused.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalyzeCheckError::Validation(_))
    }
}

impl From<AIError> for AnalyzeCheckError {
    fn from(err: AIError) -> Self {
        AnalyzeCheckError::Service(err.user_message())
    }
}

/// Handler for check analysis.
pub struct AnalyzeCheckHandler {
    provider: Arc<dyn VisionProvider>,
}

impl AnalyzeCheckHandler {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: AnalyzeCheckCommand) -> Result<AnalysisResult, AnalyzeCheckError> {
        let trace_id = Uuid::new_v4().to_string();
        let started_at = Timestamp::now();
        let media_type = cmd.image.media_type();

        info!(
            trace_id = %trace_id,
            media_type = %media_type,
            bytes = cmd.image.len(),
            "Processing check analysis request"
        );

        // 1. Encode; the payload is consumed here and not retained
        let image = InlineImage::new(media_type.as_mime(), cmd.image.into_base64());

        // 2. Single provider call
        let request = VisionRequest::new(extraction_prompt(), RequestMetadata::new(&trace_id))
            .with_image(image);
        let response = self.provider.generate(request).await.map_err(|e| {
            error!(trace_id = %trace_id, error = %e, "AI service call failed");
            AnalyzeCheckError::from(e)
        })?;

        // 3. First generated text segment
        let text = response
            .text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!(
                    trace_id = %trace_id,
                    finish_reason = ?response.finish_reason,
                    "AI service returned no text"
                );
                AnalyzeCheckError::EmptyResponse
            })?;

        // 4. Normalize
        let record = crate::domain::check::normalize(&text).map_err(|e| {
            warn!(trace_id = %trace_id, response_len = text.len(), "Could not parse AI response");
            AnalyzeCheckError::from(e)
        })?;

        // 5. Stamp
        let completed_at = Timestamp::now();
        info!(
            trace_id = %trace_id,
            model = %response.model,
            fields_found = record.found_count(),
            elapsed_ms = completed_at.duration_since(&started_at).num_milliseconds(),
            "Check analysis completed"
        );

        Ok(AnalysisResult::new(record, completed_at))
    }
}
