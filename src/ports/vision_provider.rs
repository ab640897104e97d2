//! Vision Provider Port - Interface for multimodal model integrations.
//!
//! This port abstracts the single call CheckVision makes to a generative model:
//! a text prompt plus an optional inline image in, generated text out. The
//! application layer never sees provider wire formats or credentials.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl VisionProvider for EchoProvider {
//!     async fn generate(&self, request: VisionRequest) -> Result<VisionResponse, AIError> {
//!         Ok(VisionResponse::text(request.prompt, "echo"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo-1")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for multimodal generation.
///
/// Implementations make exactly one outbound request per call. Retrying is
/// the caller's decision, and CheckVision never retries.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Generate content for a prompt and optional inline image.
    async fn generate(&self, request: VisionRequest) -> Result<VisionResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a single generation.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// Instruction text, sent before the image.
    pub prompt: String,
    /// Image sent alongside the prompt, if any.
    pub image: Option<InlineImage>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl VisionRequest {
    /// Creates a text-only request.
    pub fn new(prompt: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            metadata,
        }
    }

    /// Attaches an inline image.
    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }
}

/// Base64-encoded image bytes with their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Trace ID for correlating logs across the round trip.
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }
}

/// Response from a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionResponse {
    /// First generated text segment, or `None` if the provider produced none.
    pub text: Option<String>,
    /// Model that generated the response.
    pub model: String,
    /// Provider-reported reason generation stopped, when present.
    pub finish_reason: Option<String>,
}

impl VisionResponse {
    /// Creates a response carrying generated text.
    pub fn text(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            model: model.into(),
            finish_reason: None,
        }
    }

    /// Creates a response with no generated text.
    pub fn empty(model: impl Into<String>) -> Self {
        Self {
            text: None,
            model: model.into(),
            finish_reason: None,
        }
    }

    /// Sets the finish reason.
    pub fn with_finish_reason(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini").
    pub name: String,
    /// Model identifier (e.g., "gemini-1.5-flash").
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Vision provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    /// Provider answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Upstream error message, or a generic fallback.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Failed to parse provider response body.
    #[error("parse error: {0}")]
    Parse(String),
}

impl AIError {
    /// Creates a service error.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Human-readable message suitable for an end user.
    pub fn user_message(&self) -> String {
        match self {
            AIError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
