//! ProbeConnectionHandler - verifies the vision provider answers at all.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::prompt::PROBE_PROMPT;
use crate::ports::{AIError, ProviderInfo, RequestMetadata, VisionProvider, VisionRequest};

/// Outcome of a successful probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Provider that answered.
    pub provider: ProviderInfo,
    /// Text the provider returned, if any.
    pub reply: Option<String>,
}

/// Handler that sends one text-only request.
pub struct ProbeConnectionHandler {
    provider: Arc<dyn VisionProvider>,
}

impl ProbeConnectionHandler {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self) -> Result<ProbeResult, AIError> {
        let metadata = RequestMetadata::new(format!("probe-{}", Uuid::new_v4()));
        let request = VisionRequest::new(PROBE_PROMPT, metadata);

        match self.provider.generate(request).await {
            Ok(response) => {
                info!(model = %response.model, "AI service connection verified");
                Ok(ProbeResult {
                    provider: self.provider.provider_info(),
                    reply: response.text,
                })
            }
            Err(e) => {
                warn!(error = %e, "AI service connection failed");
                Err(e)
            }
        }
    }
}
