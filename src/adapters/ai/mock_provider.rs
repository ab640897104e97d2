//! Mock Vision Provider for testing.
//!
//! Provides a configurable mock implementation of the VisionProvider port,
//! allowing tests to run without calling the real Gemini API.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockVisionProvider::new()
//!     .with_response(r#"{"bankName": "First Bank"}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = provider.generate(request).await?;
//! assert_eq!(provider.call_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, ProviderInfo, VisionProvider, VisionRequest, VisionResponse};

/// Mock vision provider for testing.
#[derive(Debug, Clone)]
pub struct MockVisionProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<VisionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return generated text.
    Text(String),
    /// Return a response without any generated text.
    Empty,
    /// Return an error.
    Error(AIError),
}

impl Default for MockVisionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVisionProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-vision-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a text response to the queue.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockResponse::Text(text.into()))
    }

    /// Adds a response with no generated text.
    pub fn with_empty_response(self) -> Self {
        self.push(MockResponse::Empty)
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: AIError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<VisionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Gets the next response or a default empty object.
    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text("{}".to_string()))
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn generate(&self, request: VisionRequest) -> Result<VisionResponse, AIError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Text(text) => Ok(VisionResponse::text(text, &self.info.model)),
            MockResponse::Empty => Ok(VisionResponse::empty(&self.info.model)),
            MockResponse::Error(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
