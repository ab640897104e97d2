//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Vision provider implementations (Gemini, mock)
//! - `http` - Axum REST endpoints

pub mod ai;
pub mod http;

pub use ai::{GeminiConfig, GeminiProvider, MockVisionProvider};
pub use http::{check_app, CheckAppState};
