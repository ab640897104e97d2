//! HTTP adapters - REST API implementations.

pub mod check;

// Re-export key types for convenience
pub use check::{check_app, check_router, CheckAppState};
