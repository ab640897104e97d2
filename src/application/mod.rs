//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod progress;

pub use handlers::{
    AnalyzeCheckCommand, AnalyzeCheckError, AnalyzeCheckHandler, ProbeConnectionHandler,
    ProbeResult,
};
pub use progress::{ProgressEstimator, ProgressHandle};
