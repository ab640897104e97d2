//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod check;

pub use check::{
    AnalyzeCheckCommand, AnalyzeCheckError, AnalyzeCheckHandler, ProbeConnectionHandler,
    ProbeResult,
};
