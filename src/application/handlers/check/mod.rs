//! Check analysis handlers.

mod analyze_check;
mod probe_connection;
mod prompt;

pub use analyze_check::{
    AnalyzeCheckCommand, AnalyzeCheckError, AnalyzeCheckHandler, MISSING_CREDENTIAL_MESSAGE,
};
pub use probe_connection::{ProbeConnectionHandler, ProbeResult};
pub use prompt::{extraction_prompt, PROBE_PROMPT};
