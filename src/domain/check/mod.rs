//! Check module - bank check extraction vocabulary.
//!
//! - [`CheckRecord`] / [`CheckField`] - the fixed 13-field result
//! - [`normalize`] - model text to record, via a strategy chain
//! - [`AnalysisResult`] - a record stamped with confidence and completion time
//! - [`ImagePayload`] / [`MediaType`] - validated uploads

mod analysis;
mod normalizer;
mod record;
mod upload;

pub use analysis::{AnalysisResult, EXTRACTION_CONFIDENCE};
pub use normalizer::{
    extract_raw, normalize, NormalizeError, ParseStrategy, RawExtraction, StrategyFailure,
};
pub use record::{CheckField, CheckRecord, NOT_DETECTED, NOT_FOUND};
pub use upload::{ImagePayload, MediaType, UploadError, MAX_UPLOAD_BYTES};
