//! AnalysisResult - a normalized record stamped at completion.

use serde::{Serialize, Serializer};

use super::record::CheckRecord;
use crate::domain::foundation::{Percentage, Timestamp};

/// Confidence reported for every extraction.
///
/// The model gives no quality signal, so this is a fixed value rather than a
/// score.
pub const EXTRACTION_CONFIDENCE: Percentage = Percentage::new(95);

/// Result of one successful analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(flatten)]
    record: CheckRecord,
    extraction_confidence: Percentage,
    #[serde(serialize_with = "serialize_unix_millis")]
    processing_time: Timestamp,
}

impl AnalysisResult {
    /// Wraps a record, stamping the fixed confidence and the given completion time.
    pub fn new(record: CheckRecord, completed_at: Timestamp) -> Self {
        Self {
            record,
            extraction_confidence: EXTRACTION_CONFIDENCE,
            processing_time: completed_at,
        }
    }

    pub fn record(&self) -> &CheckRecord {
        &self.record
    }

    pub fn extraction_confidence(&self) -> Percentage {
        self.extraction_confidence
    }

    pub fn processing_time(&self) -> Timestamp {
        self.processing_time
    }
}

fn serialize_unix_millis<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(ts.as_unix_millis())
}
