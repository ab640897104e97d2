//! Extraction response normalizer.
//!
//! Turns the free-form text a model generates into a total [`CheckRecord`].
//! Models frequently wrap their JSON in markdown fences or surround it with
//! prose, so the text is run through an ordered chain of pure parsing
//! strategies and the first one that yields a JSON object wins:
//!
//! 1. [`ParseStrategy::WholeText`] - the whole text is a JSON object.
//! 2. [`ParseStrategy::FencedBlock`] - the interior of a ```` ```json ```` fence.
//! 3. [`ParseStrategy::LastBraceSpan`] - the last `{...}` span in the text.
//!
//! The resulting [`RawExtraction`] is then coerced field by field: truthy
//! values are copied as strings, everything else becomes the field's sentinel.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use super::record::{CheckField, CheckRecord};

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("JSON fence pattern is valid")
});

/// Untyped field mapping proposed by the model, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExtraction(Map<String, Value>);

impl RawExtraction {
    /// Wraps an already-parsed JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the raw value proposed for a key, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of keys the model returned, known or not.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the model returned an empty object.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coerces the mapping into a total record.
    ///
    /// Each known field is handled independently; unknown keys are dropped.
    pub fn into_record(self) -> CheckRecord {
        let mut record = CheckRecord::default();
        for field in CheckField::ALL {
            if let Some(value) = self.0.get(field.key()).and_then(truthy_string) {
                record.set(field, value);
            }
        }
        record
    }
}

impl From<&CheckRecord> for RawExtraction {
    fn from(record: &CheckRecord) -> Self {
        let fields = record
            .iter()
            .map(|(field, value)| (field.key().to_string(), Value::String(value.to_string())))
            .collect();
        Self(fields)
    }
}

/// Copies a truthy JSON value as a string.
///
/// Falsy values are `null`, `false`, `""` and `0`; strings are kept verbatim,
/// other values use their JSON text.
fn truthy_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// One way of locating a JSON object inside model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    WholeText,
    FencedBlock,
    LastBraceSpan,
}

impl ParseStrategy {
    /// Strategies in the order they are attempted.
    pub const CHAIN: [ParseStrategy; 3] = [
        ParseStrategy::WholeText,
        ParseStrategy::FencedBlock,
        ParseStrategy::LastBraceSpan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParseStrategy::WholeText => "whole_text",
            ParseStrategy::FencedBlock => "fenced_block",
            ParseStrategy::LastBraceSpan => "last_brace_span",
        }
    }

    /// Runs this strategy against the model text.
    pub fn attempt(self, text: &str) -> Result<RawExtraction, StrategyFailure> {
        match self {
            ParseStrategy::WholeText => parse_object(text),
            ParseStrategy::FencedBlock => {
                let captures = JSON_FENCE
                    .captures(text)
                    .ok_or(StrategyFailure::NoCandidate)?;
                let interior = captures.get(1).map_or("", |m| m.as_str());
                parse_object(interior)
            }
            ParseStrategy::LastBraceSpan => last_brace_span(text),
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a single strategy did not produce an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyFailure {
    #[error("no candidate found")]
    NoCandidate,

    #[error("candidate is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("candidate is JSON but not an object")]
    NotAnObject,
}

/// Normalization failure: every strategy in the chain was exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Failed to parse AI response")]
    Unparseable {
        /// Failure reported by each strategy, in chain order.
        attempts: Vec<(ParseStrategy, StrategyFailure)>,
    },
}

fn parse_object(candidate: &str) -> Result<RawExtraction, StrategyFailure> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(fields)) => Ok(RawExtraction(fields)),
        Ok(_) => Err(StrategyFailure::NotAnObject),
        Err(e) => Err(StrategyFailure::InvalidJson(e.to_string())),
    }
}

/// Tries every `{` ... last `}` span, starting from the rightmost opening
/// brace. The greedy first-`{`-to-last-`}` span is the final candidate, so a
/// trailing object wins over one preceded by prose.
fn last_brace_span(text: &str) -> Result<RawExtraction, StrategyFailure> {
    let end = text.rfind('}').ok_or(StrategyFailure::NoCandidate)?;
    let mut failure = StrategyFailure::NoCandidate;

    for (start, _) in text[..end].rmatch_indices('{') {
        match parse_object(&text[start..=end]) {
            Ok(raw) => return Ok(raw),
            Err(e) => failure = e,
        }
    }

    Err(failure)
}

/// Locates the JSON object in model text using the strategy chain.
pub fn extract_raw(text: &str) -> Result<RawExtraction, NormalizeError> {
    let mut attempts = Vec::with_capacity(ParseStrategy::CHAIN.len());

    for strategy in ParseStrategy::CHAIN {
        match strategy.attempt(text) {
            Ok(raw) => {
                tracing::debug!(strategy = %strategy, keys = raw.len(), "Parsed model output");
                return Ok(raw);
            }
            Err(failure) => attempts.push((strategy, failure)),
        }
    }

    Err(NormalizeError::Unparseable { attempts })
}

/// Converts model text into a total check record.
pub fn normalize(text: &str) -> Result<CheckRecord, NormalizeError> {
    extract_raw(text).map(RawExtraction::into_record)
}
