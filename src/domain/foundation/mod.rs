//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects that form the vocabulary of the
//! CheckVision domain.

mod percentage;
mod timestamp;

pub use percentage::Percentage;
pub use timestamp::Timestamp;
