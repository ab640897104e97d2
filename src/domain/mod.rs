//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (timestamps, percentages, errors)
//! - `check` - Check fields, upload validation and response normalization

pub mod check;
pub mod foundation;
