//! CheckVision - Bank Check Field Extraction
//!
//! This crate forwards a check image to a multimodal AI service, asks for a
//! fixed set of thirteen fields, and normalizes whatever text comes back into
//! a complete record.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
