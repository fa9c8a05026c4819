//! Common types and utilities for the xinfer type resolution engine.
//!
//! This crate provides foundational types used across all xinfer crates:
//! - Source spans (`Span`)
//! - Diagnostic categories, codes and message templates
//! - Engine limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Centralized limits and thresholds
pub mod limits;

// Diagnostic types and message lookup
pub mod diagnostics;
pub use diagnostics::{
    DiagnosticCategory, DiagnosticMessage, diagnostic_codes, format_message, get_diagnostic_message,
};
