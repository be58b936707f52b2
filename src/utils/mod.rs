//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics for math segments
//! - Export options and TOML configuration
//! - Error types and result types
//! - HTML escaping

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod html;

// Re-export commonly used items
pub use config::{ExportOptions, Palette};
pub use diagnostics::{
    check_document, check_math, format_diagnostics, nesting_depth, CheckResult, Diagnostic,
    DiagnosticLevel, MAX_NESTING_DEPTH,
};
pub use error::{ConversionError, ConversionResult, ConversionWarning};
