//! Error handling for texdocx exports
//!
//! This module provides a unified error type and result type for the
//! operations that can actually fail. Segmentation and serialization are
//! total; only packaging, configuration and I/O report errors.

use std::fmt;

/// Export error type
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// The packaging collaborator could not produce a container
    Packaging { message: String },
    /// Invalid input (unknown style name, bad option value)
    InvalidInput { message: String },
    /// Configuration file could not be parsed
    Config {
        message: String,
        path: Option<String>,
    },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Packaging { message } => {
                write!(f, "Packaging failed: {}", message)
            }
            ConversionError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            ConversionError::Config { message, path } => {
                if let Some(p) = path {
                    write!(f, "Config error in {}: {}", p, message)
                } else {
                    write!(f, "Config error: {}", message)
                }
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ConversionError {
    fn from(err: zip::result::ZipError) -> Self {
        ConversionError::Packaging {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "config")]
impl From<toml::de::Error> for ConversionError {
    fn from(err: toml::de::Error) -> Self {
        ConversionError::config(err.message())
    }
}

/// Result type for export operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Non-fatal issue found while serializing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub message: String,
    /// Index of the offending segment
    pub segment: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConversionWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            segment: None,
            suggestion: None,
        }
    }

    pub fn at_segment(mut self, index: usize) -> Self {
        self.segment = Some(index);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(i) = self.segment {
            write!(f, "Warning at segment {}: {}", i, self.message)?;
        } else {
            write!(f, "Warning: {}", self.message)?;
        }
        if let Some(ref sug) = self.suggestion {
            write!(f, " ({})", sug)?;
        }
        Ok(())
    }
}

// Convenience constructors for errors
impl ConversionError {
    pub fn packaging(message: impl Into<String>) -> Self {
        ConversionError::Packaging {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConversionError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConversionError::Config {
            message: message.into(),
            path: None,
        }
    }

    pub fn config_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        ConversionError::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}
