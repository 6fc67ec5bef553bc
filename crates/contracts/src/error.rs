//! Layered error definitions
//!
//! Categorized by source: config / record / source / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Record Errors =====
    /// A detection record field is missing or malformed
    #[error("invalid record field '{field}': {message}")]
    InvalidRecord { field: String, message: String },

    // ===== Source Errors =====
    /// Source download failed
    #[error("source fetch error for '{url}': {message}")]
    SourceFetch { url: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invalid record error
    pub fn invalid_record(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source fetch error
    pub fn source_fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceFetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
