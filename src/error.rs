//! Error types for ddlkit.

use thiserror::Error;

/// The main error type for ddlkit operations.
#[derive(Debug, Error)]
pub enum DdlError {
    /// The active dialect has no mapping for a column's type.
    #[error("Database does not support type '{type_name}' [{column}]")]
    UnsupportedType { type_name: String, column: String },

    /// Failed to parse a textual field type.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A declarative schema file is inconsistent.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML decoding error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DdlError {
    /// Create an unsupported type error for the given column.
    pub fn unsupported(type_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            column: column.into(),
        }
    }

    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for ddlkit operations.
pub type DdlResult<T> = Result<T, DdlError>;
