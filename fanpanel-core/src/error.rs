//! Error types for the fan panel

use thiserror::Error;

/// Core error type for fan panel operations
#[derive(Error, Debug)]
pub enum FanPanelError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A form field failed its datatype check
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Curve preset not recognized
    #[error("Unknown curve preset: {0}")]
    UnknownPreset(String),

    /// Control mode not recognized
    #[error("Unknown control mode: {0} (expected 'auto' or 'manual')")]
    UnknownMode(String),

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FanPanelError {
    /// Build a validation error for a named form field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FanPanelError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for fan panel operations
pub type Result<T> = std::result::Result<T, FanPanelError>;

impl From<serde_json::Error> for FanPanelError {
    fn from(err: serde_json::Error) -> Self {
        FanPanelError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for FanPanelError {
    fn from(err: toml::de::Error) -> Self {
        FanPanelError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for FanPanelError {
    fn from(err: toml::ser::Error) -> Self {
        FanPanelError::Serialization(err.to_string())
    }
}
