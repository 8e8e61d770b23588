//! RPC wire models
//!
//! The device answers `getStatus` and `getAllCurves` over HTTP. Both bodies are
//! wrapped in an [`ApiResponse`] envelope.

use serde::{Deserialize, Serialize};

/// Version prefix shared by every endpoint
pub const API_PREFIX: &str = "/api/v0";

/// `getStatus` endpoint, relative to the server URL
pub const STATUS_PATH: &str = "/api/v0/fan/status";

/// `getAllCurves` endpoint, relative to the server URL
pub const CURVES_PATH: &str = "/api/v0/fan/curves";

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "success")]
    Success { data: T },
    #[serde(rename = "error")]
    Error { error: String },
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Create an error response
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    /// Unwrap the envelope into a plain `Result`.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Error { error } => Err(error),
        }
    }
}
