//! The `{status, message, data|errors}` envelope wrapping every API response

use serde::{Deserialize, Serialize};

use super::error::Error;

/// A response envelope, discriminated by its `status` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiEnvelope<T> {
    /// `"status": "success"`
    Success(ApiSuccess<T>),
    /// `"status": "error"`
    Error(ApiError),
}

/// Body of a successful envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    /// Human readable message
    #[serde(default)]
    pub message: String,
    /// The payload. Absent or `null` when the API had nothing to return.
    pub data: Option<T>,
}

/// Body of an error envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human readable message
    #[serde(default)]
    pub message: String,
    /// Opaque error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap a success envelope, turning an error envelope into [`Error::Api`].
    pub fn into_success(self) -> Result<ApiSuccess<T>, Error> {
        match self {
            ApiEnvelope::Success(success) => Ok(success),
            ApiEnvelope::Error(error) => Err(error.into()),
        }
    }
}

impl From<ApiError> for Error {
    fn from(value: ApiError) -> Self {
        Error::Api {
            message: value.message,
            errors: value.errors,
        }
    }
}
