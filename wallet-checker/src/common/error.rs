//! Top-level error type for the wallet checker

use reqwest::StatusCode;

/// Message shown when the dataset has no entry for the queried wallet.
pub const NOT_FOUND_MESSAGE: &str = "Wallet no encontrada en el dataset.";

/// Message shown when the verification could not be completed.
pub const RETRY_MESSAGE: &str = "No se pudo verificar la wallet. Intenta nuevamente.";

/// Errors occurring from the wallet checker's API calls and configuration
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request was rejected by the API. This may refer to a missing or
    /// improperly formatted parameter or request body property
    #[error("HTTP request failed with status code {0}: {1}")]
    HttpRequest(StatusCode, String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Mismatch between the expected envelope and what is returned by the API
    #[error("Invalid API response structure")]
    InvalidApiResponse,

    /// The API answered with an error envelope
    #[error("API error: {message}")]
    Api {
        /// Human readable message from the envelope
        message: String,
        /// Opaque error details, if the API sent any
        errors: Option<serde_json::Value>,
    },

    /// The API refused the credentials of the caller
    #[error("Unauthorized access")]
    Unauthorized,

    /// Internal error
    #[error("Internal server error")]
    InternalServer,

    /// Server may be unavailable or not ready to handle the request
    #[error("Service unavailable")]
    ServiceUnavailable,

    /// Request timeout error
    #[error("Request timeout")]
    RequestTimeout,

    /// The wallet is not part of the risk dataset. This is a domain miss,
    /// not a transport failure.
    #[error("Wallet {0} not found in the dataset")]
    NotFound(String),
}

impl Error {
    /// The user facing message stored in the wallet state for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::NotFound(_) => NOT_FOUND_MESSAGE,
            _ => RETRY_MESSAGE,
        }
    }
}
