//! API errors

use thiserror::Error;

/// Errors returned by a storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{endpoint} failed with status {status}: {message}")]
    Status {
        /// Endpoint path relative to the base URL
        endpoint: &'static str,

        /// HTTP status code
        status: u16,

        /// Message from the response body
        message: String,
    },

    /// The backend accepted the request but reported `success: false`.
    #[error("{endpoint} was rejected: {message}")]
    Rejected {
        /// Endpoint path relative to the base URL
        endpoint: &'static str,

        /// Message from the response body
        message: String,
    },
}

impl ApiError {
    /// Check whether the backend refused the supplied credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
