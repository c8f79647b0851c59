//! Error types for the todo client

use thiserror::Error;

/// Errors that can occur when talking to the todo store
///
/// `Clone` so a failure can travel inside view actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The store could not be reached (connect failure, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The store answered with an error status
    #[error("Store rejected request (status {status}, {code}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error code from the body, or `HTTP_<status>` when absent
        code: String,
        /// Error message from the body
        message: String,
    },

    /// The response body was not what the store should send
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// Input refused before any request was made
    #[error("{0}")]
    Validation(String),
}

/// Shown for every failure the user cannot fix by editing their input
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl ClientError {
    /// Text for a transient notice
    ///
    /// Only the local pre-check surfaces its own message; store-side and
    /// transport failures all read the same.
    #[must_use]
    pub fn notice(&self) -> &str {
        match self {
            Self::Validation(message) => message,
            Self::Transport(_) | Self::Rejected { .. } | Self::Decode(_) => GENERIC_FAILURE,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
