//! Failure classification for the caption service.
//!
//! Every failed request lands in one of three buckets, each with its own
//! user-facing message:
//!
//! - **Server**: the service answered with an error status
//! - **Network**: the request went out but no response came back
//! - **Client**: the request could not be built, or its response could not be read
//!
//! None of them is retried; the user has to trigger the action again.

use thiserror::Error;

/// Message shown when the service answered with an error status
pub const SERVER_ERROR_MESSAGE: &str = "Server Error: Unable to generate captions. Please try again!";

/// Message shown when no response was received
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error: No response from server. Please try again!";

/// Message shown when the request failed on this side
pub const CLIENT_ERROR_MESSAGE: &str = "Client Error: Unable to generate captions. Please try again!";

/// Which side of the exchange a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Server,
    Network,
    Client,
}

impl FailureKind {
    /// User-facing message for this kind of failure
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Server => SERVER_ERROR_MESSAGE,
            FailureKind::Network => NETWORK_ERROR_MESSAGE,
            FailureKind::Client => CLIENT_ERROR_MESSAGE,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Server => write!(f, "Server Error"),
            FailureKind::Network => write!(f, "Network Error"),
            FailureKind::Client => write!(f, "Error"),
        }
    }
}

/// Error returned by a caption service call
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service responded with a non-success status
    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    /// No response was received
    #[error("no response from server: {0}")]
    Network(String),

    /// The request could not be constructed or the response not understood
    #[error("client error: {0}")]
    Client(String),
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::Server { .. } => FailureKind::Server,
            ServiceError::Network(_) => FailureKind::Network,
            ServiceError::Client(_) => FailureKind::Client,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }

    /// Builds a server error from a response body, preferring the
    /// `{"detail": ...}` field the service uses for its error payloads.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| match value.get("detail") {
                Some(serde_json::Value::String(detail)) => Some(detail.clone()),
                Some(other) => Some(other.to_string()),
                None => None,
            })
            .unwrap_or_else(|| body.trim().to_string());
        ServiceError::Server { status, detail }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ServiceError::Network(error.to_string())
        } else if let Some(status) = error.status() {
            ServiceError::Server {
                status: status.as_u16(),
                detail: error.to_string(),
            }
        } else if error.is_builder() || error.is_decode() {
            ServiceError::Client(error.to_string())
        } else {
            // connect, request and body failures all mean the exchange
            // never completed
            ServiceError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Client(format!("malformed response: {}", error))
    }
}
