//! Normalized error taxonomy for dashboard operations.
//!
//! Transport details (HTTP status, reqwest errors) are folded into three
//! categories callers can act on: the instance is missing, the backend could
//! not be reached or refused the request, or the input was rejected before
//! any request was made.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Instance could not be resolved by id.
    #[error("instance {id:?} not found")]
    NotFound { id: String },

    /// Transport failure, non-2xx status, or an undecodable response body.
    #[error("network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
        /// Human-readable `message` from the backend's error body, if any.
        server_message: Option<String>,
    },

    /// Input rejected client-side; no request was sent.
    #[error("invalid input: {message}")]
    Validation { message: String },
}

impl DashboardError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
            server_message: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Backend-provided error text, used verbatim in user-facing notices.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Network {
                server_message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}
