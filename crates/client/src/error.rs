//! Gateway error type.
//!
//! Stores never let these escape: each action logs the error and records a
//! fixed human-readable message instead. The gateway itself surfaces them
//! unchanged so that callers using it directly can see the full cause.

use reqwest::StatusCode;
use thiserror::Error;

use crate::token::TokenStoreError;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure: connection refused, TLS, timeout, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api { status: StatusCode, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Stored bearer token could not be read.
    #[error("token storage error: {0}")]
    Token(#[from] TokenStoreError),

    /// Stored bearer token contains bytes not allowed in a header.
    #[error("stored token is not a valid header value")]
    InvalidToken,
}

impl GatewayError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the request's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// Whether the backend reported the resource missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
