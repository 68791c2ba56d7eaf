// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the FGSM client
//!
//! Every failure the client can surface maps onto one variant here.
//! Attack submission failures follow a fixed taxonomy so the caller can
//! show a distinct message per class via [`Error::user_message`].

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Generic message used when a non-2xx body carries no usable text
pub const GENERIC_SERVER_ERROR: &str = "Server error. Please try again later.";

/// Message used when a request was sent but nothing came back
pub const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please check your connection and try again.";

/// Main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    /// Local input check failed; never reaches the network
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 2xx response whose payload carries an `error` field
    #[error("Server reported an error: {0}")]
    ServerReported(String),

    /// Request was sent but no response arrived (network down, timeout)
    #[error("No response from {url}: {reason}")]
    TransportNoResponse { url: String, reason: String },

    /// Non-2xx response with a body
    #[error("Server responded with {status}: {message}")]
    TransportErrorResponse { status: u16, message: String },

    /// Request could not be constructed or sent
    #[error("Request setup failed: {0}")]
    ClientSetup(String),

    /// Stored token is malformed or expired
    #[error("Token invalid: {0}")]
    TokenInvalid(String),

    /// A submission is already in flight on this orchestrator
    #[error("An attack submission is already in progress")]
    SubmissionInFlight,

    /// 2xx response that does not decode as the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Login or registration rejected
    #[error("Authentication failed: {reason}")]
    Authentication { reason: String, status: Option<u16> },

    /// Durable storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown route path
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Builder errors mean the request never left the client. Anything
        // else happened after dispatch without a usable response.
        if err.is_builder() {
            return Error::ClientSetup(err.to_string());
        }

        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };

        Error::TransportNoResponse { url, reason }
    }
}

impl Error {
    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Create a server-reported error
    pub fn server_reported<S: Into<String>>(msg: S) -> Self {
        Error::ServerReported(msg.into())
    }

    /// Create a no-response transport error
    pub fn no_response(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::TransportNoResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an error-response transport error
    pub fn error_response(status: u16, message: impl Into<String>) -> Self {
        Error::TransportErrorResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a client setup error
    pub fn client_setup<S: Into<String>>(msg: S) -> Self {
        Error::ClientSetup(msg.into())
    }

    /// Create an authentication error
    pub fn auth(reason: impl Into<String>, status: Option<u16>) -> Self {
        Error::Authentication {
            reason: reason.into(),
            status,
        }
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a local validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if this failed at the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::TransportNoResponse { .. }
                | Error::TransportErrorResponse { .. }
                | Error::ClientSetup(_)
        )
    }

    /// Check if retrying might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::TransportNoResponse { .. } => true,
            Error::TransportErrorResponse { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::TransportErrorResponse { status, .. } => Some(*status),
            Error::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Message suitable for showing to the user in a blocking alert
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::ServerReported(msg) => msg.clone(),
            Error::TransportNoResponse { .. } => NO_RESPONSE_MESSAGE.to_string(),
            Error::TransportErrorResponse { message, .. } => {
                if message.trim().is_empty() {
                    GENERIC_SERVER_ERROR.to_string()
                } else {
                    message.clone()
                }
            }
            Error::ClientSetup(msg) => msg.clone(),
            Error::Authentication { reason, .. } => reason.clone(),
            Error::SubmissionInFlight => "An attack is already running.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Wrap any error as a client setup failure with a context prefix
    fn setup_context(self, msg: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn setup_context(self, msg: &str) -> Result<T> {
        self.map_err(|e| Error::ClientSetup(format!("{}: {}", msg, e)))
    }
}
