//! Error types for Synapse
//!
//! This module defines the error taxonomy used by the backend clients and
//! the command handlers, using `thiserror` for ergonomic error handling.
//!
//! Every failure coming back from the backend falls into one of three
//! [`ErrorCategory`] buckets: authorization failures (HTTP 401), business
//! failures (any other non-2xx with a message) and network/unknown failures.

use thiserror::Error;

/// Message shown when an authenticated call comes back with HTTP 401
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Main error type for Synapse operations
#[derive(Error, Debug)]
pub enum SynapseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend rejected the credentials (HTTP 401)
    ///
    /// The local session token has already been cleared when this is raised.
    #[error("{0}")]
    Unauthorized(String),

    /// The backend answered with a non-success status and a message
    #[error("{message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Message from the response body, or the operation fallback
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 2xx with a body that could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// No session token is stored locally
    #[error("Not logged in. Run `synapse login` first.")]
    NotAuthenticated,

    /// Input rejected before any request was made
    #[error("{0}")]
    InvalidInput(String),

    /// Token storage errors (file store)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Coarse classification of a failure, used to decide what the user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// HTTP 401: the session is gone and the user must log in again
    Authorization,
    /// Non-2xx response carrying a message that is shown verbatim
    Business,
    /// Anything else; shown with a generic message
    Network,
}

impl SynapseError {
    /// Classify this error
    ///
    /// # Examples
    ///
    /// ```
    /// use synapse::error::{ErrorCategory, SynapseError};
    ///
    /// let err = SynapseError::Api { status: 400, message: "Invalid URL".into() };
    /// assert_eq!(err.category(), ErrorCategory::Business);
    /// ```
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::NotAuthenticated => ErrorCategory::Authorization,
            Self::Api { .. } | Self::InvalidInput(_) => ErrorCategory::Business,
            _ => ErrorCategory::Network,
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for Synapse operations
///
/// Uses `anyhow::Error` so command code can attach context; callers that
/// need the category downcast to [`SynapseError`].
pub type Result<T> = anyhow::Result<T>;

/// Render an error the way the views surface it to the user
///
/// Authorization and business failures are shown verbatim. Everything else
/// is replaced by `fallback` so transport noise never reaches the screen.
///
/// # Examples
///
/// ```
/// use synapse::error::{user_message, SynapseError};
///
/// let err: anyhow::Error = SynapseError::Network("connection refused".into()).into();
/// assert_eq!(user_message(&err, "Failed to get answer"), "Failed to get answer");
/// ```
pub fn user_message(err: &anyhow::Error, fallback: &str) -> String {
    match err.downcast_ref::<SynapseError>() {
        Some(e) => match e.category() {
            ErrorCategory::Authorization | ErrorCategory::Business => e.to_string(),
            ErrorCategory::Network => fallback.to_string(),
        },
        None => fallback.to_string(),
    }
}

/// Whether `err` is an authorization failure (401 or missing token)
pub fn is_unauthorized(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SynapseError>()
        .map(|e| e.category() == ErrorCategory::Authorization)
        .unwrap_or(false)
}
