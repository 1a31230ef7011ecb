//! The dispatch error taxonomy.
//!
//! Every failure a dispatched request can produce is one of the
//! [`NetworkError`] variants below. The set is closed on purpose: the
//! dispatch coordinator decides retries by matching on it, and callers can
//! exhaustively handle everything the client will ever hand them.
//!
//! # Recoverability
//!
//! Three groups matter to the coordinator:
//!
//! - **Auth-recoverable**: [`NetworkError::Unauthorized`] — triggers one
//!   token refresh followed by one retry of the logical call.
//! - **Failover-recoverable**: [`NetworkError::Ssl`],
//!   [`NetworkError::Timeout`], [`NetworkError::Network`] — the next host in
//!   the list may not reproduce them, so dispatch fails over while budget
//!   remains.
//! - **Terminal**: everything else is returned to the caller as-is.
//!
//! # Example
//!
//! ```rust
//! use commerce_api::NetworkError;
//!
//! let error = NetworkError::from_status(404);
//! assert!(matches!(error, NetworkError::NotFound(_)));
//! assert!(!error.is_transient());
//! ```

use thiserror::Error;

/// Errors produced while dispatching a request.
///
/// Variants carry either the server's human-readable message or the raw
/// status code for the catch-all HTTP ranges. The type is `Clone` so that a
/// single refresh outcome can be shared between every caller attached to the
/// same in-flight refresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The request could not be built, or the server rejected it as malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The session token is missing, expired, or was rejected.
    ///
    /// Raised both for an HTTP 401 and for a response envelope whose domain
    /// status reports an authorization failure. Auth-recoverable.
    #[error("Unauthorized: the session token is missing or expired")]
    Unauthorized,

    /// The server refused access to the resource.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// The resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other client-side HTTP status (402, 405-499).
    #[error("Request failed with status code {0}")]
    Error4xx(u16),

    /// The server failed to process the request (HTTP 500 or an envelope
    /// reporting a server-side fault).
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other server-side HTTP status (501-599).
    #[error("Server failed with status code {0}")]
    Error5xx(u16),

    /// The response body could not be decoded into the expected type.
    #[error("Unable to decode response: {0}")]
    Decoding(String),

    /// The attempt exceeded the transport timeout. Failover-recoverable.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established or was lost.
    /// Failover-recoverable.
    #[error("Network connection failed: {0}")]
    Network(String),

    /// The TLS handshake or certificate validation failed.
    /// Failover-recoverable.
    #[error("Secure connection failed: {0}")]
    Ssl(String),

    /// A failure that fits no other variant.
    #[error("Unknown error: {0}")]
    Unknown(String),

    /// A domain-level failure carrying the server's own message, such as an
    /// envelope with a warning status.
    #[error("{0}")]
    Custom(String),
}

impl NetworkError {
    /// Maps an HTTP status code outside 200-299 to its taxonomy variant.
    ///
    /// 1xx and 3xx statuses are not expected from the backend and fall
    /// through to [`NetworkError::Unknown`].
    #[must_use]
    pub fn from_status(code: u16) -> Self {
        match code {
            400 => Self::BadRequest("The request was rejected by the server".to_string()),
            401 => Self::Unauthorized,
            403 => Self::Forbidden("Access to this resource is denied".to_string()),
            404 => Self::NotFound("The requested resource does not exist".to_string()),
            402 | 405..=499 => Self::Error4xx(code),
            500 => Self::ServerError("The server failed to process the request".to_string()),
            501..=599 => Self::Error5xx(code),
            _ => Self::Unknown(format!("Unexpected HTTP status {code}")),
        }
    }

    /// Returns `true` for errors a different host may not reproduce.
    ///
    /// These are the only errors the dispatch coordinator answers with a
    /// host failover.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Ssl(_) | Self::Timeout(_) | Self::Network(_))
    }

    /// Returns `true` when a token refresh may make a retry succeed.
    #[must_use]
    pub const fn is_auth_recoverable(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decoding(err.to_string())
    }
}
