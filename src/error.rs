//! Error types for client configuration.
//!
//! This module contains the error types used for configuration and
//! validation failures. Errors raised while dispatching requests live in
//! [`crate::clients::NetworkError`]; errors raised by the credential store
//! live in [`crate::auth::AuthError`].
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and
//! actionable.
//!
//! # Example
//!
//! ```rust
//! use commerce_api::{ConfigError, HostList};
//!
//! let result = HostList::new(Vec::<String>::new());
//! assert!(matches!(result, Err(ConfigError::EmptyHostList)));
//! ```

use thiserror::Error;

/// Errors that can occur while building or loading the client configuration.
///
/// Each variant provides a clear, actionable error message so that a broken
/// deployment configuration is diagnosed at startup rather than at the first
/// failed request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A host list must contain at least one base URL.
    #[error("Host list cannot be empty. Provide at least one base URL per API surface.")]
    EmptyHostList,

    /// A host list entry is blank.
    #[error("Host list entry at index {index} is blank. Every base URL must be a non-empty string.")]
    BlankHost {
        /// Position of the offending entry.
        index: usize,
    },

    /// The fallback access token for unauthenticated sessions is empty.
    #[error("Unauthorized-user access token cannot be empty. Provide the guest token issued for your enterprise.")]
    EmptyUnauthorizedToken,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The JSON configuration document could not be parsed.
    #[error("Invalid configuration document: {reason}")]
    InvalidDocument {
        /// What the parser rejected.
        reason: String,
    },
}
