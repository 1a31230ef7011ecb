//! Configuration types for the commerce API client.
//!
//! This module provides the configuration consumed when wiring up clients
//! and services for the backend's API surfaces.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiConfig`]: The main configuration struct holding all client settings
//! - [`ApiConfigBuilder`]: A builder for constructing [`ApiConfig`] instances
//! - [`HostList`]: A validated, ordered list of base URLs for one API surface
//!
//! Each API surface is served by its own ordered host list; dispatch fails
//! over between the hosts of a list when one becomes unreachable.
//!
//! # Example
//!
//! ```rust
//! use commerce_api::{ApiConfig, HostList};
//!
//! let config = ApiConfig::builder()
//!     .unauthorized_access_token("guest-token")
//!     .client_login_hosts(HostList::single("https://login.example.com").unwrap())
//!     .catalog_hosts(HostList::single("https://catalog.example.com").unwrap())
//!     .payments_hosts(HostList::single("https://payments.example.com").unwrap())
//!     .media_hosts(HostList::single("https://media.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert!(!config.logging_enabled());
//! ```
//!
//! Mobile deployments usually ship the configuration as a JSON document
//! bundled with the app; see [`ApiConfig::from_json_str`].

mod hosts;

pub use hosts::HostList;

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default transport timeout applied to every attempt.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the commerce API client.
///
/// Holds the per-surface host lists, the tokens the backend issues at the
/// enterprise level, and transport-wide settings. Construct it through
/// [`ApiConfig::builder`] or parse it from the bundled JSON document with
/// [`ApiConfig::from_json_str`].
///
/// # Thread Safety
///
/// `ApiConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    logging_enabled: bool,
    unauthorized_access_token: String,
    enterprise_access_key: String,
    client_login_hosts: HostList,
    catalog_hosts: HostList,
    payments_hosts: HostList,
    media_hosts: HostList,
    request_timeout: Duration,
}

impl ApiConfig {
    /// Creates a new builder for constructing an `ApiConfig`.
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Parses the JSON configuration document bundled with the app.
    ///
    /// The document uses the backend's key spelling:
    ///
    /// ```json
    /// {
    ///     "isLoggingEnabled": false,
    ///     "accessKeyEnterprise": "enterprise-key",
    ///     "accessTokenForUnauthorizedUser": "guest-token",
    ///     "clientLoginBaseURLs": ["https://login.example.com"],
    ///     "catalogBaseURLs": ["https://catalog.example.com"],
    ///     "paymentsBaseURLs": ["https://payments.example.com"],
    ///     "mediaDataBaseURLs": ["https://media.example.com"],
    ///     "requestTimeoutSeconds": 60
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDocument`] when the JSON does not match
    /// the expected shape, and any validation error the builder raises for
    /// the parsed values.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_json::from_str(document).map_err(|err| ConfigError::InvalidDocument {
                reason: err.to_string(),
            })?;

        let mut builder = Self::builder()
            .logging_enabled(document.is_logging_enabled)
            .enterprise_access_key(document.access_key_enterprise)
            .unauthorized_access_token(document.access_token_for_unauthorized_user)
            .client_login_hosts(HostList::new(document.client_login_base_urls)?)
            .catalog_hosts(HostList::new(document.catalog_base_urls)?)
            .payments_hosts(HostList::new(document.payments_base_urls)?)
            .media_hosts(HostList::new(document.media_data_base_urls)?);
        if let Some(seconds) = document.request_timeout_seconds {
            builder = builder.request_timeout(Duration::from_secs(seconds));
        }
        builder.build()
    }

    /// Returns whether verbose request/response logging is enabled.
    #[must_use]
    pub const fn logging_enabled(&self) -> bool {
        self.logging_enabled
    }

    /// Returns the access token used before anyone logs in.
    ///
    /// The backend issues a long-lived token scoped to anonymous browsing;
    /// the credential store falls back to it whenever no user token is
    /// stored.
    #[must_use]
    pub fn unauthorized_access_token(&self) -> &str {
        &self.unauthorized_access_token
    }

    /// Returns the enterprise access key sent when starting a login.
    #[must_use]
    pub fn enterprise_access_key(&self) -> &str {
        &self.enterprise_access_key
    }

    /// Returns the host list for the login/token surface.
    #[must_use]
    pub const fn client_login_hosts(&self) -> &HostList {
        &self.client_login_hosts
    }

    /// Returns the host list for the catalog surface.
    #[must_use]
    pub const fn catalog_hosts(&self) -> &HostList {
        &self.catalog_hosts
    }

    /// Returns the host list for the payments surface.
    #[must_use]
    pub const fn payments_hosts(&self) -> &HostList {
        &self.payments_hosts
    }

    /// Returns the host list for the media surface.
    #[must_use]
    pub const fn media_hosts(&self) -> &HostList {
        &self.media_hosts
    }

    /// Returns the per-attempt transport timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

// Verify ApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiConfig>();
};

/// The JSON document shape shipped with the mobile app.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigDocument {
    is_logging_enabled: bool,
    #[serde(default)]
    access_key_enterprise: String,
    access_token_for_unauthorized_user: String,
    #[serde(rename = "clientLoginBaseURLs")]
    client_login_base_urls: Vec<String>,
    #[serde(rename = "catalogBaseURLs")]
    catalog_base_urls: Vec<String>,
    #[serde(rename = "paymentsBaseURLs")]
    payments_base_urls: Vec<String>,
    #[serde(rename = "mediaDataBaseURLs")]
    media_data_base_urls: Vec<String>,
    #[serde(default)]
    request_timeout_seconds: Option<u64>,
}

/// Builder for constructing [`ApiConfig`] instances.
///
/// Required fields are the unauthorized-user access token and the four host
/// lists. Everything else has a sensible default.
///
/// # Defaults
///
/// - `logging_enabled`: `false`
/// - `enterprise_access_key`: empty
/// - `request_timeout`: 60 seconds
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    logging_enabled: Option<bool>,
    unauthorized_access_token: Option<String>,
    enterprise_access_key: Option<String>,
    client_login_hosts: Option<HostList>,
    catalog_hosts: Option<HostList>,
    payments_hosts: Option<HostList>,
    media_hosts: Option<HostList>,
    request_timeout: Option<Duration>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables verbose request/response logging.
    #[must_use]
    pub const fn logging_enabled(mut self, enabled: bool) -> Self {
        self.logging_enabled = Some(enabled);
        self
    }

    /// Sets the access token used for unauthenticated sessions (required).
    #[must_use]
    pub fn unauthorized_access_token(mut self, token: impl Into<String>) -> Self {
        self.unauthorized_access_token = Some(token.into());
        self
    }

    /// Sets the enterprise access key sent when starting a login.
    #[must_use]
    pub fn enterprise_access_key(mut self, key: impl Into<String>) -> Self {
        self.enterprise_access_key = Some(key.into());
        self
    }

    /// Sets the host list for the login/token surface (required).
    #[must_use]
    pub fn client_login_hosts(mut self, hosts: HostList) -> Self {
        self.client_login_hosts = Some(hosts);
        self
    }

    /// Sets the host list for the catalog surface (required).
    #[must_use]
    pub fn catalog_hosts(mut self, hosts: HostList) -> Self {
        self.catalog_hosts = Some(hosts);
        self
    }

    /// Sets the host list for the payments surface (required).
    #[must_use]
    pub fn payments_hosts(mut self, hosts: HostList) -> Self {
        self.payments_hosts = Some(hosts);
        self
    }

    /// Sets the host list for the media surface (required).
    #[must_use]
    pub fn media_hosts(mut self, hosts: HostList) -> Self {
        self.media_hosts = Some(hosts);
        self
    }

    /// Sets the per-attempt transport timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`ApiConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] for an unset required
    /// field and [`ConfigError::EmptyUnauthorizedToken`] when the
    /// unauthorized-user token is blank.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let unauthorized_access_token =
            self.unauthorized_access_token
                .ok_or(ConfigError::MissingRequiredField {
                    field: "unauthorized_access_token",
                })?;
        if unauthorized_access_token.trim().is_empty() {
            return Err(ConfigError::EmptyUnauthorizedToken);
        }
        let client_login_hosts =
            self.client_login_hosts
                .ok_or(ConfigError::MissingRequiredField {
                    field: "client_login_hosts",
                })?;
        let catalog_hosts = self.catalog_hosts.ok_or(ConfigError::MissingRequiredField {
            field: "catalog_hosts",
        })?;
        let payments_hosts = self
            .payments_hosts
            .ok_or(ConfigError::MissingRequiredField {
                field: "payments_hosts",
            })?;
        let media_hosts = self.media_hosts.ok_or(ConfigError::MissingRequiredField {
            field: "media_hosts",
        })?;

        Ok(ApiConfig {
            logging_enabled: self.logging_enabled.unwrap_or(false),
            unauthorized_access_token,
            enterprise_access_key: self.enterprise_access_key.unwrap_or_default(),
            client_login_hosts,
            catalog_hosts,
            payments_hosts,
            media_hosts,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }
}
