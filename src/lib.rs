//! # Commerce API Client
//!
//! A client library for a multi-region commerce backend, providing validated
//! configuration, shared session credentials with single-flight refresh, and
//! an async dispatch layer with host failover for mobile-grade networks.
//!
//! ## Overview
//!
//! This library provides:
//! - Type-safe configuration via [`ApiConfig`] and [`ApiConfigBuilder`],
//!   loadable from the JSON document shipped with the app
//! - An ordered, validated [`HostList`] per API surface with circular
//!   failover on TLS, timeout, and connection errors
//! - A closed [`NetworkError`] taxonomy separating auth-recoverable,
//!   failover-recoverable, and terminal failures
//! - Shared session credentials via [`CredentialStore`], with pluggable
//!   [`SecretStore`] persistence and single-flight token refresh
//! - Declarative endpoint descriptions via the [`ApiRequest`] trait,
//!   including typed query parameters and multipart attachments
//! - [`AuthService`] for phone login and [`MediaService`] for client media,
//!   built on the same dispatch layer
//!
//! ## Quick Start
//!
//! ```rust
//! use commerce_api::{ApiConfig, HostList};
//!
//! // Create configuration using the builder pattern
//! let config = ApiConfig::builder()
//!     .unauthorized_access_token("public-access-token")
//!     .client_login_hosts(
//!         HostList::new(["https://login-eu.example.com", "https://login-us.example.com"])
//!             .unwrap(),
//!     )
//!     .catalog_hosts(HostList::new(["https://catalog-eu.example.com"]).unwrap())
//!     .payments_hosts(HostList::new(["https://pay-eu.example.com"]).unwrap())
//!     .media_hosts(HostList::new(["https://media-eu.example.com"]).unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.client_login_hosts().len(), 2);
//! ```
//!
//! ## Configuration from JSON
//!
//! The same configuration ships with the app as a JSON document:
//!
//! ```rust
//! use commerce_api::ApiConfig;
//!
//! let config = ApiConfig::from_json_str(r#"{
//!     "isLoggingEnabled": false,
//!     "accessKeyEnterprise": "enterprise-key",
//!     "accessTokenForUnauthorizedUser": "public-access-token",
//!     "clientLoginBaseURLs": ["https://login-eu.example.com"],
//!     "catalogBaseURLs": ["https://catalog-eu.example.com"],
//!     "paymentsBaseURLs": ["https://pay-eu.example.com"],
//!     "mediaDataBaseURLs": ["https://media-eu.example.com"]
//! }"#).unwrap();
//!
//! assert_eq!(config.enterprise_access_key(), "enterprise-key");
//! ```
//!
//! ## Signing In
//!
//! Login is phone-based: start a login to receive an SMS code, finish it
//! with the code, and hand the resulting tokens to the credential store:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use commerce_api::{AuthService, CredentialStore, InMemorySecretStore};
//!
//! let auth = Arc::new(AuthService::new(&config));
//! let store = CredentialStore::new(
//!     Arc::new(InMemorySecretStore::new()),
//!     Arc::clone(&auth) as Arc<dyn commerce_api::TokenRefresher>,
//!     config.unauthorized_access_token(),
//! );
//!
//! let started = auth.start_login("+15551234567").await?;
//! let temp_token = started.data.and_then(|d| d.temp_token).unwrap_or_default();
//!
//! let finished = auth.end_login("1234", &temp_token).await?;
//! if let Some(grant) = &finished.data {
//!     store.update_tokens(grant);
//! }
//! assert!(store.is_authenticated());
//! ```
//!
//! ## Making API Requests
//!
//! Endpoints are described declaratively and dispatched through a client
//! bound to one API surface:
//!
//! ```rust,ignore
//! use commerce_api::{ApiClient, ApiRequest, Envelope, Transport};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Product {
//!     id_unique: String,
//!     name: String,
//! }
//!
//! struct ProductByIdRequest {
//!     id: String,
//!     access_token: String,
//! }
//!
//! impl ApiRequest for ProductByIdRequest {
//!     type Body = ();
//!     type Query = ();
//!     type Response = Envelope<Product>;
//!
//!     fn path(&self) -> String {
//!         format!("/catalog/product/{}", self.id)
//!     }
//!
//!     fn token(&self) -> Option<String> {
//!         Some(self.access_token.clone())
//!     }
//! }
//!
//! let client = ApiClient::with_credentials(
//!     config.catalog_hosts().clone(),
//!     Transport::from_config(&config),
//!     store.clone(),
//! );
//!
//! let envelope = client.dispatch(&ProductByIdRequest {
//!     id: "42".to_string(),
//!     access_token: store.access_token(),
//! }).await?;
//! ```
//!
//! ## Failover and Session Refresh
//!
//! [`ApiClient::dispatch`] retries on exactly two kinds of failure. TLS,
//! timeout, and connection errors fail over to the next host in the list,
//! at most `hosts.len() - 1` times per call, and the surviving host stays
//! preferred for later calls. An `Unauthorized` outcome — HTTP 401 or an
//! `errorAuth` envelope — triggers one token refresh through the shared
//! [`CredentialStore`] and one retry with the new token. Concurrent calls
//! that hit `Unauthorized` together share a single refresh exchange.
//! Everything else is terminal and surfaces as a [`NetworkError`].
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and credentials are instance-based
//!   and passed explicitly
//! - **Fail-fast validation**: Configuration validates on construction
//! - **Thread-safe**: All shared types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio async runtime
//! - **Closed error taxonomy**: Every failure maps to one [`NetworkError`]
//!   variant with a defined recovery class

pub mod auth;
pub mod clients;
pub mod config;
pub mod datetime;
pub mod error;
pub mod services;

// Re-export public types at crate root for convenience
pub use auth::{
    AuthError, CredentialStore, InMemorySecretStore, SecretStore, TokenGrant, TokenRefresher,
};
pub use config::{ApiConfig, ApiConfigBuilder, HostList};
pub use error::ConfigError;

// Re-export client and dispatch types
pub use clients::{
    build_wire_request, classify, ApiClient, ApiRequest, Attachment, EmptyPayload, Envelope,
    EnvelopeList, Enveloped, HttpMethod, NetworkError, OperationResult, ResponseStatus, Transport,
    WireRequest,
};

// Re-export service facades
pub use services::{
    AuthService, Comparison, FieldForFilter, FilterAndSort, MediaEntity, MediaKind, MediaService,
    SmsCodeIssued, SortOrder, SortVariant,
};
