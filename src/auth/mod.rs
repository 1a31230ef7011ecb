//! Session credentials and token refresh.
//!
//! This module provides the shared credential state the API clients lean
//! on: token persistence, the refresh flow, and the single-flight
//! coordination that keeps concurrent 401s from stampeding the backend.
//!
//! # Overview
//!
//! - [`CredentialStore`]: Shared session tokens with single-flight refresh
//! - [`SecretStore`]: Pluggable durable storage for tokens (keychain
//!   binding in the app, [`InMemorySecretStore`] in tests)
//! - [`TokenRefresher`]: The network hook that exchanges a refresh token
//!   for a new session
//! - [`TokenGrant`]: The token pair issued by login and refresh calls
//! - [`AuthError`]: Failures of the refresh flow
//!
//! # Session lifecycle
//!
//! While no user is signed in, [`CredentialStore::access_token`] serves the
//! unauthorized-user token, which the backend accepts for public endpoints.
//! A login flow stores its [`TokenGrant`] through
//! [`CredentialStore::update_tokens`]; from then on calls carry the user
//! token, and an `Unauthorized` outcome triggers one refresh-and-retry in
//! [`ApiClient::dispatch`](crate::ApiClient::dispatch). Logout drops both
//! tokens and falls back to the unauthorized-user token.

mod secrets;
mod store;
mod tokens;

pub use secrets::{InMemorySecretStore, SecretStore};
pub use store::{AuthError, CredentialStore, TokenRefresher};
pub use tokens::{TokenGrant, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
