//! HTTP client types for backend API communication.
//!
//! This module provides the network access layer for talking to the
//! backend: request descriptions, wire-request construction, the
//! single-attempt transport, and the dispatch coordinator that wraps it
//! all in failover and auth-retry logic.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ApiClient`]: The dispatch coordinator — host failover plus one
//!   token-refresh retry per logical call
//! - [`ApiRequest`]: Trait describing one endpoint call (path, method,
//!   body, query, headers, attachments)
//! - [`Transport`]: Single-attempt HTTP executor with error classification
//! - [`WireRequest`]: A fully assembled request, ready to send
//! - [`Envelope`] / [`EnvelopeList`]: The backend's response envelope
//! - [`NetworkError`]: The closed error taxonomy for everything above
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_api::{ApiClient, HostList, Transport};
//!
//! let client = ApiClient::new(
//!     HostList::new(["https://api-eu.example.com", "https://api-us.example.com"])?,
//!     Transport::new(),
//! );
//!
//! let envelope = client.dispatch(&ProductByIdRequest { id: 42 }).await?;
//! ```
//!
//! # Retry Behavior
//!
//! [`ApiClient::dispatch`] retries on exactly two kinds of failure:
//!
//! - **Transient** (TLS, timeout, connection): fails over to the next host,
//!   at most `hosts.len() - 1` times per call
//! - **Unauthorized** (HTTP 401 or an `errorAuth` envelope): refreshes the
//!   session once through the attached credential store and retries with
//!   the new token; a second authorization failure is terminal
//!
//! Every other error returns immediately.

mod api_client;
mod envelope;
mod errors;
mod request;
mod transport;
mod wire;

pub use api_client::ApiClient;
pub use envelope::{
    classify, EmptyPayload, Envelope, EnvelopeList, Enveloped, OperationResult, ResponseStatus,
};
pub use errors::NetworkError;
pub use request::{ApiRequest, Attachment, HttpMethod};
pub use transport::Transport;
pub use wire::{build_wire_request, WireRequest};
