//! One-attempt request execution.
//!
//! [`Transport`] wraps a [`reqwest::Client`] and executes exactly one
//! attempt per call: send the wire request, map transport-level failures
//! into the error taxonomy, check the HTTP status, and decode the body.
//! Retrying — across hosts or after a token refresh — is the dispatch
//! coordinator's job, never the transport's.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::clients::errors::NetworkError;
use crate::clients::wire::WireRequest;
use crate::config::ApiConfig;

/// Default per-attempt timeout when none is configured.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Executes wire requests over HTTPS.
///
/// The transport is cheap to clone (the inner connection pool is shared)
/// and safe to use from concurrent tasks.
///
/// # Thread Safety
///
/// `Transport` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Clone, Debug)]
pub struct Transport {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Whether to dump requests and responses at debug level.
    verbose: bool,
}

// Verify Transport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Transport>();
};

impl Transport {
    /// Creates a transport with the default timeout and logging disabled.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_TIMEOUT, false)
    }

    /// Creates a transport using the timeout and logging toggle from `config`.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::with_settings(config.request_timeout(), config.logging_enabled())
    }

    /// Creates a transport with an explicit timeout and logging toggle.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn with_settings(timeout: Duration, verbose: bool) -> Self {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, verbose }
    }

    /// Executes one attempt and decodes the JSON response body.
    ///
    /// The HTTP status is checked before decoding: a non-2xx response maps
    /// straight to its taxonomy variant and the body is never parsed.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`NetworkError`] for transport failures, non-2xx
    /// statuses, and bodies that fail to decode into `T`.
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        request: WireRequest,
    ) -> Result<T, NetworkError> {
        let bytes = self.execute(request).await?;
        serde_json::from_slice(&bytes).map_err(NetworkError::from)
    }

    /// Executes one attempt and returns the undecoded response bytes.
    ///
    /// For endpoints that answer with something other than a JSON envelope,
    /// such as binary document downloads.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`NetworkError`] for transport failures and
    /// non-2xx statuses.
    pub async fn dispatch_raw(&self, request: WireRequest) -> Result<Vec<u8>, NetworkError> {
        self.execute(request).await
    }

    async fn execute(&self, request: WireRequest) -> Result<Vec<u8>, NetworkError> {
        if self.verbose {
            log_request(&request);
        }

        let WireRequest {
            url,
            method,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method.into(), url).headers(headers);
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| classify_transport_error(&err))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| classify_transport_error(&err))?;

        if self.verbose {
            log_response(status, &bytes);
        }

        if !status.is_success() {
            return Err(NetworkError::from_status(status.as_u16()));
        }

        Ok(bytes.to_vec())
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a reqwest failure onto the taxonomy.
///
/// TLS must be sniffed before the connect check: certificate failures
/// surface as connect errors, and a failover to another host is the right
/// reaction to them, but they belong to the `Ssl` class.
fn classify_transport_error(err: &reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        return NetworkError::Timeout(err.to_string());
    }
    if mentions_tls(err) {
        return NetworkError::Ssl(err.to_string());
    }
    if err.is_connect() || has_io_source(err) {
        return NetworkError::Network(err.to_string());
    }
    NetworkError::Unknown(err.to_string())
}

/// Walks the source chain looking for TLS/certificate vocabulary.
///
/// reqwest does not expose a TLS predicate, so the classification has to
/// read the chain the way an engineer reads the log line.
fn mentions_tls(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(source) = current {
        let text = source.to_string().to_ascii_lowercase();
        if text.contains("certificate")
            || text.contains("tls")
            || text.contains("ssl")
            || text.contains("handshake")
        {
            return true;
        }
        current = source.source();
    }
    false
}

/// Walks the source chain looking for an I/O error.
///
/// Connection resets and refusals that happen after the connect phase show
/// up as wrapped `std::io::Error`s rather than connect errors.
fn has_io_source(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(source) = current {
        if source.downcast_ref::<std::io::Error>().is_some() {
            return true;
        }
        current = source.source();
    }
    false
}

fn log_request(request: &WireRequest) {
    tracing::debug!("--> {} {}", request.method, request.url);
    for (name, value) in &request.headers {
        if name == AUTHORIZATION {
            tracing::debug!("--> {name}: Bearer ***");
        } else {
            tracing::debug!("--> {name}: {}", value.to_str().unwrap_or("<binary>"));
        }
    }
    if let Some(body) = &request.body {
        tracing::debug!("--> body ({} bytes): {}", body.len(), String::from_utf8_lossy(body));
    }
}

fn log_response(status: StatusCode, body: &[u8]) {
    tracing::debug!("<-- {status} ({} bytes)", body.len());
    if !body.is_empty() {
        tracing::debug!("<-- {}", String::from_utf8_lossy(body));
    }
}
