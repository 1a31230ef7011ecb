//! The dispatch coordinator.
//!
//! [`ApiClient`] owns one API surface: an ordered host list, a transport,
//! and optionally a credential store. It runs the retry state machine around
//! the single-attempt transport — host failover for transient errors, one
//! token-refresh retry for authorization failures — and hands every other
//! outcome straight back to the caller.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::auth::CredentialStore;
use crate::clients::envelope::classify;
use crate::clients::errors::NetworkError;
use crate::clients::request::ApiRequest;
use crate::clients::transport::Transport;
use crate::clients::wire::build_wire_request;
use crate::config::HostList;

/// Dispatches request descriptions against one API surface.
///
/// # Failover
///
/// Transient errors — TLS, timeout, connection — advance to the next host
/// in the list, wrapping around, with at most `hosts.len() - 1` failovers
/// per logical call; when the budget is spent the last transient error is
/// returned. The host cursor is sticky: once a call settles on a host,
/// later calls start there instead of re-probing a region that was just
/// observed down. Each call works on its own snapshot of the cursor, so a
/// failover in one task never moves another task's in-flight attempt.
///
/// # Auth retry
///
/// When a credential store is attached and an attempt resolves to
/// [`NetworkError::Unauthorized`] — whether from an HTTP 401 or from the
/// response envelope — the coordinator refreshes the session once and
/// retries the same logical request with the refreshed token. A second
/// authorization failure is terminal, as is any refresh failure. Without a
/// credential store, `Unauthorized` is terminal immediately; clients built
/// this way serve the login endpoints themselves.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync`; one instance per API surface is meant to be
/// shared across tasks.
///
/// # Example
///
/// ```rust,ignore
/// use commerce_api::{ApiClient, Transport, HostList};
///
/// let client = ApiClient::new(
///     HostList::new(["https://api-eu.example.com", "https://api-us.example.com"])?,
///     Transport::new(),
/// );
///
/// let envelope = client.dispatch(&ProductByIdRequest { id }).await?;
/// ```
pub struct ApiClient {
    hosts: HostList,
    transport: Transport,
    credentials: Option<CredentialStore>,
    /// Preferred host index, shared across calls (sticky failover).
    cursor: AtomicUsize,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a client without a credential store.
    ///
    /// Authorization failures are terminal for this client. The auth
    /// service uses this constructor for the login surface; everything else
    /// normally wants [`ApiClient::with_credentials`].
    #[must_use]
    pub fn new(hosts: HostList, transport: Transport) -> Self {
        Self {
            hosts,
            transport,
            credentials: None,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Creates a client that recovers from authorization failures through
    /// `credentials`.
    #[must_use]
    pub fn with_credentials(
        hosts: HostList,
        transport: Transport,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            hosts,
            transport,
            credentials: Some(credentials),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Returns the host list this client dispatches against.
    #[must_use]
    pub const fn hosts(&self) -> &HostList {
        &self.hosts
    }

    /// Returns the base URL new calls currently prefer.
    #[must_use]
    pub fn current_host(&self) -> &str {
        self.hosts.get(self.cursor.load(Ordering::Relaxed))
    }

    /// Dispatches a request description and classifies its envelope.
    ///
    /// Runs the full retry state machine described on [`ApiClient`]. The
    /// request description itself is immutable: every attempt rebuilds the
    /// wire request from it, changing only the target host and — after a
    /// refresh — the bearer token.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`NetworkError`] once retry budgets are spent
    /// or a non-recoverable error occurs. Construction failures
    /// ([`NetworkError::BadRequest`]) never consume a retry.
    pub async fn dispatch<R: ApiRequest>(&self, request: &R) -> Result<R::Response, NetworkError> {
        let mut host_index = self.cursor.load(Ordering::Relaxed) % self.hosts.len();
        let mut failovers: usize = 0;
        let mut auth_retry_spent = false;
        let mut token_override: Option<String> = None;

        loop {
            let base_url = self.hosts.get(host_index);
            let wire = build_wire_request(request, base_url, token_override.as_deref())?;

            let outcome = self
                .transport
                .dispatch::<R::Response>(wire)
                .await
                .and_then(classify);

            match outcome {
                Ok(envelope) => return Ok(envelope),
                Err(NetworkError::Unauthorized) if !auth_retry_spent => {
                    let Some(store) = &self.credentials else {
                        return Err(NetworkError::Unauthorized);
                    };
                    tracing::debug!("Session token rejected; refreshing before one retry");
                    store.refresh().await.map_err(NetworkError::from)?;
                    token_override = Some(store.access_token());
                    auth_retry_spent = true;
                }
                Err(err) if err.is_transient() && failovers + 1 < self.hosts.len() => {
                    host_index = self.hosts.next_index(host_index);
                    failovers += 1;
                    self.cursor.store(host_index, Ordering::Relaxed);
                    tracing::warn!(
                        "{err}; failing over to host {}",
                        self.hosts.get(host_index)
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("hosts", &self.hosts)
            .field("current_host", &self.current_host())
            .field("has_credentials", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}
