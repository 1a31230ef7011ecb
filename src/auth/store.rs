//! Shared session credentials with single-flight refresh.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::watch;

use crate::auth::secrets::SecretStore;
use crate::auth::tokens::{TokenGrant, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::clients::{Envelope, NetworkError, ResponseStatus};

/// Errors from the token refresh flow.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No refresh token is stored, so a new session cannot be obtained.
    #[error("Tokens could not be refreshed")]
    RefreshTokenMissing,

    /// The backend answered the refresh call with a non-success envelope.
    #[error("Token refresh failed with status: {0}")]
    RefreshRejected(ResponseStatus),

    /// The refresh call itself failed on the network layer.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl From<AuthError> for NetworkError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Network(inner) => inner,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Exchanges a refresh token for a fresh [`TokenGrant`].
///
/// The production implementation is
/// [`AuthService`](crate::services::AuthService), which dispatches the
/// exchange over the login hosts with failover but without auth retry.
/// Tests substitute their own.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Performs the network exchange and returns the raw envelope.
    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<Envelope<TokenGrant>, NetworkError>;
}

type RefreshFuture = Shared<BoxFuture<'static, Result<(), AuthError>>>;

#[derive(Default)]
struct CachedTokens {
    access: Option<String>,
    refresh: Option<String>,
}

struct StoreInner {
    secrets: Arc<dyn SecretStore>,
    refresher: Arc<dyn TokenRefresher>,
    /// Sentinel bearer token served while no user session exists.
    unauthorized_token: String,
    tokens: RwLock<CachedTokens>,
    /// The in-flight refresh, if any. `Some` exactly while the detached
    /// refresh task is running.
    refresh_slot: Mutex<Option<RefreshFuture>>,
    authenticated_tx: watch::Sender<bool>,
    authenticated_rx: watch::Receiver<bool>,
}

/// Shared session credentials for the whole app.
///
/// One store instance backs every API surface. It caches the current token
/// pair in memory, persists it through a [`SecretStore`], and refreshes it
/// on demand through a [`TokenRefresher`]. While no user is signed in,
/// [`CredentialStore::access_token`] serves the unauthorized-user token the
/// backend accepts for public endpoints.
///
/// `CredentialStore` is a cheap handle: clones share one underlying store,
/// the same way `reqwest::Client` clones share a connection pool.
///
/// # Single-flight refresh
///
/// [`CredentialStore::refresh`] coalesces concurrent callers onto one
/// network exchange. The first caller starts a detached refresh task and
/// every caller that arrives while it runs awaits the same shared outcome,
/// so N concurrent 401s produce exactly one refresh call. The task is
/// detached: callers that go away early do not cancel the refresh, and its
/// result still lands in the store.
///
/// # Thread Safety
///
/// All methods take `&self`; the store is `Send + Sync` and meant to be
/// shared freely across tasks.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use commerce_api::{CredentialStore, InMemorySecretStore};
///
/// let store = CredentialStore::new(
///     Arc::new(InMemorySecretStore::new()),
///     Arc::new(auth_service),
///     config.unauthorized_access_token(),
/// );
///
/// store.refresh().await?;
/// assert!(store.is_authenticated());
/// ```
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<StoreInner>,
}

// Verify CredentialStore is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialStore>();
};

impl CredentialStore {
    /// Creates a store over the given persistence and refresh hooks.
    ///
    /// Tokens already present in `secrets` are loaded immediately, so a
    /// session persisted by a previous run is live from the first call.
    /// `unauthorized_token` is served by [`CredentialStore::access_token`]
    /// whenever no user session exists.
    #[must_use]
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        refresher: Arc<dyn TokenRefresher>,
        unauthorized_token: impl Into<String>,
    ) -> Self {
        let access = load_text_secret(secrets.as_ref(), ACCESS_TOKEN_KEY);
        let refresh = load_text_secret(secrets.as_ref(), REFRESH_TOKEN_KEY);
        let (authenticated_tx, authenticated_rx) = watch::channel(refresh.is_some());

        Self {
            inner: Arc::new(StoreInner {
                secrets,
                refresher,
                unauthorized_token: unauthorized_token.into(),
                tokens: RwLock::new(CachedTokens { access, refresh }),
                refresh_slot: Mutex::new(None),
                authenticated_tx,
                authenticated_rx,
            }),
        }
    }

    /// Returns the bearer token calls should carry right now.
    ///
    /// Resolution order: in-memory cache, then the secret store, then the
    /// unauthorized-user token. Never empty as long as the store was built
    /// with a non-blank unauthorized token.
    #[must_use]
    pub fn access_token(&self) -> String {
        self.inner.token_or(ACCESS_TOKEN_KEY, CachedField::Access, || {
            self.inner.unauthorized_token.clone()
        })
    }

    /// Returns the stored refresh token, or an empty string when none exists.
    #[must_use]
    pub fn refresh_token(&self) -> String {
        self.inner
            .token_or(REFRESH_TOKEN_KEY, CachedField::Refresh, String::new)
    }

    /// Returns `true` while a user session's refresh token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        *self.inner.authenticated_rx.borrow()
    }

    /// Returns a watch channel that tracks [`CredentialStore::is_authenticated`].
    ///
    /// The receiver yields the current value immediately and a change
    /// notification whenever a login, refresh, or logout flips the state.
    #[must_use]
    pub fn watch_authenticated(&self) -> watch::Receiver<bool> {
        self.inner.authenticated_rx.clone()
    }

    /// Stores the tokens carried by `grant`, field by field.
    ///
    /// A field the grant omits is left untouched, matching the backend's
    /// partial-rotation behavior. Login flows call this with the envelope
    /// payload; [`CredentialStore::refresh`] calls it internally.
    pub fn update_tokens(&self, grant: &TokenGrant) {
        self.inner.store_grant(grant);
    }

    /// Drops the user session: clears the cache and the secret store.
    ///
    /// Subsequent calls serve the unauthorized-user token again.
    pub fn logout(&self) {
        self.inner.secrets.delete(ACCESS_TOKEN_KEY);
        self.inner.secrets.delete(REFRESH_TOKEN_KEY);
        *self
            .inner
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner) = CachedTokens::default();
        self.inner.authenticated_tx.send_replace(false);
    }

    /// Refreshes the session, sharing one network exchange among all
    /// concurrent callers.
    ///
    /// If a refresh is already in flight this call attaches to it and
    /// receives the same outcome. On success the rotated tokens are already
    /// stored when this returns; callers re-read
    /// [`CredentialStore::access_token`] and retry their request.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`AuthError::RefreshTokenMissing`] when no refresh token is stored,
    /// [`AuthError::RefreshRejected`] when the backend answers with a
    /// non-success envelope, and [`AuthError::Network`] for transport
    /// failures. All subscribers to one exchange see the same error.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let shared = {
            let mut slot = self
                .inner
                .refresh_slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(in_flight) = slot.as_ref() {
                tracing::debug!("Token refresh already in flight; attaching to it");
                in_flight.clone()
            } else {
                let inner = Arc::clone(&self.inner);
                let task = tokio::spawn(async move {
                    let outcome = inner.perform_refresh().await;
                    inner
                        .refresh_slot
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take();
                    outcome
                });

                let shared: RefreshFuture = async move {
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(err) => Err(AuthError::Network(NetworkError::Unknown(format!(
                            "Token refresh task failed: {err}"
                        )))),
                    }
                }
                .boxed()
                .shared();

                *slot = Some(shared.clone());
                shared
            }
        };

        shared.await
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
enum CachedField {
    Access,
    Refresh,
}

impl StoreInner {
    /// Cache, then secret store, then `fallback`. A secret-store hit is
    /// written back into the cache.
    fn token_or(&self, key: &str, field: CachedField, fallback: impl FnOnce() -> String) -> String {
        let cached = {
            let cache = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
            match field {
                CachedField::Access => cache.access.clone(),
                CachedField::Refresh => cache.refresh.clone(),
            }
        };
        if let Some(token) = cached {
            return token;
        }

        if let Some(token) = load_text_secret(self.secrets.as_ref(), key) {
            let mut cache = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
            match field {
                CachedField::Access => cache.access = Some(token.clone()),
                CachedField::Refresh => cache.refresh = Some(token.clone()),
            }
            return token;
        }

        fallback()
    }

    fn store_grant(&self, grant: &TokenGrant) {
        let mut cache = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(access) = &grant.access_token {
            self.secrets.save(ACCESS_TOKEN_KEY, access.as_bytes());
            cache.access = Some(access.clone());
        }
        if let Some(refresh) = &grant.refresh_token {
            self.secrets.save(REFRESH_TOKEN_KEY, refresh.as_bytes());
            cache.refresh = Some(refresh.clone());
        }
        let authenticated = cache
            .refresh
            .as_deref()
            .is_some_and(|token| !token.is_empty());
        drop(cache);
        self.authenticated_tx.send_replace(authenticated);
    }

    async fn perform_refresh(&self) -> Result<(), AuthError> {
        let refresh_token = self.token_or(REFRESH_TOKEN_KEY, CachedField::Refresh, String::new);
        if refresh_token.is_empty() {
            tracing::warn!("Token refresh requested without a stored refresh token");
            return Err(AuthError::RefreshTokenMissing);
        }

        tracing::debug!("Exchanging refresh token for a new session");
        let envelope = self.refresher.refresh_tokens(&refresh_token).await?;

        match envelope.result.status {
            ResponseStatus::Success => {
                if let Some(grant) = &envelope.data {
                    self.store_grant(grant);
                }
                Ok(())
            }
            status => {
                tracing::warn!("Token refresh rejected by backend: {status}");
                Err(AuthError::RefreshRejected(status))
            }
        }
    }
}

/// Reads a secret as UTF-8 text, treating blank or undecodable values as
/// absent.
fn load_text_secret(secrets: &dyn SecretStore, key: &str) -> Option<String> {
    let bytes = secrets.load(key)?;
    match String::from_utf8(bytes) {
        Ok(value) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!("Stored secret {key} is not valid UTF-8: {err}");
            None
        }
    }
}
