//! Login, logout, and token refresh against the client-login surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::{TokenGrant, TokenRefresher};
use crate::clients::{
    ApiClient, ApiRequest, EmptyPayload, Envelope, HttpMethod, NetworkError, Transport,
};
use crate::config::ApiConfig;

/// Outcome of starting a phone login: the backend has sent an SMS code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsCodeIssued {
    /// Temporary token to present when finishing the login.
    pub temp_token: Option<String>,

    /// Seconds before another code may be requested.
    #[serde(rename = "secondForResendSMS")]
    pub second_for_resend_sms: i32,

    /// Verification attempts remaining for this code.
    pub number_attempts_left: i32,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartLoginRequest {
    phone: String,
    access_key_enterprise: String,
}

impl ApiRequest for StartLoginRequest {
    type Body = Self;
    type Query = ();
    type Response = Envelope<SmsCodeIssued>;

    fn path(&self) -> String {
        "/clientchannel/login/start".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn body(&self) -> Option<Self> {
        Some(self.clone())
    }
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndLoginRequest {
    temp_token: String,
    #[serde(rename = "codeFromSMS")]
    code_from_sms: String,
}

impl ApiRequest for EndLoginRequest {
    type Body = Self;
    type Query = ();
    type Response = Envelope<TokenGrant>;

    fn path(&self) -> String {
        "/clientchannel/login/end".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn body(&self) -> Option<Self> {
        Some(self.clone())
    }
}

/// The refresh token rides in the Authorization header; the body is empty.
struct RefreshTokenRequest {
    refresh_token: String,
}

impl ApiRequest for RefreshTokenRequest {
    type Body = ();
    type Query = ();
    type Response = Envelope<TokenGrant>;

    fn path(&self) -> String {
        "/token/refresh".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn token(&self) -> Option<String> {
        Some(self.refresh_token.clone())
    }
}

struct LogoutTokenRequest {
    refresh_token: String,
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutTokenBody {
    jwt_refresh_token: String,
}

impl ApiRequest for LogoutTokenRequest {
    type Body = LogoutTokenBody;
    type Query = ();
    type Response = Envelope<EmptyPayload>;

    fn path(&self) -> String {
        "/token/logout".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn token(&self) -> Option<String> {
        Some(self.access_token.clone())
    }

    fn body(&self) -> Option<LogoutTokenBody> {
        Some(LogoutTokenBody {
            jwt_refresh_token: self.refresh_token.clone(),
        })
    }
}

struct LogoutAllRequest {
    user_id: String,
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutAllBody {
    id_user: String,
}

impl ApiRequest for LogoutAllRequest {
    type Body = LogoutAllBody;
    type Query = ();
    type Response = Envelope<EmptyPayload>;

    fn path(&self) -> String {
        "/token/logout/all".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn token(&self) -> Option<String> {
        Some(self.access_token.clone())
    }

    fn body(&self) -> Option<LogoutAllBody> {
        Some(LogoutAllBody {
            id_user: self.user_id.clone(),
        })
    }
}

/// Phone-based login and session management.
///
/// The service owns a client over the login hosts. That client deliberately
/// has no credential store: a `401` from a login endpoint means the
/// credentials themselves are bad, and refreshing would just recurse.
/// Host failover still applies.
///
/// `AuthService` also implements [`TokenRefresher`], so an `Arc` of it
/// plugs straight into [`CredentialStore::new`](crate::auth::CredentialStore::new).
///
/// # Example
///
/// ```rust,ignore
/// let auth = AuthService::new(&config);
///
/// let started = auth.start_login("+15551234567").await?;
/// let temp_token = started.data.and_then(|d| d.temp_token).unwrap_or_default();
///
/// let finished = auth.end_login("1234", &temp_token).await?;
/// if let Some(grant) = &finished.data {
///     credential_store.update_tokens(grant);
/// }
/// ```
#[derive(Debug)]
pub struct AuthService {
    client: ApiClient,
    enterprise_access_key: String,
}

impl AuthService {
    /// Creates the service over the configured client-login hosts.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: ApiClient::new(
                config.client_login_hosts().clone(),
                Transport::from_config(config),
            ),
            enterprise_access_key: config.enterprise_access_key().to_string(),
        }
    }

    /// Starts a phone login; the backend texts a verification code.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch.
    pub async fn start_login(
        &self,
        phone: &str,
    ) -> Result<Envelope<SmsCodeIssued>, NetworkError> {
        let request = StartLoginRequest {
            phone: phone.to_string(),
            access_key_enterprise: self.enterprise_access_key.clone(),
        };
        self.client.dispatch(&request).await
    }

    /// Finishes a phone login with the SMS code and the temp token from
    /// [`AuthService::start_login`].
    ///
    /// The returned grant should be handed to
    /// [`CredentialStore::update_tokens`](crate::auth::CredentialStore::update_tokens).
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch; a wrong code
    /// surfaces as an error envelope from the backend.
    pub async fn end_login(
        &self,
        code_from_sms: &str,
        temp_token: &str,
    ) -> Result<Envelope<TokenGrant>, NetworkError> {
        let request = EndLoginRequest {
            temp_token: temp_token.to_string(),
            code_from_sms: code_from_sms.to_string(),
        };
        self.client.dispatch(&request).await
    }

    /// Exchanges a refresh token for a fresh token pair.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch. A rejected refresh
    /// token comes back as [`NetworkError::Unauthorized`].
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Envelope<TokenGrant>, NetworkError> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.dispatch(&request).await
    }

    /// Invalidates one session identified by its refresh token.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch.
    pub async fn logout_token(
        &self,
        refresh_token: &str,
        access_token: &str,
    ) -> Result<Envelope<EmptyPayload>, NetworkError> {
        let request = LogoutTokenRequest {
            refresh_token: refresh_token.to_string(),
            access_token: access_token.to_string(),
        };
        self.client.dispatch(&request).await
    }

    /// Invalidates every session belonging to `user_id`.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch.
    pub async fn logout_all(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Envelope<EmptyPayload>, NetworkError> {
        let request = LogoutAllRequest {
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
        };
        self.client.dispatch(&request).await
    }
}

#[async_trait]
impl TokenRefresher for AuthService {
    async fn refresh_tokens(
        &self,
        refresh_token: &str,
    ) -> Result<Envelope<TokenGrant>, NetworkError> {
        self.refresh_token(refresh_token).await
    }
}
