//! Token payloads issued by the authorization endpoints.

use serde::{Deserialize, Serialize};

/// Secret-store key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Secret-store key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// A pair of session tokens as issued by login and refresh calls.
///
/// Either token may be absent: the backend rotates only what it chooses to
/// rotate, and a refresh response that omits a field means "keep what you
/// have". [`CredentialStore::update_tokens`](crate::auth::CredentialStore::update_tokens)
/// honors that by updating per field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    /// Bearer token for authenticated API calls.
    pub access_token: Option<String>,

    /// Long-lived token exchanged for fresh access tokens.
    pub refresh_token: Option<String>,

    /// Set when the backend requires a password change before the session
    /// is fully usable.
    #[serde(default)]
    pub need_change_password: bool,
}

impl TokenGrant {
    /// Creates a grant carrying both tokens.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            need_change_password: false,
        }
    }
}
