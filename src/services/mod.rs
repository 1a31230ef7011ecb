//! High-level service facades over the API clients.
//!
//! Each service owns one [`ApiClient`](crate::ApiClient) bound to its host
//! list from [`ApiConfig`](crate::ApiConfig) and exposes the endpoints of
//! that surface as plain async methods. Request types stay private; the
//! services are the public face.
//!
//! - [`AuthService`]: phone login, logout, token refresh (no credential
//!   store — it IS the refresher)
//! - [`MediaService`]: client media upload, listing, deletion

mod auth;
mod media;

pub use auth::{AuthService, SmsCodeIssued};
pub use media::{
    Comparison, FieldForFilter, FilterAndSort, MediaEntity, MediaKind, MediaService, SortOrder,
    SortVariant,
};
