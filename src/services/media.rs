//! Media upload, listing, and deletion for the signed-in client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CredentialStore;
use crate::clients::{
    ApiClient, ApiRequest, Attachment, EmptyPayload, Envelope, EnvelopeList, HttpMethod,
    NetworkError, Transport,
};
use crate::config::ApiConfig;

/// Content categories the media endpoints understand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Image,
    Video,
    Pdf,
    Html,
    HtmlString,
    StringData,
    VoiceData,
}

/// Paging, filtering, and ordering for list endpoints.
///
/// Mirrors the backend's list-query contract: `skip`/`take` paging, an
/// optional free-text search, optional field filters, and one sort key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAndSort {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_fields: Option<Vec<FieldForFilter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_data: Option<String>,
    pub skip: i32,
    pub take: i32,
}

/// One field predicate inside [`FilterAndSort`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldForFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_value: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

/// Sort key and direction inside [`FilterAndSort`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    pub variant_sort: SortVariant,
}

/// Comparison operators for [`FieldForFilter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    EqualsStrong,
    EqualsIgnoreCase,
    ContainsStrong,
    ContainsIgnoreCase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortVariant {
    Asc,
    Desc,
}

/// A stored media record as the backend returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntity {
    pub id_unique: String,
    pub id_entity: String,
    pub id_enterprise: String,
    pub entity_type_name: Option<String>,
    /// Download URL for file-backed content.
    pub url_data: Option<String>,
    /// Inline payload for string-backed content.
    pub string_data: Option<String>,
    pub alias: Option<String>,
    pub order: i32,
    pub tag: i32,
    pub content_type: MediaKind,
    /// Payload size in bytes.
    pub size: i64,
    #[serde(with = "crate::datetime")]
    pub date_added: DateTime<Utc>,
    pub date_updated: String,
    pub date_soft_removed: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddMediaQuery {
    type_content: MediaKind,
    alias: String,
    tag: i32,
}

struct AddClientMediaRequest {
    access_token: String,
    kind: MediaKind,
    alias: String,
    tag: i32,
    attachments: Vec<Attachment>,
}

impl ApiRequest for AddClientMediaRequest {
    type Body = ();
    type Query = AddMediaQuery;
    type Response = Envelope<MediaEntity>;

    fn path(&self) -> String {
        "/mediadata/client".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn token(&self) -> Option<String> {
        Some(self.access_token.clone())
    }

    fn query(&self) -> Option<AddMediaQuery> {
        Some(AddMediaQuery {
            type_content: self.kind,
            alias: self.alias.clone(),
            tag: self.tag,
        })
    }

    fn attachments(&self) -> Option<Vec<Attachment>> {
        Some(self.attachments.clone())
    }
}

struct ListClientMediaRequest {
    access_token: String,
    filter: FilterAndSort,
}

impl ApiRequest for ListClientMediaRequest {
    type Body = FilterAndSort;
    type Query = ();
    type Response = EnvelopeList<MediaEntity>;

    fn path(&self) -> String {
        "/mediadata/client/list".to_string()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn token(&self) -> Option<String> {
        Some(self.access_token.clone())
    }

    fn body(&self) -> Option<FilterAndSort> {
        Some(self.filter.clone())
    }
}

struct DeleteMediaRequest {
    access_token: String,
    media_id: String,
}

impl ApiRequest for DeleteMediaRequest {
    type Body = ();
    type Query = ();
    type Response = Envelope<EmptyPayload>;

    fn path(&self) -> String {
        format!("/mediadata/{}", self.media_id)
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Delete
    }

    fn token(&self) -> Option<String> {
        Some(self.access_token.clone())
    }
}

/// Media operations scoped to the signed-in client.
///
/// Uploads go out as multipart form data with the content category, alias,
/// and tag in the query string. The service's client carries the shared
/// credential store, so an expired session refreshes transparently mid-call.
///
/// # Example
///
/// ```rust,ignore
/// use commerce_api::{Attachment, MediaKind};
///
/// let media = MediaService::new(&config, credential_store.clone());
///
/// let uploaded = media
///     .add_for_client(vec![Attachment::jpeg(photo_bytes)], MediaKind::Image, "avatar", 0)
///     .await?;
/// ```
#[derive(Debug)]
pub struct MediaService {
    client: ApiClient,
    credentials: CredentialStore,
}

impl MediaService {
    /// Creates the service over the configured media hosts.
    #[must_use]
    pub fn new(config: &ApiConfig, credentials: CredentialStore) -> Self {
        Self {
            client: ApiClient::with_credentials(
                config.media_hosts().clone(),
                Transport::from_config(config),
                credentials.clone(),
            ),
            credentials,
        }
    }

    /// Uploads media files for the signed-in client.
    ///
    /// `alias` and `tag` are how the app finds the content again; the
    /// backend stores them verbatim.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch.
    pub async fn add_for_client(
        &self,
        attachments: Vec<Attachment>,
        kind: MediaKind,
        alias: &str,
        tag: i32,
    ) -> Result<Envelope<MediaEntity>, NetworkError> {
        let request = AddClientMediaRequest {
            access_token: self.credentials.access_token(),
            kind,
            alias: alias.to_string(),
            tag,
            attachments,
        };
        self.client.dispatch(&request).await
    }

    /// Lists the client's media records matching `filter`.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch.
    pub async fn list_for_client(
        &self,
        filter: FilterAndSort,
    ) -> Result<EnvelopeList<MediaEntity>, NetworkError> {
        let request = ListClientMediaRequest {
            access_token: self.credentials.access_token(),
            filter,
        };
        self.client.dispatch(&request).await
    }

    /// Deletes one media record by its unique id.
    ///
    /// # Errors
    ///
    /// Any terminal [`NetworkError`] from the dispatch.
    pub async fn delete_by_id(
        &self,
        media_id: &str,
    ) -> Result<Envelope<EmptyPayload>, NetworkError> {
        let request = DeleteMediaRequest {
            access_token: self.credentials.access_token(),
            media_id: media_id.to_string(),
        };
        self.client.dispatch(&request).await
    }
}
