//! Request descriptions dispatched through the client.
//!
//! Endpoints describe themselves by implementing [`ApiRequest`]: a path, a
//! method, optional typed body and query parameters, optional multipart
//! attachments, and the response envelope they decode into. The description
//! is logical — it knows nothing about hosts, retries, or tokens beyond the
//! one it was built with — which is what lets the dispatch coordinator
//! rebuild it against another host or with a refreshed bearer token.
//!
//! # Example
//!
//! ```rust
//! use commerce_api::{ApiRequest, Envelope, HttpMethod};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct ProductQuery {
//!     take: u32,
//! }
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     name: String,
//! }
//!
//! struct ProductByIdRequest {
//!     access_token: String,
//!     id: String,
//! }
//!
//! impl ApiRequest for ProductByIdRequest {
//!     type Body = ();
//!     type Query = ProductQuery;
//!     type Response = Envelope<Product>;
//!
//!     fn path(&self) -> String {
//!         format!("/product/{}", self.id)
//!     }
//!
//!     fn token(&self) -> Option<String> {
//!         Some(self.access_token.clone())
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::envelope::Enveloped;

/// HTTP methods used by the backend's REST surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A binary part uploaded in a multipart request.
///
/// Attachments never carry a client-side filename; the wire builder
/// generates a synthetic one from a random identifier so that uploads reveal
/// nothing about the device's filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// The form field name the backend reads this part from.
    pub field_name: String,
    /// Raw content bytes.
    pub bytes: Vec<u8>,
    /// Extension appended to the synthetic filename, including the dot.
    pub file_extension: String,
    /// MIME type sent in the part's `Content-Type`.
    pub mime_type: String,
}

impl Attachment {
    /// Default form field name used by the backend's media endpoints.
    pub const DEFAULT_FIELD_NAME: &'static str = "file";

    /// Creates an attachment with an explicit field name, extension, and
    /// MIME type.
    #[must_use]
    pub fn new(
        field_name: impl Into<String>,
        bytes: Vec<u8>,
        file_extension: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            bytes,
            file_extension: file_extension.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Creates a JPEG attachment under the backend's default field name.
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(Self::DEFAULT_FIELD_NAME, bytes, ".jpg", "image/jpeg")
    }
}

/// A logical description of one backend request.
///
/// Implementations provide the path and override whichever defaults they
/// need; everything else follows the backend's conventions: GET method, JSON
/// content type, `text/plain` accept, no body, no query, no attachments.
///
/// Associated types tie the description to its typed body, query parameters,
/// and response envelope. Use `()` for an unused body or query.
pub trait ApiRequest {
    /// Typed JSON body. `()` when the request sends none.
    type Body: Serialize;
    /// Typed query parameters. `()` when the request sends none.
    type Query: Serialize;
    /// The response envelope this request decodes into.
    type Response: DeserializeOwned + Enveloped;

    /// Path appended to the surface's base URL, starting with `/`.
    fn path(&self) -> String;

    /// HTTP method. Defaults to GET.
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    /// Bearer token baked into the description, if any.
    ///
    /// The dispatch coordinator may override this for the retry that follows
    /// a token refresh.
    fn token(&self) -> Option<String> {
        None
    }

    /// `Content-Type` header for the body. Defaults to `application/json`;
    /// return `None` to send a body-less request without the header.
    fn content_type(&self) -> Option<String> {
        Some("application/json".to_string())
    }

    /// `Accept` header. The backend's surfaces answer JSON regardless, so
    /// the default mirrors what the mobile clients have always sent.
    fn accept(&self) -> Option<String> {
        Some("text/plain".to_string())
    }

    /// Typed JSON body, if the request carries one.
    fn body(&self) -> Option<Self::Body> {
        None
    }

    /// Extra headers set before the standard ones.
    fn headers(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Typed query parameters, if the request carries any.
    fn query(&self) -> Option<Self::Query> {
        None
    }

    /// Multipart attachments. When present, the wire builder switches the
    /// request to `multipart/form-data` and ignores [`Self::body`].
    fn attachments(&self) -> Option<Vec<Attachment>> {
        None
    }
}
