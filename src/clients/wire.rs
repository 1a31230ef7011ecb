//! Pure construction of transport-level requests.
//!
//! [`build_wire_request`] turns an [`ApiRequest`] description plus a base URL
//! into a [`WireRequest`]: the URL, method, headers, and body bytes the
//! transport will send. Construction is a pure function — no I/O, no shared
//! state — so the dispatch coordinator can rebuild the same description
//! against a different host, or with a refreshed bearer token, and get an
//! identical request apart from the part that changed.
//!
//! Two builds of the same description differ only in the multipart boundary
//! and the synthetic attachment filenames, both of which are freshly
//! generated per build.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::clients::errors::NetworkError;
use crate::clients::request::{ApiRequest, Attachment, HttpMethod};

/// A fully built transport-level request.
///
/// Everything the transport needs for one attempt, with the body already
/// encoded. Values are inspectable, which the integration tests use to
/// verify construction without touching the network.
#[derive(Clone, Debug, PartialEq)]
pub struct WireRequest {
    /// Absolute URL including query parameters.
    pub url: Url,
    /// HTTP method.
    pub method: HttpMethod,
    /// Headers in application order.
    pub headers: HeaderMap,
    /// Encoded body bytes, if the request carries a body.
    pub body: Option<Vec<u8>>,
}

/// Builds the wire request for one attempt of `request` against `base_url`.
///
/// `token_override` replaces the description's own bearer token; the
/// dispatch coordinator passes it on the retry that follows a token refresh.
/// The `Authorization` header is only set when the effective token is
/// non-empty, so requests running under no session stay anonymous.
///
/// Header order follows the backend's contract: caller-supplied extras
/// first, then `Accept`, then `Authorization`, then `Content-Type`. The
/// content type comes from the description whether or not the request has a
/// body; attachments replace it with the generated multipart type.
///
/// # Errors
///
/// Returns [`NetworkError::BadRequest`] when `base_url` is not a well-formed
/// absolute URL or the body fails to encode. Construction failures are
/// terminal: the coordinator does not spend a retry on them.
pub fn build_wire_request<R: ApiRequest>(
    request: &R,
    base_url: &str,
    token_override: Option<&str>,
) -> Result<WireRequest, NetworkError> {
    let mut url = Url::parse(base_url).map_err(|err| {
        NetworkError::BadRequest(format!("Invalid base URL '{base_url}': {err}"))
    })?;
    if url.cannot_be_a_base() {
        return Err(NetworkError::BadRequest(format!(
            "Invalid base URL '{base_url}': not an absolute URL"
        )));
    }

    let joined_path = format!("{}{}", url.path().trim_end_matches('/'), request.path());
    url.set_path(&joined_path);

    if let Some(query) = request.query() {
        for (key, value) in flatten_query(&query) {
            url.query_pairs_mut().append_pair(&key, &value);
        }
    }

    let mut headers = HeaderMap::new();
    if let Some(extras) = request.headers() {
        // Sorted so that two builds produce identical header dumps.
        let mut extras: Vec<_> = extras.into_iter().collect();
        extras.sort();
        for (name, value) in extras {
            set_header(&mut headers, &name, &value);
        }
    }
    if let Some(accept) = request.accept() {
        set_named_header(&mut headers, ACCEPT, &accept);
    }

    let effective_token = token_override
        .map(str::to_owned)
        .or_else(|| request.token());
    if let Some(token) = effective_token.filter(|token| !token.is_empty()) {
        set_named_header(&mut headers, AUTHORIZATION, &format!("Bearer {token}"));
    }

    let body = if let Some(attachments) = request.attachments() {
        let boundary = Uuid::new_v4().to_string();
        set_named_header(
            &mut headers,
            CONTENT_TYPE,
            &format!("multipart/form-data; boundary={boundary}"),
        );
        Some(multipart_body(&attachments, &boundary))
    } else {
        if let Some(content_type) = request.content_type() {
            set_named_header(&mut headers, CONTENT_TYPE, &content_type);
        }
        request
            .body()
            .map(|body| {
                serde_json::to_vec(&body).map_err(|err| {
                    NetworkError::BadRequest(format!("Failed to encode request body: {err}"))
                })
            })
            .transpose()?
    };

    Ok(WireRequest {
        url,
        method: request.method(),
        headers,
        body,
    })
}

/// Flattens typed query parameters to string pairs.
///
/// The parameters are serialized through the same typed path as request
/// bodies and the resulting JSON object is flattened: strings pass through,
/// numbers and booleans are stringified, `null` means the parameter is
/// absent, and anything nested is dropped with a warning rather than
/// failing the request.
fn flatten_query<Q: Serialize>(query: &Q) -> Vec<(String, String)> {
    let encoded = match serde_json::to_value(query) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("Dropping query parameters that failed to encode: {err}");
            return Vec::new();
        }
    };

    match encoded {
        Value::Object(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (key, value) in map {
                match value {
                    Value::String(text) => pairs.push((key, text)),
                    Value::Number(number) => pairs.push((key, number.to_string())),
                    Value::Bool(flag) => pairs.push((key, flag.to_string())),
                    Value::Null => {}
                    Value::Array(_) | Value::Object(_) => {
                        tracing::warn!(
                            "Dropping query parameter '{key}': not representable as a string"
                        );
                    }
                }
            }
            pairs
        }
        Value::Null => Vec::new(),
        _ => {
            tracing::warn!("Dropping query parameters: expected an object at the top level");
            Vec::new()
        }
    }
}

/// Sets a caller-supplied header, replacing any previous value.
///
/// Invalid header names or values cannot be sent; they are dropped with a
/// warning like unserializable query parameters.
fn set_header(headers: &mut HeaderMap, name: &str, value: &str) {
    let Ok(name) = HeaderName::try_from(name) else {
        tracing::warn!("Dropping header '{name}': invalid header name");
        return;
    };
    set_named_header(headers, name, value);
}

fn set_named_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::try_from(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::warn!("Dropping header '{name}': value contains invalid characters");
        }
    }
}

/// Assembles a `multipart/form-data` body.
///
/// Each part gets a synthetic filename built from a fresh random identifier
/// plus the attachment's extension; the closing `--boundary--` terminates
/// the form.
fn multipart_body(attachments: &[Attachment], boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for attachment in attachments {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}{}\"\r\n",
                attachment.field_name,
                Uuid::new_v4(),
                attachment.file_extension
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", attachment.mime_type).as_bytes());
        body.extend_from_slice(&attachment.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
