//! Response envelope types and domain-status classification.
//!
//! Every JSON response from the backend wraps its payload in an envelope
//! carrying an [`OperationResult`]: the domain status, optional messages, and
//! tracing metadata. The domain status is independent of the HTTP transport
//! status — a request can return HTTP 200 while the envelope reports an
//! authorization failure, and dispatch must react to the envelope, not the
//! transport code.
//!
//! # Overview
//!
//! - [`Envelope`]: single-object payload carrier (`data`)
//! - [`EnvelopeList`]: list payload carrier (`dataList`)
//! - [`OperationResult`]: the `result` metadata block
//! - [`ResponseStatus`]: the closed set of domain statuses
//! - [`classify`]: maps a decoded envelope to a dispatch outcome
//!
//! # Example
//!
//! ```rust
//! use commerce_api::{classify, Envelope, NetworkError};
//!
//! let body = r#"{
//!     "result": {
//!         "status": "errorAuth",
//!         "message": null,
//!         "codeResult": 401,
//!         "duration": 0.02,
//!         "idLog": "log-1"
//!     },
//!     "data": null,
//!     "totalNumberRecords": 0
//! }"#;
//!
//! let envelope: Envelope<String> = serde_json::from_str(body).unwrap();
//! assert_eq!(classify(envelope), Err(NetworkError::Unauthorized));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clients::errors::NetworkError;

/// The domain status reported inside every response envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    /// The operation succeeded; the payload is usable.
    Success,
    /// The operation completed but the server attached a warning.
    Warning,
    /// The server hit an internal fault while processing.
    ErrorServer,
    /// The session token was missing, expired, or rejected.
    ErrorAuth,
    /// The authenticated client is not allowed to perform the operation.
    ErrorAccess,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::ErrorServer => "errorServer",
            Self::ErrorAuth => "errorAuth",
            Self::ErrorAccess => "errorAccess",
        };
        f.write_str(name)
    }
}

/// The `result` metadata block present in every envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    /// Domain status of the operation.
    pub status: ResponseStatus,
    /// Human-readable message for the end user.
    pub message: Option<String>,
    /// Diagnostic message for developers.
    pub message_dev: Option<String>,
    /// Backend-internal result code.
    pub code_result: i32,
    /// Server-side processing time in seconds.
    pub duration: f64,
    /// Identifier of the server-side log entry for this operation.
    pub id_log: String,
    /// Correlation id echoed from the `x-request-id` request header.
    #[serde(rename = "x-request-id", default)]
    pub x_request_id: Option<String>,
}

/// Envelope carrying a single-object payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Operation metadata.
    pub result: OperationResult,
    /// The payload; absent when the operation produced none.
    pub data: Option<T>,
    /// Total number of records matching the request, for paged reads.
    #[serde(default)]
    pub total_number_records: i64,
}

/// Envelope carrying a list payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeList<T> {
    /// Operation metadata.
    pub result: OperationResult,
    /// The payload items; absent when the operation produced none.
    pub data_list: Option<Vec<T>>,
    /// Total number of records matching the request, for paged reads.
    #[serde(default)]
    pub total_number_records: i64,
}

/// Payload type for operations that return only their envelope metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyPayload {}

/// Implemented by every response type that carries an [`OperationResult`].
///
/// The dispatch coordinator classifies responses purely through this trait,
/// so any custom response shape can opt into envelope handling by exposing
/// its `result` block.
pub trait Enveloped {
    /// Returns the envelope's operation metadata.
    fn result(&self) -> &OperationResult;
}

impl<T> Enveloped for Envelope<T> {
    fn result(&self) -> &OperationResult {
        &self.result
    }
}

impl<T> Enveloped for EnvelopeList<T> {
    fn result(&self) -> &OperationResult {
        &self.result
    }
}

/// Maps a decoded envelope to a dispatch outcome.
///
/// This is the canonical domain-status table:
///
/// | status        | outcome                                   |
/// |---------------|-------------------------------------------|
/// | `success`     | the envelope is returned to the caller    |
/// | `warning`     | [`NetworkError::Custom`] with the message |
/// | `errorServer` | [`NetworkError::ServerError`]             |
/// | `errorAuth`   | [`NetworkError::Unauthorized`]            |
/// | `errorAccess` | [`NetworkError::Forbidden`]               |
///
/// Only `errorAuth` is recoverable (through a token refresh); the other
/// non-success statuses are terminal regardless of retry budget.
///
/// # Errors
///
/// Returns the mapped [`NetworkError`] for every non-success status.
pub fn classify<E: Enveloped>(envelope: E) -> Result<E, NetworkError> {
    let status = envelope.result().status;
    match status {
        ResponseStatus::Success => Ok(envelope),
        ResponseStatus::Warning => Err(NetworkError::Custom(server_message(&envelope))),
        ResponseStatus::ErrorServer => Err(NetworkError::ServerError(server_message(&envelope))),
        ResponseStatus::ErrorAuth => Err(NetworkError::Unauthorized),
        ResponseStatus::ErrorAccess => Err(NetworkError::Forbidden(server_message(&envelope))),
    }
}

fn server_message<E: Enveloped>(envelope: &E) -> String {
    envelope.result().message.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(status: ResponseStatus, message: Option<&str>) -> OperationResult {
        OperationResult {
            status,
            message: message.map(ToString::to_string),
            message_dev: None,
            code_result: 0,
            duration: 0.01,
            id_log: "log-1".to_string(),
            x_request_id: None,
        }
    }

    fn envelope_with(status: ResponseStatus, message: Option<&str>) -> Envelope<String> {
        Envelope {
            result: result_with(status, message),
            data: Some("payload".to_string()),
            total_number_records: 1,
        }
    }

    #[test]
    fn test_success_returns_envelope() {
        let envelope = envelope_with(ResponseStatus::Success, None);
        let classified = classify(envelope).unwrap();
        assert_eq!(classified.data.as_deref(), Some("payload"));
    }

    #[test]
    fn test_warning_is_terminal_custom_error_with_message() {
        let envelope = envelope_with(ResponseStatus::Warning, Some("stock is low"));
        assert_eq!(
            classify(envelope),
            Err(NetworkError::Custom("stock is low".to_string()))
        );
    }

    #[test]
    fn test_error_server_maps_to_server_error() {
        let envelope = envelope_with(ResponseStatus::ErrorServer, Some("db down"));
        assert_eq!(
            classify(envelope),
            Err(NetworkError::ServerError("db down".to_string()))
        );
    }

    #[test]
    fn test_error_auth_maps_to_unauthorized() {
        let envelope = envelope_with(ResponseStatus::ErrorAuth, Some("ignored"));
        assert_eq!(classify(envelope), Err(NetworkError::Unauthorized));
    }

    #[test]
    fn test_error_access_maps_to_forbidden() {
        let envelope = envelope_with(ResponseStatus::ErrorAccess, Some("clients only"));
        assert_eq!(
            classify(envelope),
            Err(NetworkError::Forbidden("clients only".to_string()))
        );
    }

    #[test]
    fn test_missing_message_becomes_empty_string() {
        let envelope = envelope_with(ResponseStatus::Warning, None);
        assert_eq!(classify(envelope), Err(NetworkError::Custom(String::new())));
    }

    #[test]
    fn test_envelope_decodes_backend_field_spelling() {
        let body = r#"{
            "result": {
                "status": "success",
                "message": "ok",
                "messageDev": "dev note",
                "codeResult": 0,
                "duration": 0.25,
                "idLog": "01HZX",
                "x-request-id": "req-42"
            },
            "data": {"name": "Latte"},
            "totalNumberRecords": 1
        }"#;

        #[derive(Debug, Deserialize, PartialEq)]
        struct Item {
            name: String,
        }

        let envelope: Envelope<Item> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.result.status, ResponseStatus::Success);
        assert_eq!(envelope.result.message_dev.as_deref(), Some("dev note"));
        assert_eq!(envelope.result.x_request_id.as_deref(), Some("req-42"));
        assert_eq!(
            envelope.data,
            Some(Item {
                name: "Latte".to_string()
            })
        );
    }

    #[test]
    fn test_list_envelope_decodes_data_list() {
        let body = r#"{
            "result": {
                "status": "success",
                "message": null,
                "codeResult": 0,
                "duration": 0.1,
                "idLog": "01HZY"
            },
            "dataList": ["a", "b"],
            "totalNumberRecords": 2
        }"#;

        let envelope: EnvelopeList<String> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data_list.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(envelope.total_number_records, 2);
    }

    #[test]
    fn test_total_number_records_defaults_when_absent() {
        let body = r#"{
            "result": {
                "status": "success",
                "message": null,
                "codeResult": 0,
                "duration": 0.1,
                "idLog": "01HZZ"
            },
            "data": null
        }"#;

        let envelope: Envelope<EmptyPayload> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.total_number_records, 0);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_status_display_uses_wire_names() {
        assert_eq!(ResponseStatus::ErrorAuth.to_string(), "errorAuth");
        assert_eq!(ResponseStatus::Success.to_string(), "success");
    }
}
