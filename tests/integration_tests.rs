//! End-to-end workflow tests: login, media, logout.
//!
//! These tests wire the real service facades, credential store, and
//! dispatch layer together against mock backends, the way the app uses
//! them.

use std::sync::Arc;

use commerce_api::{
    ApiConfig, Attachment, AuthService, CredentialStore, FilterAndSort, HostList,
    InMemorySecretStore, MediaKind, MediaService, SecretStore, SortOrder, SortVariant,
    TokenGrant, TokenRefresher,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn success_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({
        "result": {
            "status": "success",
            "message": null,
            "messageDev": null,
            "codeResult": 0,
            "duration": 0.05,
            "idLog": "log-1",
            "x-request-id": "req-1"
        },
        "data": data,
        "totalNumberRecords": 0
    })
}

fn test_config(login_uri: &str, media_uri: &str) -> ApiConfig {
    ApiConfig::builder()
        .unauthorized_access_token("guest-access-token")
        .enterprise_access_key("enterprise-key")
        .client_login_hosts(HostList::single(login_uri).unwrap())
        .catalog_hosts(HostList::single("http://127.0.0.1:9").unwrap())
        .payments_hosts(HostList::single("http://127.0.0.1:9").unwrap())
        .media_hosts(HostList::single(media_uri).unwrap())
        .build()
        .unwrap()
}

fn media_entity_json() -> serde_json::Value {
    json!({
        "idUnique": "media-77",
        "idEntity": "client-9",
        "idEnterprise": "ent-1",
        "entityTypeName": "client",
        "urlData": "https://cdn.example.com/media-77.jpg",
        "stringData": null,
        "alias": "avatar",
        "order": 0,
        "tag": 0,
        "contentType": "image",
        "size": 4,
        "dateAdded": "2024-01-10T08:00:00.000000",
        "dateUpdated": "2024-01-10T08:00:00.000000",
        "dateSoftRemoved": null
    })
}

#[tokio::test]
async fn test_full_login_flow_issues_and_stores_tokens() {
    let login_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/clientchannel/login/start"))
        .and(body_json(json!({
            "phone": "+15551234567",
            "accessKeyEnterprise": "enterprise-key"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "tempToken": "tmp-9",
            "secondForResendSMS": 45,
            "numberAttemptsLeft": 3
        }))))
        .expect(1)
        .mount(&login_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/clientchannel/login/end"))
        .and(body_json(json!({
            "tempToken": "tmp-9",
            "codeFromSMS": "1234"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(json!({
            "accessToken": "jwt-access",
            "refreshToken": "jwt-refresh",
            "needChangePassword": false
        }))))
        .expect(1)
        .mount(&login_server)
        .await;

    let config = test_config(&login_server.uri(), "http://127.0.0.1:9");
    let auth = Arc::new(AuthService::new(&config));
    let secrets = Arc::new(InMemorySecretStore::new());
    let store = CredentialStore::new(
        Arc::clone(&secrets) as Arc<dyn SecretStore>,
        Arc::clone(&auth) as Arc<dyn TokenRefresher>,
        config.unauthorized_access_token(),
    );
    assert!(!store.is_authenticated());
    let session_watch = store.watch_authenticated();

    let started = auth.start_login("+15551234567").await.unwrap();
    let issued = started.data.unwrap();
    assert_eq!(issued.second_for_resend_sms, 45);
    let temp_token = issued.temp_token.unwrap();

    let finished = auth.end_login("1234", &temp_token).await.unwrap();
    store.update_tokens(finished.data.as_ref().unwrap());

    assert!(store.is_authenticated());
    assert!(session_watch.has_changed().unwrap());
    assert_eq!(store.access_token(), "jwt-access");
    // The session survives a restart: it went through the secret store.
    assert_eq!(secrets.load("accessToken"), Some(b"jwt-access".to_vec()));
    assert_eq!(secrets.load("refreshToken"), Some(b"jwt-refresh".to_vec()));
}

#[tokio::test]
async fn test_media_upload_sends_multipart_form_data() {
    let media_server = MockServer::start().await;
    let jpeg_bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];

    Mock::given(method("POST"))
        .and(path("/mediadata/client"))
        .and(query_param("typeContent", "image"))
        .and(query_param("alias", "avatar"))
        .and(query_param("tag", "0"))
        .and(header("Authorization", "Bearer jwt-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope(media_entity_json())))
        .expect(1)
        .mount(&media_server)
        .await;

    let config = test_config("http://127.0.0.1:9", &media_server.uri());
    let store = CredentialStore::new(
        Arc::new(InMemorySecretStore::new()),
        Arc::new(AuthService::new(&config)),
        config.unauthorized_access_token(),
    );
    store.update_tokens(&TokenGrant::new("jwt-access", "jwt-refresh"));

    let media = MediaService::new(&config, store);
    let envelope = media
        .add_for_client(
            vec![Attachment::jpeg(jpeg_bytes.clone())],
            MediaKind::Image,
            "avatar",
            0,
        )
        .await
        .unwrap();

    let entity = envelope.data.unwrap();
    assert_eq!(entity.id_unique, "media-77");
    assert_eq!(entity.content_type, MediaKind::Image);

    // Inspect the multipart framing the server actually received.
    let requests = media_server.received_requests().await.unwrap();
    let body = &requests[0].body;
    let text = String::from_utf8_lossy(body);
    assert!(body.starts_with(b"--"));
    assert!(body.ends_with(b"--\r\n"));
    assert!(text.contains("Content-Disposition: form-data; name=\"file\"; filename=\""));
    assert!(text.contains(".jpg\""));
    assert!(text.contains("Content-Type: image/jpeg"));
    // The raw file bytes ride in the part body untouched.
    assert!(body
        .windows(jpeg_bytes.len())
        .any(|window| window == jpeg_bytes.as_slice()));
}

#[tokio::test]
async fn test_media_list_round_trips_filter() {
    let media_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/mediadata/client/list"))
        .and(body_json(json!({
            "sort": {"fieldName": "dateAdded", "variantSort": "desc"},
            "skip": 0,
            "take": 25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "status": "success",
                "message": null,
                "messageDev": null,
                "codeResult": 0,
                "duration": 0.02,
                "idLog": "log-2",
                "x-request-id": null
            },
            "dataList": [media_entity_json()],
            "totalNumberRecords": 1
        })))
        .expect(1)
        .mount(&media_server)
        .await;

    let config = test_config("http://127.0.0.1:9", &media_server.uri());
    let store = CredentialStore::new(
        Arc::new(InMemorySecretStore::new()),
        Arc::new(AuthService::new(&config)),
        config.unauthorized_access_token(),
    );
    store.update_tokens(&TokenGrant::new("jwt-access", "jwt-refresh"));

    let media = MediaService::new(&config, store);
    let envelope = media
        .list_for_client(FilterAndSort {
            list_fields: None,
            sort: Some(SortOrder {
                field_name: Some("dateAdded".to_string()),
                variant_sort: SortVariant::Desc,
            }),
            search_data: None,
            skip: 0,
            take: 25,
        })
        .await
        .unwrap();

    assert_eq!(envelope.total_number_records, 1);
    let items = envelope.data_list.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].alias.as_deref(), Some("avatar"));
}

#[tokio::test]
async fn test_media_delete_targets_record_path() {
    let media_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/mediadata/media-77"))
        .and(header("Authorization", "Bearer jwt-access"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_envelope(serde_json::Value::Null)),
        )
        .expect(1)
        .mount(&media_server)
        .await;

    let config = test_config("http://127.0.0.1:9", &media_server.uri());
    let store = CredentialStore::new(
        Arc::new(InMemorySecretStore::new()),
        Arc::new(AuthService::new(&config)),
        config.unauthorized_access_token(),
    );
    store.update_tokens(&TokenGrant::new("jwt-access", "jwt-refresh"));

    let media = MediaService::new(&config, store);
    let envelope = media.delete_by_id("media-77").await.unwrap();
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn test_logout_invalidates_session_and_clears_store() {
    let login_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/logout"))
        .and(header("Authorization", "Bearer jwt-access"))
        .and(body_json(json!({"jwtRefreshToken": "jwt-refresh"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success_envelope(serde_json::Value::Null)),
        )
        .expect(1)
        .mount(&login_server)
        .await;

    let config = test_config(&login_server.uri(), "http://127.0.0.1:9");
    let auth = AuthService::new(&config);
    let store = CredentialStore::new(
        Arc::new(InMemorySecretStore::new()),
        Arc::new(AuthService::new(&config)),
        config.unauthorized_access_token(),
    );
    store.update_tokens(&TokenGrant::new("jwt-access", "jwt-refresh"));
    assert!(store.is_authenticated());

    auth.logout_token(&store.refresh_token(), &store.access_token())
        .await
        .unwrap();
    store.logout();

    assert!(!store.is_authenticated());
    assert_eq!(store.access_token(), "guest-access-token");
}
