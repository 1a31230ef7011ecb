//! Integration tests for host failover.
//!
//! Transient transport failures — refused connections, timeouts — must walk
//! the host list in order, stick to the surviving host, and give up only
//! after every alternative host has been tried.

use std::time::Duration;

use commerce_api::{ApiClient, ApiRequest, Envelope, HostList, NetworkError, Transport};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL with nothing listening; connections are refused immediately.
const DEAD_HOST: &str = "http://127.0.0.1:1";

#[derive(Debug, PartialEq, Eq, serde::Deserialize)]
struct Pong {
    ok: bool,
}

struct PingRequest;

impl ApiRequest for PingRequest {
    type Body = ();
    type Query = ();
    type Response = Envelope<Pong>;

    fn path(&self) -> String {
        "/ping".to_string()
    }
}

fn success_body() -> serde_json::Value {
    json!({
        "result": {
            "status": "success",
            "message": null,
            "messageDev": null,
            "codeResult": 0,
            "duration": 0.01,
            "idLog": "log-1",
            "x-request-id": null
        },
        "data": {"ok": true},
        "totalNumberRecords": 0
    })
}

async fn mount_ping(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_refused_connection_fails_over_to_next_host() {
    let live = MockServer::start().await;
    mount_ping(&live).await;

    let client = ApiClient::new(
        HostList::new([DEAD_HOST.to_string(), live.uri()]).unwrap(),
        Transport::new(),
    );

    let envelope = client.dispatch(&PingRequest).await.unwrap();
    assert_eq!(envelope.data, Some(Pong { ok: true }));
    assert_eq!(live.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_surviving_host_stays_preferred() {
    let live = MockServer::start().await;
    mount_ping(&live).await;

    let client = ApiClient::new(
        HostList::new([DEAD_HOST.to_string(), live.uri()]).unwrap(),
        Transport::new(),
    );
    assert_eq!(client.current_host(), DEAD_HOST);

    client.dispatch(&PingRequest).await.unwrap();
    assert_eq!(client.current_host(), live.uri());

    // The next call starts at the surviving host instead of re-probing.
    client.dispatch(&PingRequest).await.unwrap();
    assert_eq!(live.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_two_failovers_reach_third_host() {
    let live = MockServer::start().await;
    mount_ping(&live).await;

    let client = ApiClient::new(
        HostList::new([DEAD_HOST.to_string(), DEAD_HOST.to_string(), live.uri()]).unwrap(),
        Transport::new(),
    );

    let envelope = client.dispatch(&PingRequest).await.unwrap();
    assert_eq!(envelope.data, Some(Pong { ok: true }));
}

#[tokio::test]
async fn test_exhausted_host_list_returns_transient_error() {
    let client = ApiClient::new(
        HostList::new([DEAD_HOST.to_string(), DEAD_HOST.to_string()]).unwrap(),
        Transport::new(),
    );

    let err = client.dispatch(&PingRequest).await.unwrap_err();
    assert!(matches!(err, NetworkError::Network(_)));
}

#[tokio::test]
async fn test_last_transient_error_surfaces_when_every_host_fails() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&slow)
        .await;

    let client = ApiClient::new(
        HostList::new([DEAD_HOST.to_string(), DEAD_HOST.to_string(), slow.uri()]).unwrap(),
        Transport::with_settings(Duration::from_millis(250), false),
    );

    // Two refused hosts burn the failover budget; the third host's timeout
    // is the error the caller sees.
    let err = client.dispatch(&PingRequest).await.unwrap_err();
    assert!(matches!(err, NetworkError::Timeout(_)));
    assert_eq!(client.current_host(), slow.uri());
}

#[tokio::test]
async fn test_single_host_has_no_failover_budget() {
    let client = ApiClient::new(HostList::single(DEAD_HOST).unwrap(), Transport::new());

    let err = client.dispatch(&PingRequest).await.unwrap_err();
    assert!(matches!(err, NetworkError::Network(_)));
}

#[tokio::test]
async fn test_slow_host_times_out_and_fails_over() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&slow)
        .await;

    let fast = MockServer::start().await;
    mount_ping(&fast).await;

    let client = ApiClient::new(
        HostList::new([slow.uri(), fast.uri()]).unwrap(),
        Transport::with_settings(Duration::from_millis(250), false),
    );

    let envelope = client.dispatch(&PingRequest).await.unwrap();
    assert_eq!(envelope.data, Some(Pong { ok: true }));
    assert_eq!(client.current_host(), fast.uri());
}

#[tokio::test]
async fn test_timeout_classifies_as_timeout_error() {
    let slow = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&slow)
        .await;

    let client = ApiClient::new(
        HostList::single(slow.uri()).unwrap(),
        Transport::with_settings(Duration::from_millis(250), false),
    );

    let err = client.dispatch(&PingRequest).await.unwrap_err();
    assert!(matches!(err, NetworkError::Timeout(_)));
}
