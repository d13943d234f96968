//! Transport integration tests against a fake interop server

mod common;

use common::{FakePharo, closed_port};
use pharo_interop_mcp::client::{Endpoint, Envelope, PharoClient, Verb, params};
use serde_json::json;

#[tokio::test]
async fn test_get_sends_query_parameters() {
    let server = FakePharo::with_json(json!({"success": true, "result": "Object subclass: #Foo"})).await;
    let client = server.client();

    let envelope = client.get_class_source("Foo").await;

    assert_eq!(envelope, Envelope::success("Object subclass: #Foo"));
    let request = server.last();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/get-class-source");
    assert_eq!(request.param("class_name"), Some("Foo"));
}

#[tokio::test]
async fn test_post_eval_sends_json_body() {
    let server = FakePharo::with_json(json!({"success": true, "result": 2})).await;
    let client = server.client();

    let envelope = client.evaluate("1 + 1").await;

    assert_eq!(envelope.result(), Some(&json!(2)));
    let request = server.last();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/eval");
    assert_eq!(request.body, Some(json!({"code": "1 + 1"})));
    assert!(request.query.is_empty());
}

#[tokio::test]
async fn test_query_values_are_encoded() {
    let server = FakePharo::with_json(json!({"success": true, "result": []})).await;
    let client = server.client();

    client.search_methods_like("at:put:").await;
    client.read_screen("spec", false).await;

    let requests = server.requests();
    assert_eq!(requests[0].param("method_name_query"), Some("at:put:"));
    assert_eq!(requests[1].param("target_type"), Some("spec"));
    assert_eq!(requests[1].param("capture_screenshot"), Some("false"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = FakePharo::start(500, "Server Error").await;
    let envelope = server.client().list_packages().await;

    assert_eq!(envelope, Envelope::failure("HTTP error 500: Server Error"));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = FakePharo::start(200, "<html>not json</html>").await;
    let envelope = server.client().list_packages().await;

    assert!(!envelope.is_success());
    assert!(envelope.error().unwrap().message().starts_with("Invalid JSON response: "));
}

#[tokio::test]
async fn test_json_without_envelope_shape() {
    let server = FakePharo::with_json(json!({"packages": []})).await;
    let envelope = server.client().list_packages().await;

    assert!(envelope.error().unwrap().message().starts_with("Invalid JSON response: "));
}

#[tokio::test]
async fn test_connection_refused() {
    let client = PharoClient::new(Endpoint::new("127.0.0.1", closed_port().await));
    let envelope = client.list_packages().await;

    assert!(!envelope.is_success());
    assert!(envelope.error().unwrap().message().starts_with("Connection error: "));
}

#[tokio::test]
async fn test_remote_failure_passes_through() {
    let server = FakePharo::with_json(json!({
        "success": false,
        "error": {"description": "MessageNotUnderstood: nil>>foo", "receiver": null}
    }))
    .await;

    let envelope = server.client().evaluate("nil foo").await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.error().unwrap().message(), "MessageNotUnderstood: nil>>foo");
    assert_eq!(
        envelope.to_value(),
        json!({"success": false, "error": {"description": "MessageNotUnderstood: nil>>foo", "receiver": null}})
    );
}

#[tokio::test]
async fn test_generic_request_without_params() {
    let server = FakePharo::with_json(json!({"success": true, "result": {}})).await;
    let client = server.client();

    let envelope = client.request(Verb::Get, "/get-settings", None).await;
    assert!(envelope.is_success());

    let envelope = client
        .request(Verb::Get, "/list-classes", Some(params([("package_name", json!("Kernel")), ("skip", json!(null))])))
        .await;
    assert!(envelope.is_success());

    let requests = server.requests();
    assert!(requests[0].query.is_empty());
    assert_eq!(requests[1].query, vec![("package_name".to_string(), "Kernel".to_string())]);
}

#[tokio::test]
async fn test_close_releases_once() {
    let server = FakePharo::with_json(json!({"success": true, "result": []})).await;
    let client = server.client();
    assert!(!client.is_open().await);

    client.list_packages().await;
    assert!(client.is_open().await);

    assert!(client.close().await);
    assert!(!client.close().await);

    let envelope = client.list_packages().await;
    assert_eq!(envelope, Envelope::failure("Connection error: client is closed"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_close_before_use_releases_nothing() {
    let client = PharoClient::new(Endpoint::default());
    assert!(!client.close().await);
}

#[tokio::test]
async fn test_envelope_is_returned_exactly_as_received() {
    let bodies = [
        json!({"success": true, "result": 1, "elapsed_ms": 3}),
        json!({"success": true}),
        json!({"success": false}),
    ];

    for body in bodies {
        let server = FakePharo::with_json(body.clone()).await;
        let envelope = server.client().list_packages().await;
        assert_eq!(envelope.to_value(), body);
    }
}
