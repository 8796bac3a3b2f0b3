use super::*;
use crate::{host::RecordingHost, test_support::spawn_canned_server};
use reqwest::multipart::Part;
use serde_json::json;

fn gateway(server_url: &str) -> (Gateway, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::new());
    let gateway = Gateway::new(server_url, host.clone()).expect("gateway");
    (gateway, host)
}

#[tokio::test]
async fn success_without_error_or_redirect_returns_body_unchanged() {
    let (server_url, seen) = spawn_canned_server(200, r#"{"status":"OK"}"#).await;
    let (gateway, host) = gateway(&server_url);

    let data = gateway
        .call(
            Method::PATCH,
            "/p/ab12cd34",
            RequestBody::json(&json!({ "name": "New Title" })).expect("body"),
        )
        .await
        .expect("call");

    assert_eq!(data, json!({ "status": "OK" }));
    assert!(host.effects().is_empty());

    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "PATCH");
    assert_eq!(seen[0].path, "/p/ab12cd34");
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(seen[0].json(), json!({ "name": "New Title" }));
}

#[tokio::test]
async fn error_status_uses_embedded_message() {
    let (server_url, _) = spawn_canned_server(404, r#"{"error":"Pack not found"}"#).await;
    let (gateway, host) = gateway(&server_url);

    let err = gateway
        .call(Method::PATCH, "/p/missing", RequestBody::Json(json!({})))
        .await
        .expect_err("404 must fail");

    match err {
        GatewayError::Request { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Pack not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(host.navigations().is_empty());
}

#[tokio::test]
async fn error_status_without_message_mentions_the_code() {
    let (server_url, _) = spawn_canned_server(500, "{}").await;
    let (gateway, _) = gateway(&server_url);

    let err = gateway
        .call(Method::PATCH, "/p/ab12cd34", RequestBody::Json(json!({})))
        .await
        .expect_err("500 must fail");

    assert!(matches!(err, GatewayError::Request { status: 500, .. }));
    assert!(err.to_string().contains("500"), "{err}");
}

#[tokio::test]
async fn embedded_error_with_success_status_is_a_failure() {
    let (server_url, _) = spawn_canned_server(200, r#"{"error":"name too long"}"#).await;
    let (gateway, _) = gateway(&server_url);

    let err = gateway
        .call(Method::PATCH, "/p/ab12cd34", RequestBody::Json(json!({})))
        .await
        .expect_err("embedded error must fail");

    assert!(matches!(err, GatewayError::Request { status: 200, .. }));
    assert_eq!(err.to_string(), "name too long");
}

#[tokio::test]
async fn unparseable_body_is_a_protocol_error_even_with_error_status() {
    let (server_url, _) = spawn_canned_server(502, "<html>Bad Gateway</html>").await;
    let (gateway, _) = gateway(&server_url);

    let err = gateway
        .call(Method::PATCH, "/p/ab12cd34", RequestBody::Json(json!({})))
        .await
        .expect_err("html must fail");

    assert!(matches!(err, GatewayError::Protocol { status: 502, .. }));
    assert_eq!(err.to_string(), "Server returned invalid response.");
}

#[tokio::test]
async fn empty_body_is_a_protocol_error() {
    let (server_url, _) = spawn_canned_server(200, "").await;
    let (gateway, _) = gateway(&server_url);

    let err = gateway
        .call(Method::POST, "/p/ab12cd34/duplicate", RequestBody::Json(json!({})))
        .await
        .expect_err("empty body must fail");

    assert!(matches!(err, GatewayError::Protocol { .. }));
}

#[tokio::test]
async fn redirect_navigates_and_still_returns_body() {
    let (server_url, _) = spawn_canned_server(200, r#"{"redirect_url":"/p/ffee0011"}"#).await;
    let (gateway, host) = gateway(&server_url);

    let data = gateway
        .call(Method::POST, "/p/ab12cd34/duplicate", RequestBody::Json(json!({})))
        .await
        .expect("call");

    assert_eq!(data, json!({ "redirect_url": "/p/ffee0011" }));
    assert_eq!(host.navigations(), vec![format!("{server_url}/p/ffee0011")]);
}

#[tokio::test]
async fn form_bodies_are_sent_as_multipart() {
    let (server_url, seen) = spawn_canned_server(200, r#"{"redirect_url":"/p/new"}"#).await;
    let (gateway, _) = gateway(&server_url);

    let form = Form::new().part(
        "file",
        Part::bytes(b"PK\x03\x04".to_vec()).file_name("pack.zip"),
    );
    gateway
        .call(Method::POST, "/p/ab12cd34/upload", form.into())
        .await
        .expect("call");

    let seen = seen.lock().await;
    let content_type = seen[0].content_type.clone().expect("content type");
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert!(!content_type.contains("application/json"));
}

#[tokio::test]
async fn session_token_is_sent_as_cookie() {
    let (server_url, seen) = spawn_canned_server(200, "{}").await;
    let (gateway, _) = gateway(&server_url);
    let gateway = gateway.with_session_token("header.claims.signature");

    gateway
        .call(Method::PATCH, "/p/ab12cd34", RequestBody::Json(json!({ "main": false })))
        .await
        .expect("call");

    let seen = seen.lock().await;
    assert_eq!(
        seen[0].cookie.as_deref(),
        Some("jwt=header.claims.signature")
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let (gateway, _) = gateway(&format!("http://{addr}"));

    let err = gateway
        .call(Method::PATCH, "/p/ab12cd34", RequestBody::Json(json!({})))
        .await
        .expect_err("nothing listens");

    assert!(matches!(err, GatewayError::Transport(_)));
}

#[test]
fn rejects_invalid_base_url() {
    let host = Arc::new(RecordingHost::new());
    assert!(matches!(
        Gateway::new("not a url", host),
        Err(GatewayError::InvalidUrl(_))
    ));
}
