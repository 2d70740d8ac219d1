// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn swap_scheme_to_ws_handles_both_http_and_https() {
    assert_eq!(swap_scheme_to_ws("http://host/"), "ws://host/");
    assert_eq!(swap_scheme_to_ws("https://host/"), "wss://host/");
}

#[test]
fn normalize_base_adds_trailing_slash() {
    assert_eq!(normalize_base("http://host"), "http://host/");
    assert_eq!(normalize_base("http://host/"), "http://host/");
}

#[tokio::test]
async fn create_kernel_with_token_propagates_it_as_query_param() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/kernels"))
        .and(query_param("token", "abc"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "k1"})))
        .mount(&server)
        .await;

    let client = KernelClient::new();
    let (handle, kernel_id) = client.create_kernel(&server.uri(), Some("abc"), None).await.unwrap();
    assert_eq!(kernel_id, "k1");

    let target = client.build_ws_url(&handle, &kernel_id);
    assert!(target.url.starts_with("ws://"));
    assert!(target.url.contains("api/kernels/k1/channels?token=abc"));
    assert!(target.headers.is_empty());
}

#[tokio::test]
async fn create_kernel_maps_non_2xx_to_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/kernels"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = KernelClient::new();
    let err = client.create_kernel(&server.uri(), None, None).await.unwrap_err();
    match err {
        KernelError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_kernel_is_best_effort_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/kernels"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "k1"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/kernels/k1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = KernelClient::new();
    let (handle, kernel_id) = client.create_kernel(&server.uri(), None, None).await.unwrap();
    // Must not panic or propagate; best-effort per §4.A.
    client.delete_kernel(&handle, &kernel_id).await;
}
