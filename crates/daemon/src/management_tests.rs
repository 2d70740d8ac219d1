// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::gateway_fixture::{ChannelScript, FakeGateway};
use crate::supervisor::{DaemonSupervisor, StartDaemonRequest};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Extension;
use axum::Router;
use codemode_core::{ChatId, FakeClock, MessageId, UserId};
use codemode_registry::SessionRegistry;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router_for(supervisor: Arc<DaemonSupervisor<FakeClock>>, identity: CallerIdentity) -> Router {
    Router::new()
        .route("/daemons", get(list_daemons::<FakeClock>))
        .route("/daemons/:daemon_id/stop", post(stop_daemon::<FakeClock>))
        .route("/daemons/chat/:chat_id/stop", post(stop_chat_daemons::<FakeClock>))
        .layer(Extension(identity))
        .with_state(supervisor)
}

async fn start(supervisor: &DaemonSupervisor<FakeClock>, base_url: &str, user: &str, chat: &str) -> String {
    let request = StartDaemonRequest::new(base_url, "while True: pass", UserId::new(user), ChatId::new(chat), MessageId::new("m1"));
    let daemon_id = supervisor.start_daemon(request).await.unwrap().as_str().to_string();
    // Give the background task a moment to register with the fake gateway
    // before assertions run against the supervisor's table.
    tokio::time::sleep(Duration::from_millis(20)).await;
    daemon_id
}

#[tokio::test]
async fn list_daemons_scopes_to_the_caller() {
    let gateway = FakeGateway::start(ChannelScript::Hang).await;
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(DaemonSupervisor::new(registry, FakeClock::new(), Duration::from_secs(3600), 3));

    start(&supervisor, &gateway.uri(), "alice", "c1").await;
    start(&supervisor, &gateway.uri(), "bob", "c2").await;

    let router = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "alice".to_string(), is_admin: false });
    let response = router
        .oneshot(Request::builder().method("GET").uri("/daemons").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["user_id"], "alice");
}

#[tokio::test]
async fn list_daemons_filters_by_chat_id_query() {
    let gateway = FakeGateway::start(ChannelScript::Hang).await;
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(DaemonSupervisor::new(registry, FakeClock::new(), Duration::from_secs(3600), 3));

    start(&supervisor, &gateway.uri(), "alice", "c1").await;
    start(&supervisor, &gateway.uri(), "alice", "c2").await;

    let router = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "alice".to_string(), is_admin: false });
    let response = router
        .oneshot(Request::builder().method("GET").uri("/daemons?chat_id=c2").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Vec<Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["chat_id"], "c2");
}

#[tokio::test]
async fn owner_can_stop_their_own_daemon() {
    let gateway = FakeGateway::start(ChannelScript::Hang).await;
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(DaemonSupervisor::new(registry, FakeClock::new(), Duration::from_secs(3600), 3));
    let daemon_id = start(&supervisor, &gateway.uri(), "alice", "c1").await;

    let router = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "alice".to_string(), is_admin: false });
    let response = router
        .oneshot(Request::builder().method("POST").uri(format!("/daemons/{daemon_id}/stop")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_owner_gets_403_and_admin_can_still_stop() {
    let gateway = FakeGateway::start(ChannelScript::Hang).await;
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(DaemonSupervisor::new(registry, FakeClock::new(), Duration::from_secs(3600), 3));
    let daemon_id = start(&supervisor, &gateway.uri(), "alice", "c1").await;

    let intruder = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "mallory".to_string(), is_admin: false });
    let response = intruder
        .oneshot(Request::builder().method("POST").uri(format!("/daemons/{daemon_id}/stop")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "root".to_string(), is_admin: true });
    let response = admin
        .oneshot(Request::builder().method("POST").uri(format!("/daemons/{daemon_id}/stop")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_daemon_is_404_for_admin_but_403_for_everyone_else() {
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(DaemonSupervisor::new(registry, FakeClock::new(), Duration::from_secs(3600), 3));

    let admin = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "root".to_string(), is_admin: true });
    let response = admin
        .oneshot(Request::builder().method("POST").uri("/daemons/ghost/stop").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let stranger = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "alice".to_string(), is_admin: false });
    let response = stranger
        .oneshot(Request::builder().method("POST").uri("/daemons/ghost/stop").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN, "existence of an id must not leak to a non-owner");
}

#[tokio::test]
async fn stop_chat_daemons_reports_how_many_were_running() {
    let gateway = FakeGateway::start(ChannelScript::Hang).await;
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(DaemonSupervisor::new(registry, FakeClock::new(), Duration::from_secs(3600), 3));
    start(&supervisor, &gateway.uri(), "alice", "c1").await;
    start(&supervisor, &gateway.uri(), "alice", "c1").await;
    start(&supervisor, &gateway.uri(), "alice", "c2").await;

    let router = router_for(Arc::clone(&supervisor), CallerIdentity { user_id: "alice".to_string(), is_admin: false });
    let response = router
        .oneshot(Request::builder().method("POST").uri("/daemons/chat/c1/stop").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(supervisor.list_daemons(Some("alice"), Some("c2")).len(), 1, "other chats untouched");
}
