// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn response_ok_has_null_error() {
    let resp = ToolCallResponse::ok(serde_json::json!({"a": 1}));
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["result"]["a"], 1);
    assert!(json.get("error").is_none());
}

#[test]
fn response_err_has_null_result() {
    let resp = ToolCallResponse::err("boom");
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["error"], "boom");
    assert!(json.get("result").is_none());
}

#[test]
fn request_round_trips_through_json() {
    let mut arguments = serde_json::Map::new();
    arguments.insert("light_id".into(), serde_json::json!("1"));
    let req = ToolCallRequest { tool_name: "hue_set_light".into(), arguments, session_id: "s1".into() };
    let json = serde_json::to_string(&req).unwrap();
    let back: ToolCallRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back.tool_name, "hue_set_light");
    assert_eq!(back.arguments["light_id"], "1");
}

#[test]
fn content_item_constructors_shape_matches_tool_server_convention() {
    let text = content_item::text("hello");
    assert_eq!(text["type"], "text");
    assert_eq!(text["text"], "hello");

    let image = content_item::image("base64data", "image/png");
    assert_eq!(image["type"], "image");
    assert_eq!(image["mimeType"], "image/png");
}
