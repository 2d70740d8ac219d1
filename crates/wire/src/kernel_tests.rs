// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn execute_request_has_fixed_flags() {
    let req = ExecuteRequest::new("print(1)", "m1", "s1");
    assert!(!req.content.silent);
    assert!(req.content.store_history);
    assert!(!req.content.allow_stdin);
    assert!(req.content.stop_on_error);
    assert_eq!(req.msg_id(), "m1");
    assert_eq!(req.channel, "shell");
}

#[test]
fn execute_request_serializes_parent_header_as_empty_object() {
    let req = ExecuteRequest::new("1+1", "m1", "s1");
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["parent_header"], serde_json::json!({}));
    assert_eq!(json["content"]["code"], "1+1");
}

#[test]
fn frame_answers_matches_only_exact_msg_id() {
    let matching: KernelFrame = serde_json::from_value(serde_json::json!({
        "header": {"msg_id": "r1", "msg_type": "stream", "username": "k", "session": "s", "date": "", "version": "5.3"},
        "parent_header": {"msg_id": "m1"},
        "content": {},
        "msg_type": "stream",
        "channel": "iopub"
    }))
    .unwrap();
    assert!(matching.answers("m1"));
    assert!(!matching.answers("other"));
}

#[test]
fn frame_with_missing_parent_header_never_answers() {
    let frame: KernelFrame = serde_json::from_value(serde_json::json!({
        "header": {"msg_id": "r1", "msg_type": "status", "username": "k", "session": "s", "date": "", "version": "5.3"},
        "content": {},
        "msg_type": "status",
        "channel": "iopub"
    }))
    .unwrap();
    assert!(!frame.answers("m1"));
}

#[test]
fn generate_msg_id_is_hex_without_hyphens() {
    let id = generate_msg_id();
    assert!(!id.contains('-'));
    assert_eq!(id.len(), 32);
}

#[test]
fn stream_content_decodes_with_default_name() {
    let content: StreamContent = serde_json::from_value(serde_json::json!({"text": "hi"})).unwrap();
    assert_eq!(content.name, "stdout");
    assert_eq!(content.text, "hi");
}

proptest::proptest! {
    /// §8: "A frame whose `parent_header.msg_id` does not match the execute
    /// request never produces an event" — `answers` must agree with plain
    /// string equality for any pair of ids, including the case where both
    /// happen to be equal.
    #[test]
    fn answers_agrees_with_msg_id_equality(sent in "[a-z0-9]{1,16}", parent in "[a-z0-9]{1,16}") {
        let frame: KernelFrame = serde_json::from_value(serde_json::json!({
            "header": {"msg_id": "r1", "msg_type": "stream", "username": "k", "session": "s", "date": "", "version": "5.3"},
            "parent_header": {"msg_id": parent},
            "content": {},
            "msg_type": "stream",
            "channel": "iopub"
        })).unwrap();
        proptest::prop_assert_eq!(frame.answers(&sent), sent == parent);
    }
}
