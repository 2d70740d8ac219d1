// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::ids::{ChatId, DaemonId, MessageId};
use crate::event::{DaemonStatus, StatusEvent};

fn status(reason: &str) -> Event {
    Event::Status(StatusEvent {
        daemon_id: DaemonId::new("d1"),
        chat_id: ChatId::new("c1"),
        message_id: MessageId::new("m1"),
        status: DaemonStatus::Completed,
        reason: reason.into(),
    })
}

#[tokio::test]
async fn none_sink_is_a_no_op() {
    emit(None, status("x")).await;
}

#[tokio::test]
async fn fake_sink_records_events_in_order() {
    let sink = FakeEventSink::new();
    emit(Some(&sink), status("first")).await;
    emit(Some(&sink), status("second")).await;
    let events = sink.events();
    assert_eq!(events.len(), 2);
    match (&events[0], &events[1]) {
        (Event::Status(a), Event::Status(b)) => {
            assert_eq!(a.reason, "first");
            assert_eq!(b.reason, "second");
        }
        _ => panic!("expected status events"),
    }
}
