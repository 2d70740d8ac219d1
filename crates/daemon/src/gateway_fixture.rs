// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A real local kernel gateway for tests that drive a daemon end to end:
//! `POST`/`DELETE /api/kernels` answered inline, `GET .../channels` upgraded
//! to a real WebSocket via `tokio-tungstenite`, grounded on the containerized
//! adapter's own test doubles and on `turbomcp-transport`'s
//! `WebSocketTestServer` (raw `TcpListener` + `accept_async`, no mock layer).
//!
//! One connection handler serves both protocols: it peeks the request line
//! without consuming the socket, so an unmatched peek still leaves the bytes
//! in place for whichever real parser handles the request next.

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

/// What the fake gateway's channels endpoint does once a daemon connects.
pub enum ChannelScript {
    /// Accept the socket and never send anything (daemon stays "running").
    Hang,
    /// Accept the socket, then close it immediately (simulates a dead kernel).
    CloseImmediately,
    /// Accept, then echo each of these frames back in order, reusing the
    /// `parent_header.msg_id` the client's `execute_request` carried.
    Reply(Vec<Box<dyn Fn(&str) -> String + Send + Sync>>),
}

pub struct FakeGateway {
    pub addr: std::net::SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeGateway {
    pub async fn start(script: ChannelScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake gateway");
        let addr = listener.local_addr().expect("local addr");
        let script = Arc::new(Mutex::new(script));

        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else { break };
                let script = Arc::clone(&script);
                tokio::spawn(handle_connection(stream, script));
            }
        });

        Self { addr, handle }
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FakeGateway {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(mut stream: TcpStream, script: Arc<Mutex<ChannelScript>>) {
    let mut probe = [0u8; 1024];
    // The request line can arrive split across several reads on a loopback
    // socket; retry the peek until a full line shows up.
    let mut first_line = String::new();
    for _ in 0..50 {
        let Ok(n) = stream.peek(&mut probe).await else { return };
        let head = String::from_utf8_lossy(&probe[..n]);
        if let Some(line) = head.lines().next().filter(|l| head.contains('\n')) {
            first_line = line.to_string();
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    if first_line.is_empty() {
        return;
    }

    if first_line.starts_with("POST /api/kernels") {
        drain_request(&mut stream).await;
        respond(&mut stream, 201, "application/json", r#"{"id":"k1"}"#).await;
    } else if first_line.starts_with("DELETE /api/kernels/") {
        drain_request(&mut stream).await;
        respond(&mut stream, 204, "text/plain", "").await;
    } else if first_line.contains("/channels") {
        if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
            drive_channel(ws, script).await;
        }
    }
}

/// Reads and discards the request up through the end of headers. These
/// fixture requests never carry a body, so this is enough to let the client
/// finish writing before we respond on the same connection.
async fn drain_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 512];
    loop {
        let Ok(n) = stream.read(&mut chunk).await else { return };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            return;
        }
    }
}

async fn respond(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let reason = match status {
        201 => "Created",
        204 => "No Content",
        _ => "OK",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn drive_channel(
    mut ws: tokio_tungstenite::WebSocketStream<TcpStream>,
    script: Arc<Mutex<ChannelScript>>,
) {
    use futures_util::{SinkExt, StreamExt};

    let mut guard = script.lock().await;
    match &mut *guard {
        ChannelScript::CloseImmediately => {
            let _ = ws.close(None).await;
        }
        ChannelScript::Hang => {
            // Keep the connection open but never answer; read until the
            // client disconnects so the task doesn't exit early.
            drop(guard);
            while ws.next().await.is_some() {}
        }
        ChannelScript::Reply(frames) => {
            let Some(Ok(Message::Text(sent))) = ws.next().await else { return };
            let msg_id = serde_json::from_str::<serde_json::Value>(&sent)
                .ok()
                .and_then(|v| v.get("header").and_then(|h| h.get("msg_id")).and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_default();
            for build in frames.drain(..) {
                let text = build(&msg_id);
                if ws.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            drop(guard);
            while ws.next().await.is_some() {}
        }
    }
}
