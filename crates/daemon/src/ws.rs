// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The real channels WebSocket, wired behind the `KernelSocket` trait.
//!
//! Grounded on the containerized agent adapter's `connect_ws`/`event_bridge`
//! pair: a plain `tokio-tungstenite` stream, classified message by message,
//! with malformed or irrelevant frames swallowed inside the loop rather than
//! surfaced to the caller.

use crate::error::DaemonError;
use crate::runner::KernelSocket;
use async_trait::async_trait;
use codemode_kernel::WsTarget;
use codemode_wire::kernel::{ExecuteRequest, KernelFrame};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub struct WsKernelSocket {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

/// Connect to the kernel's channels endpoint, attaching the auth headers a
/// password-authenticated gateway requires (cookie + XSRF token).
pub async fn connect(target: &WsTarget) -> Result<WsKernelSocket, DaemonError> {
    let mut request = target.url.as_str().into_client_request().map_err(|e| DaemonError::WebSocket(e.to_string()))?;
    for (name, value) in &target.headers {
        let header_value =
            HeaderValue::from_str(value).map_err(|e| DaemonError::WebSocket(e.to_string()))?;
        request.headers_mut().insert(
            tokio_tungstenite::tungstenite::http::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DaemonError::WebSocket(e.to_string()))?,
            header_value,
        );
    }

    let (stream, _response) =
        tokio_tungstenite::connect_async(request).await.map_err(|e| DaemonError::WebSocket(e.to_string()))?;

    Ok(WsKernelSocket { stream })
}

#[async_trait]
impl KernelSocket for WsKernelSocket {
    async fn send_execute_request(&mut self, request: &ExecuteRequest) -> Result<(), DaemonError> {
        let text = serde_json::to_string(request).map_err(|e| DaemonError::WebSocket(e.to_string()))?;
        self.stream.send(Message::Text(text)).await.map_err(|e| DaemonError::WebSocket(e.to_string()))
    }

    async fn recv_frame(&mut self) -> Option<KernelFrame> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => match serde_json::from_str::<KernelFrame>(&text) {
                    Ok(frame) => return Some(frame),
                    Err(e) => {
                        tracing::warn!(error = %e, "kernel socket: discarding malformed frame");
                        continue;
                    }
                },
                Some(Ok(Message::Close(_))) => {
                    tracing::debug!("kernel socket: received close frame");
                    return None;
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "kernel socket: read error");
                    return None;
                }
                None => return None,
            }
        }
    }
}
