// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `create_kernel` / `build_ws_url` / `delete_kernel` (§4.A).

use crate::auth::{self, AuthContext};
use crate::error::KernelError;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

const KERNEL_INIT_TIMEOUT: Duration = Duration::from_secs(10);

/// The reusable transport a daemon keeps alive for its kernel's lifetime —
/// analogous to the original's `aiohttp.ClientSession` (§4.A: "transport
/// handle reusable for subsequent requests").
#[derive(Clone)]
pub struct KernelHandle {
    client: reqwest::Client,
    base_url: Url,
    auth: AuthContext,
}

/// Everything a Daemon Runner needs to open the channels WebSocket.
#[derive(Debug, Clone)]
pub struct WsTarget {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Default, Clone)]
pub struct KernelClient;

impl KernelClient {
    pub fn new() -> Self {
        Self
    }

    /// Authenticate, start a kernel, and return a reusable handle plus the
    /// assigned kernel id (§4.A).
    pub async fn create_kernel(
        &self,
        base_url: &str,
        token: Option<&str>,
        password: Option<&str>,
    ) -> Result<(KernelHandle, String), KernelError> {
        let base_url = normalize_base(base_url);
        let base_url_parsed = Url::parse(&base_url).map_err(|e| KernelError::Transport(e.to_string()))?;

        let jar = Arc::new(reqwest::cookie::Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let auth_ctx = auth::authenticate(&client, &jar, &base_url_parsed, token, password).await?;

        let kernels_url =
            base_url_parsed.join("api/kernels").map_err(|e| KernelError::Transport(e.to_string()))?;
        let resp = tokio::time::timeout(
            KERNEL_INIT_TIMEOUT,
            client.post(kernels_url).query(&auth_ctx.params).send(),
        )
        .await
        .map_err(|_| KernelError::Transport("kernel create timed out".to_string()))??;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(KernelError::Upstream { status: status.as_u16(), body });
        }

        let body: serde_json::Value = resp.json().await?;
        let kernel_id = body
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| KernelError::Upstream { status: status.as_u16(), body: body.to_string() })?
            .to_string();

        Ok((KernelHandle { client, base_url: base_url_parsed, auth: auth_ctx }, kernel_id))
    }

    /// Build the WebSocket URL + headers a runner should connect with (§4.A).
    pub fn build_ws_url(&self, handle: &KernelHandle, kernel_id: &str) -> WsTarget {
        let ws_base = swap_scheme_to_ws(handle.base_url.as_str());
        let query = if handle.auth.params.is_empty() {
            String::new()
        } else {
            let pairs: Vec<String> =
                handle.auth.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("?{}", pairs.join("&"))
        };
        let url = format!("{ws_base}api/kernels/{kernel_id}/channels{query}");
        WsTarget { url, headers: handle.auth.ws_headers.clone() }
    }

    /// Best-effort DELETE; failure is logged, never fatal (§4.A, §7).
    pub async fn delete_kernel(&self, handle: &KernelHandle, kernel_id: &str) {
        let Ok(url) = handle.base_url.join(&format!("api/kernels/{kernel_id}")) else {
            tracing::warn!(kernel_id, "delete_kernel: could not build URL");
            return;
        };
        let result = handle.client.delete(url).query(&handle.auth.params).send().await;
        match result {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!(kernel_id, status = %resp.status(), "delete_kernel: non-2xx response");
            }
            Err(e) => {
                tracing::warn!(kernel_id, error = %e, "delete_kernel: request failed");
            }
            _ => {}
        }
    }
}

fn normalize_base(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

/// `http` → `ws` scheme swap (§4.A): replacing the first `http` substring
/// turns both `http://` and `https://` into `ws://`/`wss://` respectively.
fn swap_scheme_to_ws(base_url: &str) -> String {
    base_url.replacen("http", "ws", 1)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
