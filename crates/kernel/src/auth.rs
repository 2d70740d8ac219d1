// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authentication policy (§4.A): token beats password beats anonymous.
//!
//! Token auth propagates `token=…` as a URL parameter with no cookies.
//! Password auth performs a login round-trip — GET `login` to capture the
//! `_xsrf` cookie, POST `login` with `{_xsrf, password}` to establish a
//! session cookie — and carries `Cookie` + `X-XSRFToken` on the follow-up
//! WebSocket request. No credentials means the gateway is anonymous.

use crate::error::KernelError;
use reqwest::cookie::CookieStore;
use reqwest::Url;
use std::sync::Arc;

/// Outcome of authenticating with the kernel gateway: query parameters to
/// attach to subsequent requests plus any headers the WS connection needs.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub params: Vec<(String, String)>,
    pub ws_headers: Vec<(String, String)>,
}

pub async fn authenticate(
    client: &reqwest::Client,
    jar: &Arc<reqwest::cookie::Jar>,
    base_url: &Url,
    token: Option<&str>,
    password: Option<&str>,
) -> Result<AuthContext, KernelError> {
    if let Some(token) = token {
        return Ok(AuthContext { params: vec![("token".to_string(), token.to_string())], ws_headers: vec![] });
    }

    let Some(password) = password else {
        return Ok(AuthContext::default());
    };

    let login_url = base_url.join("login").map_err(|e| KernelError::Transport(e.to_string()))?;

    let get_resp = client.get(login_url.clone()).send().await?;
    if !get_resp.status().is_success() {
        return Err(KernelError::Auth(format!("GET login returned {}", get_resp.status())));
    }

    let xsrf = jar
        .cookies(&login_url)
        .and_then(|header| extract_cookie(header.to_str().unwrap_or(""), "_xsrf"))
        .ok_or_else(|| KernelError::Auth("_xsrf token not found".to_string()))?;

    let post_resp = client
        .post(login_url.clone())
        .header("X-XSRFToken", &xsrf)
        .form(&[("_xsrf", xsrf.as_str()), ("password", password)])
        .send()
        .await?;
    if !post_resp.status().is_success() {
        return Err(KernelError::Auth(format!("POST login returned {}", post_resp.status())));
    }

    let cookie_header =
        jar.cookies(&login_url).map(|h| h.to_str().unwrap_or("").to_string()).unwrap_or_default();

    Ok(AuthContext {
        params: vec![],
        ws_headers: vec![("Cookie".to_string(), cookie_header), ("X-XSRFToken".to_string(), xsrf)],
    })
}

fn extract_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|kv| {
        let (k, v) = kv.split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
