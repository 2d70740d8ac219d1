// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Binding Generator: given a tool catalog, a proxy URL, and a session
//! id, emit Python source text that defines `mcp_tools` — one method per
//! tool, each POSTing through the proxy and unwrapping the content
//! envelope.
//!
//! Matches the upstream code-mode bridge's `generate_mcp_bindings`: same
//! grouping-by-server-prefix, same `_call_mcp_tool`/`_unwrap_mcp_content`
//! helper shape, same single-item-unwraps/multi-item-stays-a-list asymmetry.
//! Two deliberate departures: parameter type hints are abstract labels
//! (`text`, `integer`, `sequence-of-...`, …) rather than Python type syntax,
//! since they document the shape for an LLM caller rather than enforce it;
//! and a same-group name collision is rejected with
//! `BindingError::NameCollision` instead of silently letting one tool's
//! method overwrite another's.

use crate::error::BindingError;
use codemode_mcp::ToolSpec;
use serde_json::Value;
use std::fmt::Write as _;

/// Schema `type` -> host-language type label (§4.E type-mapping table).
/// Purely documentation: see `BindingError`'s sibling Non-goal note.
pub fn type_label(schema: &Value) -> String {
    let Some(ty) = schema.get("type").and_then(Value::as_str) else {
        return "dynamic".to_string();
    };
    match ty {
        "string" => "text".to_string(),
        "integer" => "integer".to_string(),
        "number" => "floating".to_string(),
        "boolean" => "boolean".to_string(),
        "null" => "none".to_string(),
        "object" => "mapping".to_string(),
        "array" => match schema.get("items") {
            Some(items) => format!("sequence-of-{}", type_label(items)),
            None => "sequence-of-dynamic".to_string(),
        },
        _ => "dynamic".to_string(),
    }
}

/// Split a canonical tool name into `(server_id, tail)` on the first
/// underscore (§4.E method generation rules). No underscore -> `default`.
fn split_server_tool(full_name: &str) -> (String, String) {
    match full_name.split_once('_') {
        Some((server_id, tail)) if !tail.is_empty() => (server_id.to_string(), tail.to_string()),
        _ => ("default".to_string(), full_name.to_string()),
    }
}

/// `-`/`.` -> `_` (§4.E).
fn sanitize_method_name(tail: &str) -> String {
    tail.replace(['-', '.'], "_")
}

struct ParamDecl {
    /// Original (un-sanitized) schema property name — forwarded as-is in
    /// the call envelope (§4.E: "remaining parameters are forwarded under
    /// their original (un-sanitized) names").
    original_name: String,
    /// Python-identifier-safe parameter name used in the signature/body.
    safe_name: String,
    label: String,
    description: String,
    required: bool,
}

struct ToolEntry<'a> {
    full_name: &'a str,
    method_name: String,
    spec: &'a ToolSpec,
    params: Vec<ParamDecl>,
}

fn params_for(spec: &ToolSpec) -> Vec<ParamDecl> {
    let properties = spec.parameters.get("properties").and_then(Value::as_object);
    let required: Vec<&str> = spec
        .parameters
        .get("required")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = properties else {
        return Vec::new();
    };

    properties
        .iter()
        .map(|(name, schema)| ParamDecl {
            original_name: name.clone(),
            safe_name: name.replace('-', "_"),
            label: type_label(schema),
            description: schema.get("description").and_then(Value::as_str).unwrap_or("").to_string(),
            required: required.contains(&name.as_str()),
        })
        .collect()
}

/// Group tools by server id (§4.E), preserving first-seen order both across
/// groups and within a group, and detect post-sanitization name collisions.
fn group_by_server<'a>(tools: &'a [ToolSpec]) -> Result<Vec<(String, Vec<ToolEntry<'a>>)>, BindingError> {
    let mut groups: Vec<(String, Vec<ToolEntry<'a>>)> = Vec::new();

    for spec in tools {
        let (server_id, tail) = split_server_tool(&spec.name);
        let method_name = sanitize_method_name(&tail);

        let group_idx = match groups.iter().position(|(id, _)| *id == server_id) {
            Some(idx) => idx,
            None => {
                groups.push((server_id.clone(), Vec::new()));
                groups.len() - 1
            }
        };
        let group = &mut groups[group_idx];

        if let Some(existing) = group.1.iter().find(|t| t.method_name == method_name) {
            return Err(BindingError::NameCollision {
                server_id,
                method_name,
                first_tool: existing.full_name.to_string(),
                second_tool: spec.name.clone(),
            });
        }

        group.1.push(ToolEntry { full_name: &spec.name, method_name, spec, params: params_for(spec) });
    }

    Ok(groups)
}

/// Generate the Python binding source for `tools` (§4.E). Returns an empty
/// string if there are no tools, matching the original's early return.
pub fn generate_bindings(tools: &[ToolSpec], proxy_url: &str, session_id: &str) -> Result<String, BindingError> {
    if tools.is_empty() {
        return Ok(String::new());
    }

    let groups = group_by_server(tools)?;

    let mut out = String::new();
    let _ = writeln!(out, "# ============================================================");
    let _ = writeln!(out, "# MCP Tool Bindings (Code Mode)");
    let _ = writeln!(out, "# These functions allow you to call MCP tools directly in code.");
    let _ = writeln!(out, "# ============================================================");
    out.push('\n');
    out.push_str("import json\n");
    out.push_str("import urllib.request\n");
    out.push_str("import urllib.error\n\n");
    let _ = writeln!(out, "_MCP_PROXY_URL = {}", py_str(proxy_url));
    let _ = writeln!(out, "_MCP_SESSION_ID = {}", py_str(session_id));
    out.push('\n');
    out.push_str(UNWRAPPER_SRC);
    out.push('\n');
    out.push_str(CALL_HELPER_SRC);
    out.push('\n');

    out.push_str("class MCPTools:\n");
    out.push_str("    \"\"\"\n");
    out.push_str("    MCP Tools available for this session.\n\n");
    out.push_str("    Available servers and tools:\n");
    for (server_id, entries) in &groups {
        let _ = writeln!(out, "        - {server_id}:");
        for entry in entries {
            let desc: String = entry.spec.description.chars().take(60).collect();
            let _ = writeln!(out, "            - {}: {}...", entry.method_name, desc);
        }
    }
    out.push_str("    \"\"\"\n\n");

    for (server_id, entries) in &groups {
        let _ = writeln!(out, "    # Tools from server: {server_id}");
        for entry in entries {
            write_method(&mut out, entry);
        }
    }

    out.push('\n');
    out.push_str("# Create the tools instance — use `mcp_tools` to avoid shadowing the `mcp` package\n");
    out.push_str("mcp_tools = MCPTools()\n");

    Ok(out)
}

fn write_method(out: &mut String, entry: &ToolEntry<'_>) {
    let params_sig: Vec<String> = entry
        .params
        .iter()
        .map(|p| {
            if p.required {
                p.safe_name.clone()
            } else {
                format!("{}=None", p.safe_name)
            }
        })
        .collect();

    let _ = writeln!(out, "    @staticmethod");
    let _ = writeln!(out, "    def {}({}):", entry.method_name, params_sig.join(", "));
    let _ = writeln!(out, "        \"\"\"{}", entry.spec.description);
    if !entry.params.is_empty() {
        out.push_str("\n        Args:\n");
        for p in &entry.params {
            if p.description.is_empty() {
                let _ = writeln!(out, "            {} ({}):", p.original_name, p.label);
            } else {
                let _ = writeln!(out, "            {} ({}): {}", p.original_name, p.label, p.description);
            }
        }
    }
    out.push_str("        \"\"\"\n");

    let kwargs: Vec<String> =
        entry.params.iter().map(|p| format!("{}: {}", py_str(&p.original_name), p.safe_name)).collect();
    let _ = writeln!(out, "        _kwargs = {{{}}}", kwargs.join(", "));
    out.push_str("        _kwargs = {k: v for k, v in _kwargs.items() if v is not None}\n");
    let _ = writeln!(out, "        return _call_mcp_tool({}, **_kwargs)", py_str(entry.full_name));
    out.push('\n');
}

/// Python string literal, escaping quotes/backslashes. Proxy URLs and
/// session ids are server-generated, never user-controlled, but we escape
/// anyway so the emitted source stays syntactically valid regardless.
fn py_str(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

const UNWRAPPER_SRC: &str = r#"def _unwrap_mcp_content(result):
    """Unwrap MCP content items into plain Python data.

    MCP tools return content as a list of items like:
      [{"type": "text", "text": '{"key": "value"}'}, ...]

    This function extracts and parses the text content so tool
    results are directly usable in code.
    """
    if not isinstance(result, list):
        return result

    texts = []
    for item in result:
        if isinstance(item, dict) and item.get("type") == "text":
            raw = item.get("text", "")
            try:
                texts.append(json.loads(raw))
            except (json.JSONDecodeError, TypeError):
                texts.append(raw)
        elif isinstance(item, dict) and item.get("type") == "image":
            texts.append(item)
        else:
            texts.append(item)

    if len(texts) == 1:
        return texts[0]
    return texts
"#;

const CALL_HELPER_SRC: &str = r#"def _call_mcp_tool(tool_name, **kwargs):
    """Internal function to call MCP tools via proxy."""
    data = json.dumps({
        "tool_name": tool_name,
        "arguments": kwargs,
        "session_id": _MCP_SESSION_ID,
    }).encode("utf-8")

    req = urllib.request.Request(
        _MCP_PROXY_URL,
        data=data,
        headers={"Content-Type": "application/json"},
        method="POST",
    )

    try:
        with urllib.request.urlopen(req, timeout=60) as response:
            result = json.loads(response.read().decode("utf-8"))
            if result.get("error"):
                raise Exception(result["error"])
            return _unwrap_mcp_content(result.get("result", {}))
    except urllib.error.HTTPError as e:
        error_body = e.read().decode("utf-8")
        raise Exception(f"MCP tool call failed: {error_body}")
    except urllib.error.URLError as e:
        raise Exception(f"MCP proxy connection failed: {e.reason}")
"#;

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
