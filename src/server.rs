//! MCP Server: stdio transport, JSON-RPC 2.0, newline-delimited.
//!
//! Exposes the similarity tools over the Model Context Protocol. Reads
//! JSON-RPC requests one per line, dispatches to the tool router, and
//! writes one response per line.
//!
//! Protocol flow:
//! 1. Client sends `initialize` → server responds with capabilities
//! 2. Client sends `notifications/initialized`
//! 3. Client sends `tools/list` → server returns tool definitions
//! 4. Client sends `tools/call` → server runs a comparison and returns the result
//! 5. Client closes stdin → server exits

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::session::DEFAULT_MAX_SESSIONS;
use crate::similarity::{DEFAULT_DISTANCE_THRESHOLD, Delimiter};
use crate::tools::ToolRouter;

/// Maximum size of a single JSON-RPC line (10 MiB).
const MAX_LINE_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 types
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 request.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// MCP protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolsCapability {
    list_changed: bool,
}

/// MCP initialize result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    protocol_version: String,
    capabilities: ServerCapabilities,
    server_info: ServerInfo,
}

/// MCP tool definition for tools/list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolsListResult {
    tools: Vec<ToolDefinition>,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// MCP content item in tools/call response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// MCP tools/call result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ContentItem>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Server configuration
// ---------------------------------------------------------------------------

/// Configuration for the MCP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Threshold used when a request omits `distanceThreshold`.
    pub default_threshold: usize,
    /// Delimiter used when a chunked request names neither granularity nor pattern.
    pub default_delimiter: Delimiter,
    /// Sessions kept before the oldest is evicted.
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_threshold: DEFAULT_DISTANCE_THRESHOLD,
            default_delimiter: Delimiter::Sentences,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ServerConfig {
    /// Build a config from command-line flags (program name excluded).
    ///
    /// Recognised: `--threshold <n>`, `--granularity <sentences|paragraphs>`,
    /// `--pattern <regex>`, `--max-sessions <n>`.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .with_context(|| format!("missing value for {flag}"))
            };
            match flag.as_str() {
                "--threshold" => {
                    let raw = value()?;
                    config.default_threshold = raw
                        .parse()
                        .with_context(|| format!("invalid --threshold: {raw}"))?;
                }
                "--granularity" => {
                    config.default_delimiter = value()?.parse()?;
                }
                "--pattern" => {
                    let delimiter = Delimiter::from_pattern(&value()?);
                    delimiter.splitter()?;
                    config.default_delimiter = delimiter;
                }
                "--max-sessions" => {
                    let raw = value()?;
                    config.max_sessions = raw
                        .parse()
                        .with_context(|| format!("invalid --max-sessions: {raw}"))?;
                    if config.max_sessions == 0 {
                        bail!("--max-sessions must be at least 1");
                    }
                }
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Server main loop
// ---------------------------------------------------------------------------

/// Run the MCP server on stdin/stdout until stdin closes.
pub fn run_server(config: &ServerConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let reader = std::io::BufReader::new(stdin.lock());
    let stdout = std::io::stdout().lock();
    serve(reader, stdout, config)
}

/// Serve JSON-RPC requests from `reader`, writing responses to `writer`.
///
/// Returns when `reader` reaches EOF.
///
/// # Errors
///
/// Returns an error if reading or writing fails fatally.
pub fn serve(mut reader: impl BufRead, mut writer: impl Write, config: &ServerConfig) -> Result<()> {
    info!(
        threshold = config.default_threshold,
        delimiter = %config.default_delimiter,
        max_sessions = config.max_sessions,
        "simcheck MCP server starting"
    );

    let router = ToolRouter::new(config);
    let mut line_buf = String::new();

    loop {
        line_buf.clear();
        match read_line_limited(&mut reader, &mut line_buf, MAX_LINE_BYTES)
            .context("failed to read request")?
        {
            // EOF, client closed the stream, clean exit.
            LineRead::Eof => {
                info!("input closed, shutting down");
                break;
            }
            LineRead::Oversized => {
                warn!(max_bytes = MAX_LINE_BYTES, "oversized request dropped");
                let resp = error_response(
                    None,
                    -32600,
                    &format!("invalid request: line exceeds maximum size ({MAX_LINE_BYTES} bytes)"),
                );
                write_response(&mut writer, &resp)?;
                continue;
            }
            LineRead::Line => {}
        }

        let trimmed = line_buf.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!(bytes = trimmed.len(), "received request");

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                let resp = error_response(None, -32700, &format!("parse error: {e}"));
                write_response(&mut writer, &resp)?;
                continue;
            }
        };

        // "jsonrpc" MUST be exactly "2.0".
        if request.jsonrpc != "2.0" {
            warn!(
                version = %request.jsonrpc,
                "invalid JSON-RPC version (expected \"2.0\")"
            );
            let resp = error_response(
                request.id.clone(),
                -32600,
                &format!(
                    "invalid request: jsonrpc version must be \"2.0\", got \"{}\"",
                    request.jsonrpc
                ),
            );
            write_response(&mut writer, &resp)?;
            continue;
        }

        // Notifications (no id) never receive a response.
        let is_notification = request.id.is_none();
        let response = dispatch(&router, &request);

        if is_notification {
            debug!(method = %request.method, "notification handled (no response)");
            continue;
        }

        if let Some(resp) = response {
            write_response(&mut writer, &resp)?;
        }
    }

    info!("simcheck MCP server stopped");
    Ok(())
}

/// Dispatch a JSON-RPC request to the appropriate handler.
fn dispatch(router: &ToolRouter, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => Some(handle_initialize(req)),
        "notifications/initialized" => {
            info!("client initialized");
            None
        }
        "tools/list" => Some(handle_tools_list(router, req)),
        "tools/call" => Some(handle_tools_call(router, req)),
        "ping" => Some(handle_ping(req)),
        _ => {
            warn!(method = %req.method, "unknown method");
            Some(error_response(
                req.id.clone(),
                -32601,
                &format!("method not found: {}", req.method),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_initialize(req: &JsonRpcRequest) -> JsonRpcResponse {
    let result = InitializeResult {
        protocol_version: "2025-06-18".to_owned(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: "simcheck".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        },
    };

    success_response(req.id.clone(), &result)
}

fn handle_tools_list(router: &ToolRouter, req: &JsonRpcRequest) -> JsonRpcResponse {
    let tools = router.list_tools();
    let result = ToolsListResult { tools };
    success_response(req.id.clone(), &result)
}

fn handle_tools_call(router: &ToolRouter, req: &JsonRpcRequest) -> JsonRpcResponse {
    let params: ToolCallParams = match serde_json::from_value(req.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return error_response(
                req.id.clone(),
                -32602,
                &format!("invalid tools/call params: {e}"),
            );
        }
    };

    match router.call_tool(&params.name, params.arguments) {
        Ok(result) => success_response(req.id.clone(), &result),
        Err(e) => {
            error!(tool = %params.name, error = %e, "tool call failed");
            let result = ToolCallResult {
                content: vec![ContentItem {
                    content_type: "text".to_owned(),
                    text: format!("Error: {e:#}"),
                }],
                is_error: true,
            };
            success_response(req.id.clone(), &result)
        }
    }
}

fn handle_ping(req: &JsonRpcRequest) -> JsonRpcResponse {
    success_response(req.id.clone(), &serde_json::json!({}))
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn success_response(id: Option<serde_json::Value>, result: &impl Serialize) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(v) => JsonRpcResponse {
            jsonrpc: "2.0".to_owned(),
            id,
            result: Some(v),
            error: None,
        },
        Err(e) => {
            error!(error = %e, "failed to serialize success response");
            JsonRpcResponse {
                jsonrpc: "2.0".to_owned(),
                id,
                result: None,
                error: Some(JsonRpcError {
                    code: -32603,
                    message: format!("internal error: failed to serialize result: {e}"),
                    data: None,
                }),
            }
        }
    }
}

fn error_response(id: Option<serde_json::Value>, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_owned(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_owned(),
            data: None,
        }),
    }
}

/// Write a JSON-RPC response as a single line.
fn write_response(out: &mut impl Write, resp: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(resp).context("failed to serialize response")?;
    debug!(bytes = json.len(), "sending response");
    out.write_all(json.as_bytes())
        .context("failed to write response")?;
    out.write_all(b"\n")
        .context("failed to write newline")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

/// Outcome of [`read_line_limited`].
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    /// A full line (or the final unterminated line) is in the buffer.
    Line,
    /// The line was longer than the limit and has been discarded.
    Oversized,
    Eof,
}

/// Read a line from `reader` into `buf`, stopping at newline or `max_bytes`.
///
/// An oversized line is consumed through its newline and discarded, leaving
/// `buf` empty, so the next call starts on the following line.
fn read_line_limited(reader: &mut impl BufRead, buf: &mut String, max_bytes: usize) -> Result<LineRead> {
    let mut total = 0usize;
    loop {
        let available = reader.fill_buf().context("fill_buf failed")?;
        if available.is_empty() {
            return Ok(if total == 0 { LineRead::Eof } else { LineRead::Line });
        }
        let (consumed, found_newline) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };
        if total + consumed > max_bytes {
            reader.consume(consumed);
            // Drain the remainder of the oversized line.
            if !found_newline {
                loop {
                    let rest = reader.fill_buf().context("fill_buf failed")?;
                    if rest.is_empty() {
                        break;
                    }
                    let (eat, done) = match rest.iter().position(|&b| b == b'\n') {
                        Some(pos) => (pos + 1, true),
                        None => (rest.len(), false),
                    };
                    reader.consume(eat);
                    if done {
                        break;
                    }
                }
            }
            buf.clear();
            return Ok(LineRead::Oversized);
        }
        let chunk = std::str::from_utf8(&available[..consumed])
            .context("non-UTF-8 data on input")?;
        buf.push_str(chunk);
        total += consumed;
        reader.consume(consumed);
        if found_newline {
            return Ok(LineRead::Line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_limited() {
        let mut input = std::io::Cursor::new(b"first\nsecond".to_vec());
        let mut buf = String::new();
        assert_eq!(read_line_limited(&mut input, &mut buf, 64).expect("read"), LineRead::Line);
        assert_eq!(buf, "first\n");
        buf.clear();
        assert_eq!(read_line_limited(&mut input, &mut buf, 64).expect("read"), LineRead::Line);
        assert_eq!(buf, "second");
        buf.clear();
        assert_eq!(read_line_limited(&mut input, &mut buf, 64).expect("read"), LineRead::Eof);
    }

    #[test]
    fn test_read_line_limited_oversized() {
        let mut input = std::io::Cursor::new(b"0123456789\nok\n".to_vec());
        let mut buf = String::new();
        assert_eq!(
            read_line_limited(&mut input, &mut buf, 4).expect("read"),
            LineRead::Oversized
        );
        assert!(buf.is_empty());
        // The oversized line is drained; the next one is intact.
        assert_eq!(read_line_limited(&mut input, &mut buf, 4).expect("read"), LineRead::Line);
        assert_eq!(buf, "ok\n");
    }

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::from_args(Vec::new()).expect("defaults");
        assert_eq!(config.default_threshold, DEFAULT_DISTANCE_THRESHOLD);
        assert_eq!(config.default_delimiter, Delimiter::Sentences);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_config_flags() {
        let args = ["--threshold", "25", "--granularity", "paragraphs", "--max-sessions", "3"]
            .map(str::to_owned);
        let config = ServerConfig::from_args(args).expect("flags");
        assert_eq!(config.default_threshold, 25);
        assert_eq!(config.default_delimiter, Delimiter::Paragraphs);
        assert_eq!(config.max_sessions, 3);
    }

    #[test]
    fn test_config_rejects_bad_input() {
        let bad = [
            vec!["--threshold", "-1"],
            vec!["--threshold"],
            vec!["--granularity", "words"],
            vec!["--pattern", "("],
            vec!["--max-sessions", "0"],
            vec!["--workspace", "."],
        ];
        for args in bad {
            let owned: Vec<String> = args.iter().map(|s| (*s).to_owned()).collect();
            assert!(ServerConfig::from_args(owned).is_err(), "{args:?} should fail");
        }
    }
}
