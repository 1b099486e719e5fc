//! Tool router: registers and dispatches MCP tool calls.
//!
//! Each tool is a function that takes JSON arguments and returns a
//! [`ToolCallResult`]. The router owns the per-session store and the
//! request defaults, and provides `list_tools()` / `call_tool()` for the
//! MCP server.

pub mod compare;
pub mod compare_chunks;
pub mod distance;
pub mod session;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::error::{SimResult, SimilarityError};
use crate::server::{ContentItem, ServerConfig, ToolCallResult, ToolDefinition};
use crate::session::SessionStore;

/// Session used when a request does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Reject empty or whitespace-only texts before they reach the engine.
pub fn require_text(field: &str, text: &str) -> SimResult<()> {
    if text.trim().is_empty() {
        return Err(SimilarityError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// A single-item text result.
pub fn text_result(text: String, is_error: bool) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentItem {
            content_type: "text".to_owned(),
            text,
        }],
        is_error,
    }
}

/// An `isError` result carrying `Error: {err}`.
pub fn error_result(err: &impl std::fmt::Display) -> ToolCallResult {
    text_result(format!("Error: {err}"), true)
}

/// A successful result whose text is `value` as pretty-printed JSON.
pub fn json_result(value: &impl Serialize) -> Result<ToolCallResult> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize tool output")?;
    Ok(text_result(text, false))
}

/// Tool router that dispatches MCP tool calls to implementations.
pub struct ToolRouter {
    config: ServerConfig,
    sessions: SessionStore,
}

impl ToolRouter {
    /// Create a new tool router.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            config: config.clone(),
            sessions: SessionStore::new(config.max_sessions),
        }
    }

    /// The session store backing `chunks` / `your_text`.
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// List all available tools with their JSON Schema definitions.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        vec![
            compare::tool_definition(),
            compare_chunks::tool_definition(),
            distance::tool_definition(),
            session::chunks_tool_definition(),
            session::your_text_tool_definition(),
        ]
    }

    /// Call a tool by name with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed or the output
    /// cannot be serialized.
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallResult> {
        debug!(tool = name, "dispatching tool call");

        match name {
            "compare" => compare::execute(&self.config, &self.sessions, arguments),
            "compare_chunks" => compare_chunks::execute(&self.config, &self.sessions, arguments),
            "distance" => distance::execute(&self.config, arguments),
            "chunks" => session::execute_chunks(&self.sessions, arguments),
            "your_text" => session::execute_your_text(&self.sessions, arguments),
            _ => Ok(text_result(format!("Unknown tool: {name}"), true)),
        }
    }
}
