//! Session read-back tools: `chunks` and `your_text`.
//!
//! A UI that rendered a comparison asks for the last chunk table and the
//! last submitted text of its session. Unknown sessions read back empty.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::server::{ToolCallResult, ToolDefinition};
use crate::session::SessionStore;

/// Parameters shared by both read-back tools.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionParams {
    #[serde(default)]
    pub session_id: Option<String>,
}

impl SessionParams {
    fn parse(arguments: serde_json::Value) -> Result<Self> {
        if arguments.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(arguments).context("invalid session parameters")
    }

    fn id(&self) -> &str {
        self.session_id.as_deref().unwrap_or(super::DEFAULT_SESSION_ID)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChunksOutput {
    chunk_similarities: Vec<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct YourTextOutput {
    your_text: String,
}

fn session_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "sessionId": {
                "type": "string",
                "description": "Session to read (default: \"default\")"
            }
        }
    })
}

pub fn chunks_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "chunks".to_owned(),
        description: "Per-chunk similarity table from the session's last compare_chunks call."
            .to_owned(),
        input_schema: session_schema(),
    }
}

pub fn your_text_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "your_text".to_owned(),
        description: "The text1 most recently submitted in the session.".to_owned(),
        input_schema: session_schema(),
    }
}

pub fn execute_chunks(sessions: &SessionStore, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params = SessionParams::parse(arguments)?;
    super::json_result(&ChunksOutput {
        chunk_similarities: sessions.last_chunks(params.id()).unwrap_or_default(),
    })
}

pub fn execute_your_text(
    sessions: &SessionStore,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params = SessionParams::parse(arguments)?;
    super::json_result(&YourTextOutput {
        your_text: sessions.last_text(params.id()).unwrap_or_default(),
    })
}
