//! Compare tool: whole-text similarity percentage.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::{ServerConfig, ToolCallResult, ToolDefinition};
use crate::session::SessionStore;
use crate::similarity::similarity_percent;

/// Parameters for the compare tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareParams {
    /// The text under test.
    pub text1: String,
    /// The reference text.
    pub text2: String,
    /// Maximum edit distance worth computing exactly.
    #[serde(default)]
    pub distance_threshold: Option<usize>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompareOutput {
    similarity: f64,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "compare".to_owned(),
        description: "Similarity percentage (0-100) between two texts based on Levenshtein distance. \
            Returns 0 when the distance exceeds distanceThreshold."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "text1": {
                    "type": "string",
                    "description": "The text to check"
                },
                "text2": {
                    "type": "string",
                    "description": "The reference text"
                },
                "distanceThreshold": {
                    "type": "integer",
                    "description": "Maximum edit distance computed exactly (default: 1000)",
                    "minimum": 0
                },
                "sessionId": {
                    "type": "string",
                    "description": "Session to record text1 under (default: \"default\")"
                }
            },
            "required": ["text1", "text2"]
        }),
    }
}

/// Execute the compare tool.
pub fn execute(
    config: &ServerConfig,
    sessions: &SessionStore,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params: CompareParams =
        serde_json::from_value(arguments).context("invalid compare parameters")?;

    if let Err(e) = super::require_text("text1", &params.text1)
        .and_then(|()| super::require_text("text2", &params.text2))
    {
        return Ok(super::error_result(&e));
    }

    let threshold = params.distance_threshold.unwrap_or(config.default_threshold);
    let session = params.session_id.as_deref().unwrap_or(super::DEFAULT_SESSION_ID);

    sessions.record_text(session, &params.text1);
    let similarity = similarity_percent(&params.text1, &params.text2, threshold);

    info!(session, threshold, similarity, "compared texts");

    super::json_result(&CompareOutput { similarity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_records_text() {
        let config = ServerConfig::default();
        let sessions = SessionStore::default();
        let result = execute(
            &config,
            &sessions,
            serde_json::json!({ "text1": "horse.", "text2": "ros.", "sessionId": "s1" }),
        )
        .expect("compare");

        assert!(!result.is_error);
        let output: serde_json::Value =
            serde_json::from_str(&result.content[0].text).expect("json output");
        assert_eq!(output["similarity"], 50.0);
        assert_eq!(sessions.last_text("s1").as_deref(), Some("horse."));
    }

    #[test]
    fn test_compare_rejects_blank() {
        let config = ServerConfig::default();
        let sessions = SessionStore::default();
        let result = execute(
            &config,
            &sessions,
            serde_json::json!({ "text1": "   ", "text2": "ros." }),
        )
        .expect("compare");

        assert!(result.is_error);
        assert!(result.content[0].text.contains("text1 must not be empty"));
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_compare_rejects_negative_threshold() {
        let config = ServerConfig::default();
        let sessions = SessionStore::default();
        let err = execute(
            &config,
            &sessions,
            serde_json::json!({ "text1": "a", "text2": "b", "distanceThreshold": -1 }),
        );
        assert!(err.is_err());
    }
}
