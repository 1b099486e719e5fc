//! Distance tool: raw bounded edit distance between two texts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::server::{ServerConfig, ToolCallResult, ToolDefinition};
use crate::similarity::distance;

/// Parameters for the distance tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceParams {
    pub text1: String,
    pub text2: String,
    #[serde(default)]
    pub distance_threshold: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DistanceOutput {
    /// `null` when the distance exceeds the threshold.
    distance: Option<usize>,
    within_threshold: bool,
    threshold: usize,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "distance".to_owned(),
        description: "Levenshtein edit distance between two texts. Distances above \
            distanceThreshold are not computed and come back as null."
            .to_owned(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "text1": { "type": "string" },
                "text2": { "type": "string" },
                "distanceThreshold": {
                    "type": "integer",
                    "description": "Maximum edit distance computed exactly (default: 1000)",
                    "minimum": 0
                }
            },
            "required": ["text1", "text2"]
        }),
    }
}

/// Execute the distance tool. Empty texts are allowed here.
pub fn execute(config: &ServerConfig, arguments: serde_json::Value) -> Result<ToolCallResult> {
    let params: DistanceParams =
        serde_json::from_value(arguments).context("invalid distance parameters")?;

    let threshold = params.distance_threshold.unwrap_or(config.default_threshold);
    let result = distance(&params.text1, &params.text2, threshold);

    super::json_result(&DistanceOutput {
        distance: result.exact(),
        within_threshold: result.is_within_threshold(),
        threshold,
    })
}
