//! Compare-chunks tool: per-sentence / per-paragraph similarity with heatmap colours.
//!
//! Splits both texts, scores every chunk of `text1` against its best match in
//! `text2`, and returns the per-chunk table alongside the overall mean. Each
//! chunk carries a gradient colour so a UI can paint a heatmap directly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SimResult;
use crate::server::{ServerConfig, ToolCallResult, ToolDefinition};
use crate::session::SessionStore;
use crate::similarity::{Delimiter, chunked_similarity, similarity_color, split_chunks};

/// Parameters for the compare_chunks tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareChunksParams {
    pub text1: String,
    pub text2: String,
    /// `sentences` or `paragraphs`. Ignored when `pattern` is set.
    #[serde(default)]
    pub granularity: Option<String>,
    /// Regex delimiter; the legacy sentence/paragraph patterns map onto the
    /// built-in modes.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub distance_threshold: Option<usize>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CompareChunksParams {
    fn delimiter(&self, fallback: &Delimiter) -> SimResult<Delimiter> {
        match (&self.pattern, &self.granularity) {
            (Some(pattern), _) => Ok(Delimiter::from_pattern(pattern)),
            (None, Some(granularity)) => granularity.parse(),
            (None, None) => Ok(fallback.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChunkView<'a> {
    text: &'a str,
    similarity: f64,
    color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareChunksOutput<'a> {
    chunk_similarities: &'a [f64],
    similarity: f64,
    chunks: Vec<ChunkView<'a>>,
}

pub fn tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "compare_chunks".to_owned(),
        description: "Split both texts into sentences or paragraphs and score each chunk of text1 \
            against its best-matching chunk of text2. Returns per-chunk similarities, their mean, \
            and a heatmap colour per chunk."
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
                "granularity": {
                    "type": "string",
                    "enum": ["sentences", "paragraphs"],
                    "description": "Chunking mode (default: server setting)"
                },
                "pattern": {
                    "type": "string",
                    "description": "Custom regex delimiter (overrides granularity)"
                },
                "distanceThreshold": {
                    "type": "integer",
                    "description": "Maximum edit distance computed exactly (default: 1000)",
                    "minimum": 0
                },
                "sessionId": {
                    "type": "string",
                    "description": "Session to record the text and chunk table under (default: \"default\")"
                }
            },
            "required": ["text1", "text2"]
        }),
    }
}

/// Execute the compare_chunks tool.
pub fn execute(
    config: &ServerConfig,
    sessions: &SessionStore,
    arguments: serde_json::Value,
) -> Result<ToolCallResult> {
    let params: CompareChunksParams =
        serde_json::from_value(arguments).context("invalid compare_chunks parameters")?;

    let threshold = params.distance_threshold.unwrap_or(config.default_threshold);
    let session = params.session_id.as_deref().unwrap_or(super::DEFAULT_SESSION_ID);

    let outcome = super::require_text("text1", &params.text1)
        .and_then(|()| super::require_text("text2", &params.text2))
        .and_then(|()| params.delimiter(&config.default_delimiter))
        .and_then(|delimiter| {
            let scored = chunked_similarity(&params.text1, &params.text2, &delimiter, threshold)?;
            let chunks = split_chunks(&params.text1, &delimiter)?;
            Ok((delimiter, scored, chunks))
        });

    let (delimiter, scored, chunks) = match outcome {
        Ok(v) => v,
        Err(e) => return Ok(super::error_result(&e)),
    };

    sessions.record_text(session, &params.text1);
    sessions.record_chunks(session, &scored.per_chunk_similarity);

    info!(
        session,
        %delimiter,
        threshold,
        chunks = chunks.len(),
        similarity = scored.overall_similarity,
        "compared chunks"
    );

    let views = chunks
        .iter()
        .zip(&scored.per_chunk_similarity)
        .map(|(&text, &similarity)| ChunkView {
            text,
            similarity,
            color: similarity_color(similarity).to_string(),
        })
        .collect();

    super::json_result(&CompareChunksOutput {
        chunk_similarities: &scored.per_chunk_similarity,
        similarity: scored.overall_similarity,
        chunks: views,
    })
}
