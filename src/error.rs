//! Error types for the simcheck crate.

/// Similarity-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    /// A text that must be non-empty was empty or whitespace-only.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A custom delimiter pattern failed to compile.
    #[error("invalid delimiter pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The first text produced no chunks, so there is nothing to average.
    #[error("no chunks to compare after splitting the first text")]
    NoChunks,

    /// A granularity name that is neither `sentences` nor `paragraphs`.
    #[error("unknown granularity: {0} (expected \"sentences\" or \"paragraphs\")")]
    UnknownGranularity(String),
}

/// Convenience result type for simcheck operations.
pub type SimResult<T> = Result<T, SimilarityError>;
