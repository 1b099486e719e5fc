//! `simcheck`: character-level plagiarism screening.
//!
//! Scores how close two passages are using a bounded Levenshtein distance,
//! either over the whole text or per sentence / paragraph chunk. The scoring
//! core is pure and synchronous; an MCP server over stdio (JSON-RPC 2.0,
//! newline-delimited) exposes it to a UI or agent.
//!
//! # Tools
//!
//! - `compare`: whole-text similarity percentage
//! - `compare_chunks`: per-chunk best-match table, mean, heatmap colours
//! - `distance`: raw bounded edit distance
//! - `chunks` / `your_text`: read back the last result of a session
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON-RPC) → server → ToolRouter → tools ─→ similarity (pure)
//!                                              └──→ SessionStore
//! stdout (JSON-RPC) ←─────────────────────────┘
//! ```

pub mod error;
pub mod server;
pub mod session;
pub mod similarity;
pub mod tools;

pub use error::{SimResult, SimilarityError};
pub use server::{ServerConfig, run_server, serve};
pub use similarity::{
    ChunkedSimilarity, DEFAULT_DISTANCE_THRESHOLD, Delimiter, Distance, bounded_distance,
    chunked_similarity, distance, heat_color, similarity_percent, split_chunks,
};
