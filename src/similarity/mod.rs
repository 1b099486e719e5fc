//! Edit-distance similarity scoring.
//!
//! Two entry points sit on top of the bounded Levenshtein engine:
//!
//! - [`similarity_percent`]: whole-text similarity in `[0, 100]`
//! - [`chunked_similarity`]: per-chunk best-match scores plus their mean
//!
//! # Scoring
//!
//! A pair whose distance stays within the threshold scores
//! `(max_len - d) / max_len * 100`. A pair over the threshold scores 0.
//!
//! Chunked scoring is an asymmetric all-pairs best match: each chunk of the
//! first text takes its best score against *any* chunk of the second text,
//! regardless of position. One broadly similar reference chunk can therefore
//! lift several input chunks at once.

pub mod chunking;
pub mod gradient;
pub mod levenshtein;

use serde::Serialize;
use tracing::debug;

use crate::error::{SimResult, SimilarityError};

pub use chunking::{Delimiter, Splitter, split_chunks};
pub use gradient::{Rgb, heat_color, similarity_color};
pub use levenshtein::{Distance, bounded_distance, distance};

/// Default distance threshold, matching the legacy HTTP API.
pub const DEFAULT_DISTANCE_THRESHOLD: usize = 1000;

/// Result of a chunked comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkedSimilarity {
    /// Best-match score for each chunk of the first text, in order.
    pub per_chunk_similarity: Vec<f64>,
    /// Unweighted mean of `per_chunk_similarity`.
    pub overall_similarity: f64,
}

/// Similarity percentage between two texts.
///
/// Returns 0 when the distance exceeds `threshold`, and 100 for two empty
/// texts.
pub fn similarity_percent(a: &str, b: &str, threshold: usize) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    score_pair(&a_chars, &b_chars, threshold).unwrap_or(0.0)
}

/// Score one pair, or `None` when it is over the threshold.
fn score_pair(a: &[char], b: &[char], threshold: usize) -> Option<f64> {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return Some(100.0);
    }
    levenshtein::distance_chars(a, b, threshold)
        .exact()
        .map(|d| percent(max_len, d))
}

#[allow(clippy::cast_precision_loss)]
fn percent(max_len: usize, d: usize) -> f64 {
    (max_len - d) as f64 / max_len as f64 * 100.0
}

/// Per-chunk similarity of `a` against `b`.
///
/// Both texts are split with `delimiter`. Each chunk of `a` is scored
/// against every chunk of `b`; over-threshold pairings are skipped, and a
/// chunk with no scoring pairing gets 0.
///
/// # Errors
///
/// - [`SimilarityError::Pattern`] if a custom delimiter does not compile.
/// - [`SimilarityError::NoChunks`] if `a` has no non-blank chunk.
#[allow(clippy::cast_precision_loss)]
pub fn chunked_similarity(
    a: &str,
    b: &str,
    delimiter: &Delimiter,
    threshold: usize,
) -> SimResult<ChunkedSimilarity> {
    let splitter = delimiter.splitter()?;
    let chunks_a = splitter.split(a);
    let chunks_b = splitter.split(b);

    if chunks_a.is_empty() {
        return Err(SimilarityError::NoChunks);
    }

    debug!(
        %delimiter,
        threshold,
        chunks_a = chunks_a.len(),
        chunks_b = chunks_b.len(),
        "scoring chunks"
    );

    let targets: Vec<Vec<char>> = chunks_b.iter().map(|c| c.chars().collect()).collect();

    let per_chunk_similarity: Vec<f64> = chunks_a
        .iter()
        .map(|chunk| {
            let source: Vec<char> = chunk.chars().collect();
            targets
                .iter()
                .filter_map(|target| score_pair(&source, target, threshold))
                .fold(0.0, f64::max)
        })
        .collect();

    let overall_similarity =
        per_chunk_similarity.iter().sum::<f64>() / per_chunk_similarity.len() as f64;

    Ok(ChunkedSimilarity {
        per_chunk_similarity,
        overall_similarity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identical() {
        assert!((similarity_percent("hello", "hello", 10) - 100.0).abs() < EPS);
    }

    #[test]
    fn test_both_empty() {
        assert!((similarity_percent("", "", 0) - 100.0).abs() < EPS);
    }

    #[test]
    fn test_one_empty() {
        assert!(similarity_percent("abc", "", 10).abs() < EPS);
    }

    #[test]
    fn test_half() {
        // distance 3 over max length 6
        assert!((similarity_percent("horse.", "ros.", 1000) - 50.0).abs() < EPS);
    }

    #[test]
    fn test_over_threshold_is_zero() {
        assert!(similarity_percent("horse.", "ros.", 2).abs() < EPS);
    }

    #[test]
    fn test_chunked_best_match_any_position() {
        let result = chunked_similarity(
            "beta\nalpha",
            "alpha\nbeta",
            &Delimiter::Paragraphs,
            DEFAULT_DISTANCE_THRESHOLD,
        )
        .expect("chunked");
        assert_eq!(result.per_chunk_similarity, vec![100.0, 100.0]);
        assert!((result.overall_similarity - 100.0).abs() < EPS);
    }

    #[test]
    fn test_chunked_skew_preserved() {
        // One reference chunk inflates every input chunk.
        let result = chunked_similarity(
            "abcd\nabce\nabcf",
            "abcd",
            &Delimiter::Paragraphs,
            DEFAULT_DISTANCE_THRESHOLD,
        )
        .expect("chunked");
        assert_eq!(result.per_chunk_similarity, vec![100.0, 75.0, 75.0]);
    }

    #[test]
    fn test_chunked_threshold_skips_pairs() {
        let result = chunked_similarity("abcdef", "uvwxyz", &Delimiter::Paragraphs, 2)
            .expect("chunked");
        assert_eq!(result.per_chunk_similarity, vec![0.0]);
        assert!(result.overall_similarity.abs() < EPS);
    }

    #[test]
    fn test_chunked_empty_reference() {
        let result = chunked_similarity("a\nb", "  \n", &Delimiter::Paragraphs, 10)
            .expect("chunked");
        assert_eq!(result.per_chunk_similarity, vec![0.0, 0.0]);
    }

    #[test]
    fn test_chunked_no_chunks() {
        let err = chunked_similarity("  \n ", "text", &Delimiter::Paragraphs, 10)
            .expect_err("blank input");
        assert!(matches!(err, SimilarityError::NoChunks));
    }

    #[test]
    fn test_chunked_bad_pattern() {
        let err = chunked_similarity("a", "b", &Delimiter::Custom("[".to_owned()), 10)
            .expect_err("bad pattern");
        assert!(matches!(err, SimilarityError::Pattern { .. }));
    }
}
