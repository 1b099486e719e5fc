//! Property tests for the bounded distance engine and percentage scoring.

use proptest::prelude::*;
use simcheck::similarity::levenshtein::distance_chars;
use simcheck::{Distance, distance, similarity_percent};

/// Unbounded reference: full matrix, no early exits.
fn full_distance(a: &[char], b: &[char]) -> usize {
    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }
    matrix[a.len()][b.len()]
}

fn small_text() -> impl Strategy<Value = String> {
    "[abc .é]{0,16}"
}

proptest! {
    #[test]
    fn identity(s in small_text(), t in 0usize..20) {
        prop_assert_eq!(distance(&s, &s, t), Distance::Exact(0));
    }

    #[test]
    fn symmetric(a in small_text(), b in small_text(), t in 0usize..20) {
        prop_assert_eq!(distance(&a, &b, t), distance(&b, &a, t));
    }

    #[test]
    fn exact_or_sentinel(a in small_text(), b in small_text(), t in 0usize..20) {
        let value = distance(&a, &b, t).value(t);
        prop_assert!(value <= t || value == t + 1);
    }

    #[test]
    fn agrees_with_full_matrix(a in small_text(), b in small_text(), t in 0usize..20) {
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        let full = full_distance(&a_chars, &b_chars);
        let expected = if full <= t { Distance::Exact(full) } else { Distance::AboveThreshold };
        prop_assert_eq!(distance_chars(&a_chars, &b_chars, t), expected);
    }

    #[test]
    fn self_similarity_is_full(s in "[a-z ]{1,32}") {
        prop_assert!((similarity_percent(&s, &s, 0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn percent_in_range(a in small_text(), b in small_text(), t in 0usize..20) {
        let p = similarity_percent(&a, &b, t);
        prop_assert!((0.0..=100.0).contains(&p));
    }

    #[test]
    fn more_edits_never_score_higher(base in "[a-z]{8}", k in 0usize..8) {
        // Replacing k vs k+1 leading chars with a symbol outside the alphabet
        // keeps the length fixed and raises the distance by one.
        let edit = |n: usize| -> String {
            base.chars().enumerate().map(|(i, c)| if i < n { '#' } else { c }).collect()
        };
        let fewer = similarity_percent(&base, &edit(k), 1000);
        let more = similarity_percent(&base, &edit(k + 1), 1000);
        prop_assert!(more <= fewer);
    }
}
