//! Bounded Levenshtein edit distance.
//!
//! Used by the similarity aggregator to score text and chunk pairs. The
//! caller supplies a threshold; distances beyond it are never computed
//! exactly and surface as [`Distance::AboveThreshold`].

/// Outcome of a bounded edit-distance computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    /// Exact edit distance, known to be `<= threshold`.
    Exact(usize),
    /// The distance exceeds the threshold. Its exact value is unknown.
    AboveThreshold,
}

impl Distance {
    /// The exact distance, if it was within the threshold.
    pub const fn exact(self) -> Option<usize> {
        match self {
            Self::Exact(d) => Some(d),
            Self::AboveThreshold => None,
        }
    }

    pub const fn is_within_threshold(self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// Numeric form: the exact distance, or the sentinel `threshold + 1`.
    ///
    /// The sentinel only means "too far to care about". It is not a distance.
    pub const fn value(self, threshold: usize) -> usize {
        match self {
            Self::Exact(d) => d,
            Self::AboveThreshold => threshold.saturating_add(1),
        }
    }
}

/// Compute the edit distance between `a` and `b`, giving up past `threshold`.
///
/// Lengths are measured in `char`s. See [`distance_chars`] for the algorithm.
pub fn distance(a: &str, b: &str, threshold: usize) -> Distance {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    distance_chars(&a_chars, &b_chars, threshold)
}

/// Like [`distance`], but returns the sentinel `threshold + 1` instead of
/// [`Distance::AboveThreshold`].
pub fn bounded_distance(a: &str, b: &str, threshold: usize) -> usize {
    distance(a, b, threshold).value(threshold)
}

/// Bounded Levenshtein over pre-split character sequences.
///
/// Two exits skip work once the answer is known to exceed `threshold`:
/// 1. The length difference is a lower bound (insertions/deletions alone),
///    so `|m - n| > threshold` returns before any row is allocated.
/// 2. After each row, if every cell (column 0 included) is above
///    `threshold`, no later row can come back under it.
///
/// The shorter input is laid along the columns, so the two rolling rows
/// are `min(m, n) + 1` long.
pub fn distance_chars(a: &[char], b: &[char], threshold: usize) -> Distance {
    let (rows, cols) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let m = rows.len();
    let n = cols.len();

    // Quick reject: length difference alone exceeds the budget.
    if m - n > threshold {
        return Distance::AboveThreshold;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        let mut row_min = i;
        for j in 1..=n {
            curr[j] = if rows[i - 1] == cols[j - 1] {
                prev[j - 1]
            } else {
                1 + prev[j] // deletion
                    .min(curr[j - 1]) // insertion
                    .min(prev[j - 1]) // substitution
            };
            row_min = row_min.min(curr[j]);
        }
        if row_min > threshold {
            return Distance::AboveThreshold;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let d = prev[n];
    if d <= threshold {
        Distance::Exact(d)
    } else {
        Distance::AboveThreshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(distance("hello", "hello", 0), Distance::Exact(0));
        assert_eq!(distance("", "", 0), Distance::Exact(0));
    }

    #[test]
    fn test_empty() {
        assert_eq!(distance("", "abc", 10), Distance::Exact(3));
        assert_eq!(distance("abc", "", 10), Distance::Exact(3));
        assert_eq!(distance("abc", "", 2), Distance::AboveThreshold);
    }

    #[test]
    fn test_single_edit() {
        assert_eq!(distance("kitten", "sitten", 5), Distance::Exact(1)); // substitution
        assert_eq!(distance("cat", "cats", 5), Distance::Exact(1)); // insertion
        assert_eq!(distance("cats", "cat", 5), Distance::Exact(1)); // deletion
    }

    #[test]
    fn test_classic() {
        assert_eq!(distance("kitten", "sitting", 3), Distance::Exact(3));
        assert_eq!(distance("kitten", "sitting", 2), Distance::AboveThreshold);
        assert_eq!(distance("horse", "ros", 3), Distance::Exact(3));
        assert_eq!(distance("aaaaaaaaaa", "bbbbbbbbbb", 10), Distance::Exact(10));
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(distance("café", "cafe", 1), Distance::Exact(1));
        assert_eq!(distance("日本語", "日本", 1), Distance::Exact(1));
    }

    #[test]
    fn test_sentinel_value() {
        assert_eq!(bounded_distance("horse", "ros", 2), 3);
        assert_eq!(bounded_distance("horse", "ros", 1000), 3);
        assert_eq!(bounded_distance("abcdef", "a", 1), 2);
        assert_eq!(Distance::AboveThreshold.value(usize::MAX), usize::MAX);
        assert_eq!(Distance::Exact(4).exact(), Some(4));
        assert!(!Distance::AboveThreshold.is_within_threshold());
    }

    #[test]
    fn test_length_gap_rejected_without_dp() {
        // A full matrix here would be 2e10 cells; only the length check can finish in time.
        let a = "a".repeat(200_000);
        let b = "a".repeat(100_000);
        assert_eq!(distance(&a, &b, 5), Distance::AboveThreshold);
    }

    #[test]
    fn test_row_early_exit() {
        // Row `threshold + 1` is already over budget, so only a handful of rows run.
        let a = "a".repeat(50_000);
        let b = "b".repeat(50_000);
        assert_eq!(distance(&a, &b, 3), Distance::AboveThreshold);
    }

    #[test]
    fn test_exact_at_threshold_boundary() {
        assert_eq!(distance("abc", "xyz", 3), Distance::Exact(3));
        assert_eq!(distance("abc", "xyz", 2), Distance::AboveThreshold);
    }
}
