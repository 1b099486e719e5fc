//! Splitting texts into sentence / paragraph chunks.
//!
//! Chunks are slices of the source text in left-to-right order. Empty and
//! whitespace-only pieces are dropped; surviving chunks keep their own
//! whitespace untouched.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{SimResult, SimilarityError};

/// Legacy sentence pattern sent by older clients (lookbehind, not supported
/// by the `regex` crate, so it is mapped onto [`Delimiter::Sentences`]).
const LEGACY_SENTENCE_PATTERN: &str = r"(?<=[.!?])\s+";

/// Punctuation followed by whitespace. The punctuation byte stays with the
/// chunk before the split.
const SENTENCE_BOUNDARY: &str = r"[.!?]\s+";

const PARAGRAPH_BOUNDARY: &str = "\n";

/// How a text is cut into chunks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Split on whitespace runs that follow `.`, `!` or `?`.
    #[default]
    Sentences,
    /// Split on every newline.
    Paragraphs,
    /// Split on every match of a caller-supplied regex.
    Custom(String),
}

impl Delimiter {
    /// Interpret a raw delimiter pattern.
    ///
    /// The two legacy patterns clients historically sent for sentences and
    /// paragraphs map onto the built-in modes; anything else is custom.
    pub fn from_pattern(pattern: &str) -> Self {
        match pattern {
            LEGACY_SENTENCE_PATTERN | "sentences" => Self::Sentences,
            PARAGRAPH_BOUNDARY | r"\n" | "paragraphs" => Self::Paragraphs,
            other => Self::Custom(other.to_owned()),
        }
    }

    fn regex_source(&self) -> &str {
        match self {
            Self::Sentences => SENTENCE_BOUNDARY,
            Self::Paragraphs => PARAGRAPH_BOUNDARY,
            Self::Custom(p) => p,
        }
    }

    /// Bytes of each match that belong to the preceding chunk.
    const fn kept_prefix(&self) -> usize {
        match self {
            // `.`, `!` and `?` are all one byte.
            Self::Sentences => 1,
            Self::Paragraphs | Self::Custom(_) => 0,
        }
    }

    /// Compile the boundary regex into a reusable [`Splitter`].
    pub fn splitter(&self) -> SimResult<Splitter> {
        let source = self.regex_source();
        let boundary = Regex::new(source).map_err(|err| SimilarityError::Pattern {
            pattern: source.to_owned(),
            source: err,
        })?;
        Ok(Splitter {
            boundary,
            kept_prefix: self.kept_prefix(),
        })
    }
}

impl FromStr for Delimiter {
    type Err = SimilarityError;

    /// Parse a granularity name (`sentences` or `paragraphs`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentences" | "sentence" => Ok(Self::Sentences),
            "paragraphs" | "paragraph" => Ok(Self::Paragraphs),
            _ => Err(SimilarityError::UnknownGranularity(s.to_owned())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentences => f.write_str("sentences"),
            Self::Paragraphs => f.write_str("paragraphs"),
            Self::Custom(p) => write!(f, "pattern {p:?}"),
        }
    }
}

/// A compiled [`Delimiter`].
#[derive(Debug, Clone)]
pub struct Splitter {
    boundary: Regex,
    kept_prefix: usize,
}

impl Splitter {
    /// Split `text` into its non-blank chunks.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut chunks = Vec::new();
        let mut start = 0;
        for m in self.boundary.find_iter(text) {
            let cut = (m.start() + self.kept_prefix).min(m.end());
            chunks.push(&text[start..cut]);
            start = m.end();
        }
        chunks.push(&text[start..]);
        chunks.retain(|chunk| !chunk.trim().is_empty());
        chunks
    }
}

/// Split `text` into its non-blank chunks.
pub fn split_chunks<'a>(text: &'a str, delimiter: &Delimiter) -> SimResult<Vec<&'a str>> {
    Ok(delimiter.splitter()?.split(text))
}
