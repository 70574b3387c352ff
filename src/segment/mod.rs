//! Sentence segmentation.
//!
//! Splits document text into an ordered sequence of trimmed sentences and drops spans shorter
//! than the configured minimum (headers, stray bullets, dates). The segmenter holds no state
//! between calls: the same text always yields the same sentences.

mod rules;


use tracing::debug;

use crate::constants::DEFAULT_MIN_SENTENCE_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSegmenter {
    min_chars: usize,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_SENTENCE_CHARS,
        }
    }
}

impl SentenceSegmenter {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Minimum sentence length in characters (Unicode scalar values).
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Sentences that survive the length filter, borrowed from `text`.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let spans = rules::split_spans(text);
        let total = spans.len();

        let kept: Vec<&str> = spans
            .into_iter()
            .filter(|span| span.chars().count() >= self.min_chars)
            .collect();

        debug!(
            spans = total,
            kept = kept.len(),
            min_chars = self.min_chars,
            "Segmented text"
        );

        kept
    }

    /// Owned variant of [`sentences`](Self::sentences).
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.sentences(text)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
