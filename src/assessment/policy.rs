use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_SENTENCE_CHARS, DEFAULT_SENTENCE_BATCH};
use crate::evidence::EvidencePolicy;
use crate::rating::RatingPolicy;
use crate::scoring::FailurePolicy;

/// Every tunable of the assessment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPolicy {
    /// Sentences shorter than this are dropped before scoring.
    pub min_sentence_chars: usize,
    pub evidence: EvidencePolicy,
    /// Sentences whose pairs go to the backend in one call.
    pub sentence_batch_size: usize,
    pub failure_policy: FailurePolicy,
    pub rating: RatingPolicy,
}

impl Default for AssessmentPolicy {
    fn default() -> Self {
        Self {
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
            evidence: EvidencePolicy::default(),
            sentence_batch_size: DEFAULT_SENTENCE_BATCH,
            failure_policy: FailurePolicy::default(),
            rating: RatingPolicy::default(),
        }
    }
}

impl AssessmentPolicy {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_sentence_chars == 0 {
            return Err("min_sentence_chars must be at least 1".to_string());
        }
        if self.sentence_batch_size == 0 {
            return Err("sentence_batch_size must be at least 1".to_string());
        }
        if self.evidence.top_n == 0 {
            return Err("top_evidence must be at least 1".to_string());
        }
        let threshold = self.evidence.relevance_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!(
                "relevance_threshold must be within [0, 1], got {threshold}"
            ));
        }
        self.rating.validate()
    }
}
