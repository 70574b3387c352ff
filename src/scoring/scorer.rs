use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{CriterionCatalog, CriterionMap, CriterionProfile};
use crate::nli::EntailmentBackend;

use super::error::ScoringError;
use super::types::FailurePolicy;

/// Clamps a backend probability into `[0, 1]`; NaN counts as no evidence.
fn clamp_probability(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Maximum entailment over a criterion's hypotheses (0 when there are none).
pub fn max_relevance(entailments: &[f32]) -> f32 {
    entailments
        .iter()
        .copied()
        .map(clamp_probability)
        .fold(0.0, f32::max)
}

/// Scores sentences against criteria by querying an [`EntailmentBackend`] once per hypothesis
/// and keeping the best entailment probability.
pub struct RelevanceScorer {
    backend: Arc<dyn EntailmentBackend>,
    failure_policy: FailurePolicy,
}

impl std::fmt::Debug for RelevanceScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceScorer")
            .field("backend", &self.backend.mode())
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

impl RelevanceScorer {
    pub fn new(backend: Arc<dyn EntailmentBackend>, failure_policy: FailurePolicy) -> Self {
        Self {
            backend,
            failure_policy,
        }
    }

    pub fn backend(&self) -> &Arc<dyn EntailmentBackend> {
        &self.backend
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Relevance of `sentence` to one criterion, in `[0, 1]`.
    pub fn score(&self, sentence: &str, profile: &CriterionProfile) -> Result<f32, ScoringError> {
        let pairs: Vec<(&str, &str)> = profile
            .hypotheses()
            .iter()
            .map(|hypothesis| (sentence, hypothesis.as_str()))
            .collect();

        if pairs.is_empty() {
            return Ok(0.0);
        }

        let entailments = self.entail_pairs(&pairs)?;
        Ok(max_relevance(&entailments))
    }

    /// Relevance of `sentence` to every criterion in the catalog.
    pub fn score_sentence(
        &self,
        sentence: &str,
        catalog: &CriterionCatalog,
    ) -> Result<CriterionMap<f32>, ScoringError> {
        self.score_batch(&[sentence], catalog)?
            .pop()
            .ok_or(ScoringError::ResultCountMismatch {
                expected: 1,
                returned: 0,
            })
    }

    /// Scores a group of sentences with a single backend call.
    ///
    /// Returns one map per input sentence, in input order. The result is the same as scoring
    /// each (sentence, criterion) pair on its own.
    pub fn score_batch(
        &self,
        sentences: &[&str],
        catalog: &CriterionCatalog,
    ) -> Result<Vec<CriterionMap<f32>>, ScoringError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let per_sentence = catalog.hypothesis_count();
        let mut pairs = Vec::with_capacity(sentences.len() * per_sentence);
        for sentence in sentences {
            for profile in catalog.profiles() {
                for hypothesis in profile.hypotheses() {
                    pairs.push((*sentence, hypothesis.as_str()));
                }
            }
        }

        debug!(
            sentences = sentences.len(),
            pairs = pairs.len(),
            "Scoring sentence batch"
        );

        let entailments = self.entail_pairs(&pairs)?;

        let mut offset = 0;
        let mut scored = Vec::with_capacity(sentences.len());
        for _ in sentences {
            let mut scores = CriterionMap::default();
            for profile in catalog.profiles() {
                let count = profile.hypotheses().len();
                scores[profile.criterion()] = max_relevance(&entailments[offset..offset + count]);
                offset += count;
            }
            scored.push(scores);
        }

        Ok(scored)
    }

    fn entail_pairs(&self, pairs: &[(&str, &str)]) -> Result<Vec<f32>, ScoringError> {
        match self.backend.entail_batch(pairs) {
            Ok(distributions) => {
                if distributions.len() != pairs.len() {
                    return Err(ScoringError::ResultCountMismatch {
                        expected: pairs.len(),
                        returned: distributions.len(),
                    });
                }
                Ok(distributions.iter().map(|d| d.entailment).collect())
            }
            Err(err) => match self.failure_policy {
                FailurePolicy::FailRequest => Err(err.into()),
                FailurePolicy::SkipPair => {
                    warn!(
                        error = %err,
                        pairs = pairs.len(),
                        "Entailment batch failed, retrying pairs individually"
                    );
                    Ok(pairs
                        .iter()
                        .map(|(premise, hypothesis)| {
                            match self.backend.entail(premise, hypothesis) {
                                Ok(distribution) => distribution.entailment,
                                Err(err) => {
                                    warn!(
                                        error = %err,
                                        premise_len = premise.len(),
                                        hypothesis = %hypothesis,
                                        "Skipping failed entailment pair"
                                    );
                                    0.0
                                }
                            }
                        })
                        .collect())
                }
            },
        }
    }
}
