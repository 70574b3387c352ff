use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::CriterionCatalog;
use crate::evidence::{AggregatedEvidence, EvidenceAggregator};
use crate::nli::{BackendMode, EntailmentBackend};
use crate::scoring::{RelevanceScorer, keyword};
use crate::segment::SentenceSegmenter;

use super::error::AssessmentError;
use super::policy::AssessmentPolicy;
use super::types::Assessment;

/// Runs the full pipeline on one document: segment, score, aggregate, rate.
///
/// Holds only shared, immutable state. Every [`assess`](Self::assess) call builds its own
/// aggregator, so one `Assessor` can serve concurrent requests.
#[derive(Debug)]
pub struct Assessor {
    catalog: Arc<CriterionCatalog>,
    scorer: RelevanceScorer,
    segmenter: SentenceSegmenter,
    policy: AssessmentPolicy,
}

impl Assessor {
    pub fn new(
        catalog: Arc<CriterionCatalog>,
        backend: Arc<dyn EntailmentBackend>,
        policy: AssessmentPolicy,
    ) -> Result<Self, AssessmentError> {
        policy
            .validate()
            .map_err(|reason| AssessmentError::InvalidPolicy { reason })?;

        Ok(Self {
            catalog,
            scorer: RelevanceScorer::new(backend, policy.failure_policy),
            segmenter: SentenceSegmenter::new(policy.min_sentence_chars),
            policy,
        })
    }

    pub fn catalog(&self) -> &CriterionCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &AssessmentPolicy {
        &self.policy
    }

    pub fn backend_mode(&self) -> BackendMode {
        self.scorer.backend().mode()
    }

    pub fn assess(&self, text: &str) -> Result<Assessment, AssessmentError> {
        let sentences = self.segmenter.sentences(text);
        let batch_size = self.policy.sentence_batch_size;
        let mut aggregator = EvidenceAggregator::new(self.policy.evidence);

        for (batch_index, batch) in sentences.chunks(batch_size).enumerate() {
            let scored = self.scorer.score_batch(batch, &self.catalog)?;

            for (offset, (sentence, scores)) in batch.iter().zip(&scored).enumerate() {
                let corroborated = keyword::corroboration(sentence, &self.catalog);
                aggregator.observe_sentence(
                    batch_index * batch_size + offset,
                    sentence,
                    scores,
                    &corroborated,
                );
            }
        }

        let AggregatedEvidence { scores, evidence } = aggregator.finalize();
        let breakdown = self.policy.rating.summarize(&scores);
        let rating = self.policy.rating.rate(&breakdown);

        debug!(
            strong_count = breakdown.strong_count,
            avg_top = breakdown.avg_top,
            "Rating breakdown"
        );
        info!(
            sentences = sentences.len(),
            rating = %rating,
            backend = self.backend_mode().as_str(),
            "Assessment completed"
        );

        Ok(Assessment {
            criteria_scores: scores,
            criteria_evidence: evidence,
            qualification_rating: rating,
        })
    }
}
