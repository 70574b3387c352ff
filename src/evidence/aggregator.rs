use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Criterion, CriterionMap};
use crate::constants::{DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_TOP_EVIDENCE};

/// Threshold and truncation knobs for evidence collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidencePolicy {
    /// Minimum score (inclusive) for a corroborated sentence to count as evidence.
    pub relevance_threshold: f32,
    /// Evidence sentences kept per criterion.
    pub top_n: usize,
}

impl Default for EvidencePolicy {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            top_n: DEFAULT_TOP_EVIDENCE,
        }
    }
}

/// A collected evidence sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    /// Position in the segmented document.
    pub index: usize,
    pub text: String,
    pub score: f32,
}

impl ScoredSentence {
    /// Score descending, then index ascending.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.index.cmp(&other.index))
    }
}

#[derive(Debug, Default)]
struct CriterionState {
    running_max: f32,
    evidence: Vec<ScoredSentence>,
}

/// Final per-criterion scores and evidence text.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedEvidence {
    pub scores: CriterionMap<f32>,
    pub evidence: CriterionMap<Vec<String>>,
}

#[derive(Debug)]
pub struct EvidenceAggregator {
    policy: EvidencePolicy,
    state: CriterionMap<CriterionState>,
    observed: usize,
}

impl EvidenceAggregator {
    pub fn new(policy: EvidencePolicy) -> Self {
        Self {
            policy,
            state: CriterionMap::default(),
            observed: 0,
        }
    }

    pub fn policy(&self) -> &EvidencePolicy {
        &self.policy
    }

    /// Records one (sentence, criterion) score.
    ///
    /// The running maximum is updated unconditionally. The sentence is kept as evidence only if
    /// it is `corroborated` and its score reaches the relevance threshold.
    pub fn observe(
        &mut self,
        index: usize,
        sentence: &str,
        criterion: Criterion,
        score: f32,
        corroborated: bool,
    ) {
        self.observed += 1;
        let state = &mut self.state[criterion];

        if score > state.running_max {
            state.running_max = score;
        }

        if corroborated && score >= self.policy.relevance_threshold {
            state.evidence.push(ScoredSentence {
                index,
                text: sentence.to_string(),
                score,
            });
        }
    }

    /// Records every criterion score for one sentence.
    pub fn observe_sentence(
        &mut self,
        index: usize,
        sentence: &str,
        scores: &CriterionMap<f32>,
        corroborated: &CriterionMap<bool>,
    ) {
        for (criterion, score) in scores.iter() {
            self.observe(index, sentence, criterion, *score, corroborated[criterion]);
        }
    }

    /// Best score seen so far for `criterion`, before zeroing.
    pub fn running_max(&self, criterion: Criterion) -> f32 {
        self.state[criterion].running_max
    }

    /// Corroborated sentences collected so far for `criterion`, in arrival order.
    pub fn collected(&self, criterion: Criterion) -> &[ScoredSentence] {
        &self.state[criterion].evidence
    }

    pub fn finalize(self) -> AggregatedEvidence {
        let top_n = self.policy.top_n;
        let observed = self.observed;

        let finalized = self.state.map(|criterion, mut state| {
            if state.evidence.is_empty() {
                if state.running_max > 0.0 {
                    debug!(
                        criterion = %criterion,
                        running_max = state.running_max,
                        "No corroborated evidence, zeroing score"
                    );
                }
                return (0.0, Vec::new());
            }

            state.evidence.sort_by(ScoredSentence::rank);
            state.evidence.truncate(top_n);
            let texts = state.evidence.into_iter().map(|s| s.text).collect();
            (state.running_max, texts)
        });

        debug!(observed, "Evidence aggregation finalized");

        let mut scores = CriterionMap::default();
        let mut evidence = CriterionMap::default();
        for (criterion, (score, texts)) in finalized {
            scores[criterion] = score;
            evidence[criterion] = texts;
        }

        AggregatedEvidence { scores, evidence }
    }
}
