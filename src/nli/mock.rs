//! Scripted entailment backend for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{BackendMode, EntailmentBackend, EntailmentDistribution, NliError};

#[derive(Debug, Clone)]
struct MockRule {
    premise: String,
    hypothesis: Option<String>,
    entailment: f32,
}

/// Entailment backend driven by substring rules.
///
/// The first rule whose premise (and, if set, hypothesis) substring matches wins; otherwise the
/// default entailment applies. Matching is case-insensitive.
#[derive(Debug, Default)]
pub struct MockEntailment {
    rules: Vec<MockRule>,
    default_entailment: f32,
    failing_premises: Vec<String>,
    reject_batches: bool,
    calls: AtomicUsize,
    batch_calls: AtomicUsize,
    issued: Mutex<Vec<(String, String)>>,
}

impl MockEntailment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, entailment: f32) -> Self {
        self.default_entailment = entailment;
        self
    }

    /// Any hypothesis scores `entailment` for premises containing `premise`.
    pub fn rule(mut self, premise: &str, entailment: f32) -> Self {
        self.rules.push(MockRule {
            premise: premise.to_lowercase(),
            hypothesis: None,
            entailment,
        });
        self
    }

    /// Hypotheses containing `hypothesis` score `entailment` for premises containing `premise`.
    pub fn rule_for(mut self, premise: &str, hypothesis: &str, entailment: f32) -> Self {
        self.rules.push(MockRule {
            premise: premise.to_lowercase(),
            hypothesis: Some(hypothesis.to_lowercase()),
            entailment,
        });
        self
    }

    /// Every query whose premise contains `premise` fails.
    pub fn fail_on(mut self, premise: &str) -> Self {
        self.failing_premises.push(premise.to_lowercase());
        self
    }

    /// Batched calls with more than one pair fail, single-pair calls still succeed.
    pub fn reject_batches(mut self) -> Self {
        self.reject_batches = true;
        self
    }

    /// Single-pair queries answered (including those made inside batches).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Every (premise, hypothesis) pair seen, in call order.
    pub fn issued(&self) -> Vec<(String, String)> {
        self.issued.lock().clone()
    }

    fn entailment_for(&self, premise: &str, hypothesis: &str) -> f32 {
        let premise = premise.to_lowercase();
        let hypothesis = hypothesis.to_lowercase();

        self.rules
            .iter()
            .find(|rule| {
                premise.contains(&rule.premise)
                    && rule
                        .hypothesis
                        .as_ref()
                        .is_none_or(|h| hypothesis.contains(h))
            })
            .map_or(self.default_entailment, |rule| rule.entailment)
    }
}

impl EntailmentBackend for MockEntailment {
    fn entail(&self, premise: &str, hypothesis: &str) -> Result<EntailmentDistribution, NliError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.issued
            .lock()
            .push((premise.to_string(), hypothesis.to_string()));

        let lower = premise.to_lowercase();
        if self.failing_premises.iter().any(|p| lower.contains(p)) {
            return Err(NliError::InferenceFailed {
                reason: format!("mock failure for premise: {premise}"),
            });
        }

        Ok(EntailmentDistribution::from_entailment(
            self.entailment_for(premise, hypothesis),
        ))
    }

    fn entail_batch(
        &self,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<EntailmentDistribution>, NliError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);

        if self.reject_batches && pairs.len() > 1 {
            return Err(NliError::InferenceFailed {
                reason: "mock batch rejected".to_string(),
            });
        }

        pairs
            .iter()
            .map(|(premise, hypothesis)| self.entail(premise, hypothesis))
            .collect()
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Mock
    }
}
