//! Natural-language-inference capability.
//!
//! The scoring pipeline depends only on [`EntailmentBackend`]. [`NliModel`] is the process-wide
//! model handle: construct it once with [`NliModel::load`], share it behind an `Arc`, and drop
//! the last reference to release the weights.
//!
//! - With a model directory, a BERT-family MNLI classifier runs on candle.
//! - Without one, the handle runs a deterministic lexical stub (tests, demos, local dev).
//! - [`MockEntailment`] (tests / `mock` feature) answers from scripted rules.

/// BERT classifier with a three-way NLI head.
pub mod classifier;
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod stub;
/// Pair tokenizer loading.
pub mod tokenizer;


pub use classifier::{Architecture, LabelIndices, NliClassifier};
pub use config::NliConfig;
pub use device::DevicePreference;
pub use error::NliError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEntailment;

use candle_core::{D, Device, Tensor};
use serde::Serialize;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use device::select_device;
use tokenizer::load_pair_tokenizer;

/// Probabilities over the three NLI classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntailmentDistribution {
    pub contradiction: f32,
    pub neutral: f32,
    pub entailment: f32,
}

impl EntailmentDistribution {
    pub fn neutral() -> Self {
        Self {
            contradiction: 0.0,
            neutral: 1.0,
            entailment: 0.0,
        }
    }

    /// Puts `entailment` on the entailment class and the remainder on neutral.
    pub fn from_entailment(entailment: f32) -> Self {
        Self {
            contradiction: 0.0,
            neutral: (1.0 - entailment).clamp(0.0, 1.0),
            entailment,
        }
    }
}

/// What is answering entailment queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Model,
    Stub,
    Mock,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Model => "model",
            BackendMode::Stub => "stub",
            BackendMode::Mock => "mock",
        }
    }
}

/// The semantic capability: `(premise, hypothesis) -> {contradiction, neutral, entailment}`.
pub trait EntailmentBackend: Send + Sync {
    fn entail(&self, premise: &str, hypothesis: &str) -> Result<EntailmentDistribution, NliError>;

    /// Answers many pairs at once, in order. Implementations that can batch should override.
    fn entail_batch(
        &self,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<EntailmentDistribution>, NliError> {
        pairs
            .iter()
            .map(|(premise, hypothesis)| self.entail(premise, hypothesis))
            .collect()
    }

    fn mode(&self) -> BackendMode;
}

enum NliBackend {
    Model {
        classifier: NliClassifier,
        tokenizer: Box<Tokenizer>,
        device: Device,
    },
    Stub,
}

pub struct NliModel {
    backend: NliBackend,
    config: NliConfig,
}

impl std::fmt::Debug for NliModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NliModel")
            .field(
                "backend",
                &match &self.backend {
                    NliBackend::Model { device, .. } => format!("Model({:?})", device),
                    NliBackend::Stub => "Stub".to_string(),
                },
            )
            .field("config", &self.config)
            .finish()
    }
}

impl NliModel {
    pub fn load(config: NliConfig) -> Result<Self, NliError> {
        if let Err(msg) = config.validate() {
            return Err(NliError::InvalidConfig { reason: msg });
        }

        let Some(model_path) = config.model_path.clone() else {
            info!("No NLI model path configured, operating in stub mode");
            return Ok(Self {
                backend: NliBackend::Stub,
                config,
            });
        };

        if !model_path.exists() {
            return Err(NliError::ModelNotFound { path: model_path });
        }

        for file in ["config.json", "model.safetensors", tokenizer::TOKENIZER_FILE] {
            if !model_path.join(file).is_file() {
                return Err(NliError::MissingModelFile {
                    dir: model_path,
                    file,
                });
            }
        }

        let device = select_device(config.device)?;

        info!(
            model_path = %model_path.display(),
            batch_size = config.batch_size,
            max_seq_len = config.max_seq_len,
            "Loading NLI model"
        );

        let classifier =
            NliClassifier::load(&model_path, &device).map_err(|e| NliError::ModelLoadFailed {
                reason: format!("Failed to load classifier: {}", e),
            })?;

        let tokenizer = load_pair_tokenizer(&model_path, config.max_seq_len)?;

        info!(
            architecture = ?classifier.architecture(),
            labels = ?classifier.labels(),
            "NLI model loaded successfully"
        );

        Ok(Self {
            backend: NliBackend::Model {
                classifier,
                tokenizer: Box::new(tokenizer),
                device,
            },
            config,
        })
    }

    pub fn stub() -> Result<Self, NliError> {
        Self::load(NliConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.backend, NliBackend::Model { .. })
    }

    pub fn config(&self) -> &NliConfig {
        &self.config
    }

    fn forward_batch(
        classifier: &NliClassifier,
        tokenizer: &Tokenizer,
        device: &Device,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<EntailmentDistribution>, NliError> {
        let encodings = tokenizer
            .encode_batch(pairs.to_vec(), true)
            .map_err(|e| NliError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let batch = encodings.len();
        let seq_len = encodings.first().map_or(0, |e| e.get_ids().len());

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut type_ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        for encoding in &encodings {
            if encoding.get_ids().len() != seq_len {
                return Err(NliError::TokenizationFailed {
                    reason: "encodings in a batch have different lengths".to_string(),
                });
            }
            ids.extend_from_slice(encoding.get_ids());
            type_ids.extend_from_slice(encoding.get_type_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
        }

        let ids = Tensor::from_vec(ids, (batch, seq_len), device)?;
        let type_ids = Tensor::from_vec(type_ids, (batch, seq_len), device)?;
        let mask = Tensor::from_vec(mask, (batch, seq_len), device)?;

        let logits = classifier
            .forward(&ids, &type_ids, Some(&mask))
            .map_err(|e| NliError::InferenceFailed {
                reason: e.to_string(),
            })?;

        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?.to_vec2::<f32>()?;
        let labels = classifier.labels();

        Ok(probabilities
            .iter()
            .map(|row| labels.distribution(row))
            .collect())
    }
}

impl EntailmentBackend for NliModel {
    fn entail(&self, premise: &str, hypothesis: &str) -> Result<EntailmentDistribution, NliError> {
        let mut scored = self.entail_batch(&[(premise, hypothesis)])?;
        scored.pop().ok_or_else(|| NliError::InferenceFailed {
            reason: "model returned no output for pair".to_string(),
        })
    }

    fn entail_batch(
        &self,
        pairs: &[(&str, &str)],
    ) -> Result<Vec<EntailmentDistribution>, NliError> {
        debug!(
            pairs = pairs.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring entailment batch"
        );

        match &self.backend {
            NliBackend::Model {
                classifier,
                tokenizer,
                device,
            } => {
                let mut scored = Vec::with_capacity(pairs.len());
                for chunk in pairs.chunks(self.config.batch_size) {
                    scored.extend(Self::forward_batch(classifier, tokenizer, device, chunk)?);
                }
                Ok(scored)
            }
            NliBackend::Stub => Ok(pairs
                .iter()
                .map(|(premise, hypothesis)| stub::heuristic_distribution(premise, hypothesis))
                .collect()),
        }
    }

    fn mode(&self) -> BackendMode {
        match self.backend {
            NliBackend::Model { .. } => BackendMode::Model,
            NliBackend::Stub => BackendMode::Stub,
        }
    }
}

impl Drop for NliModel {
    fn drop(&mut self) {
        if self.is_model_loaded() {
            info!("Releasing NLI model");
        }
    }
}
