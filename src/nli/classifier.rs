use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::{bert, distilbert};
use serde::Deserialize;

use super::EntailmentDistribution;

/// Label count of an MNLI head.
pub const NLI_LABELS: usize = 3;

#[derive(Debug, Default, Deserialize)]
struct HeadConfig {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    id2label: HashMap<String, String>,
    // DistilBERT's hidden width; `distilbert::Config` keeps it private.
    #[serde(default)]
    dim: Option<usize>,
}

/// Output positions of the three NLI classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelIndices {
    pub contradiction: usize,
    pub neutral: usize,
    pub entailment: usize,
}

impl Default for LabelIndices {
    fn default() -> Self {
        Self {
            contradiction: 0,
            neutral: 1,
            entailment: 2,
        }
    }
}

impl LabelIndices {
    /// Resolves indices from a Hugging Face `id2label` table.
    ///
    /// Returns the default order when the table is empty or does not name all three classes.
    pub fn from_id2label(id2label: &HashMap<String, String>) -> Self {
        let find = |prefix: &str| {
            id2label.iter().find_map(|(id, label)| {
                label
                    .to_ascii_lowercase()
                    .starts_with(prefix)
                    .then(|| id.parse::<usize>().ok())
                    .flatten()
            })
        };

        match (find("contradict"), find("neutral"), find("entail")) {
            (Some(contradiction), Some(neutral), Some(entailment))
                if contradiction.max(neutral).max(entailment) < NLI_LABELS =>
            {
                Self {
                    contradiction,
                    neutral,
                    entailment,
                }
            }
            _ => Self::default(),
        }
    }

    pub fn distribution(&self, probabilities: &[f32]) -> EntailmentDistribution {
        let at = |i: usize| probabilities.get(i).copied().unwrap_or(0.0);
        EntailmentDistribution {
            contradiction: at(self.contradiction),
            neutral: at(self.neutral),
            entailment: at(self.entailment),
        }
    }
}

/// Encoder family of a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Bert,
    DistilBert,
}

impl Architecture {
    /// Picks the encoder from `model_type`, falling back to the weight names.
    ///
    /// RoBERTa-family checkpoints are refused: they number positions from `padding_idx + 1`,
    /// which the BERT encoder would silently get wrong.
    fn detect(model_type: Option<&str>, vb: &VarBuilder) -> Result<Self> {
        refuse_roberta_family(model_type)?;
        if model_type.is_some_and(|t| t.eq_ignore_ascii_case("distilbert")) {
            return Ok(Architecture::DistilBert);
        }

        if vb.contains_tensor("distilbert.embeddings.word_embeddings.weight") {
            Ok(Architecture::DistilBert)
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            Err(unsupported("roberta"))
        } else {
            Ok(Architecture::Bert)
        }
    }
}

fn refuse_roberta_family(model_type: Option<&str>) -> Result<()> {
    match model_type.map(str::to_ascii_lowercase) {
        Some(lower) if lower.contains("roberta") || lower == "camembert" => Err(unsupported(&lower)),
        _ => Ok(()),
    }
}

fn unsupported(model_type: &str) -> candle::Error {
    candle::Error::Msg(format!(
        "RoBERTa-family checkpoints ({model_type}) are not supported; use a BERT or DistilBERT MNLI model"
    ))
}

enum Encoder {
    // Optional pooler (dense + tanh) over [CLS], then a linear classifier.
    Bert {
        model: bert::BertModel,
        pooler: Option<Linear>,
        classifier: Linear,
    },
    // [CLS] -> pre_classifier -> ReLU -> classifier.
    DistilBert {
        model: distilbert::DistilBertModel,
        pre_classifier: Linear,
        classifier: Linear,
    },
}

impl Encoder {
    fn load_bert(vb: VarBuilder, config_json: &str) -> Result<Self> {
        let config: bert::Config = serde_json::from_str(config_json)
            .map_err(|e| candle::Error::Msg(format!("invalid BERT config: {e}")))?;
        let hidden = config.hidden_size;

        let (model, pooler_path) = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            (bert::BertModel::load(vb.pp("bert"), &config)?, "bert.pooler.dense")
        } else {
            (bert::BertModel::load(vb.clone(), &config)?, "pooler.dense")
        };

        let pooler = if vb.contains_tensor(&format!("{pooler_path}.weight")) {
            Some(candle_nn::linear(hidden, hidden, vb.pp(pooler_path))?)
        } else {
            None
        };

        Ok(Encoder::Bert {
            model,
            pooler,
            classifier: candle_nn::linear(hidden, NLI_LABELS, vb.pp("classifier"))?,
        })
    }

    fn load_distilbert(vb: VarBuilder, config_json: &str, dim: Option<usize>) -> Result<Self> {
        let config: distilbert::Config = serde_json::from_str(config_json)
            .map_err(|e| candle::Error::Msg(format!("invalid DistilBERT config: {e}")))?;
        let dim = dim.ok_or_else(|| candle::Error::Msg("DistilBERT config has no `dim`".into()))?;

        let model = if vb.contains_tensor("distilbert.embeddings.word_embeddings.weight") {
            distilbert::DistilBertModel::load(vb.pp("distilbert"), &config)?
        } else {
            distilbert::DistilBertModel::load(vb.clone(), &config)?
        };

        Ok(Encoder::DistilBert {
            model,
            pre_classifier: candle_nn::linear(dim, dim, vb.pp("pre_classifier"))?,
            classifier: candle_nn::linear(dim, NLI_LABELS, vb.pp("classifier"))?,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        match self {
            Encoder::Bert {
                model,
                pooler,
                classifier,
            } => {
                let hidden = model.forward(input_ids, token_type_ids, attention_mask)?;
                let cls = hidden.i((.., 0, ..))?;
                let pooled = match pooler {
                    Some(pooler) => pooler.forward(&cls)?.tanh()?,
                    None => cls,
                };
                classifier.forward(&pooled)
            }
            Encoder::DistilBert {
                model,
                pre_classifier,
                classifier,
            } => {
                // DistilBERT masks positions where the mask is 1, the inverse of the tokenizer's.
                let (batch, seq_len) = input_ids.dims2()?;
                let padding = match attention_mask {
                    Some(mask) => mask.eq(0u32)?,
                    None => Tensor::zeros((batch, seq_len), DType::U8, input_ids.device())?,
                };
                let padding = padding.reshape((batch, 1, 1, seq_len))?;

                let hidden = model.forward(input_ids, &padding)?;
                let cls = hidden.i((.., 0, ..))?;
                classifier.forward(&pre_classifier.forward(&cls)?.relu()?)
            }
        }
    }
}

/// BERT-family sequence classifier with a three-way NLI head.
#[derive(Clone)]
pub struct NliClassifier {
    encoder: Arc<Encoder>,
    architecture: Architecture,
    labels: LabelIndices,
}

impl NliClassifier {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_json = std::fs::read_to_string(model_dir.join("config.json"))?;
        let head: HeadConfig = serde_json::from_str(&config_json)
            .map_err(|e| candle::Error::Msg(format!("invalid model config: {e}")))?;

        // Checked before the weights are mapped.
        refuse_roberta_family(head.model_type.as_deref())?;

        let weights = model_dir.join("model.safetensors");
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, device)? };

        let architecture = Architecture::detect(head.model_type.as_deref(), &vb)?;
        let encoder = match architecture {
            Architecture::Bert => Encoder::load_bert(vb, &config_json)?,
            Architecture::DistilBert => Encoder::load_distilbert(vb, &config_json, head.dim)?,
        };

        Ok(Self {
            encoder: Arc::new(encoder),
            architecture,
            labels: LabelIndices::from_id2label(&head.id2label),
        })
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn labels(&self) -> LabelIndices {
        self.labels
    }

    /// Returns logits of shape `(batch, 3)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.encoder
            .forward(input_ids, token_type_ids, attention_mask)
    }
}
