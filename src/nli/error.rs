use std::path::PathBuf;
use thiserror::Error;

/// Failures of the entailment capability, at load time or per query.
#[derive(Debug, Error)]
pub enum NliError {
    #[error("NLI model directory {path} does not exist")]
    ModelNotFound { path: PathBuf },

    #[error("NLI model directory {dir} has no {file}")]
    MissingModelFile { dir: PathBuf, file: &'static str },

    #[error("could not load NLI model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("cannot run NLI on {device}: {reason}")]
    DeviceUnavailable { device: &'static str, reason: String },

    #[error("NLI inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize sentence/hypothesis pair: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid NLI configuration: {reason}")]
    InvalidConfig { reason: String },
}

// Tensor ops only fail once the model is loaded, so candle errors surface as inference failures.
impl From<candle_core::Error> for NliError {
    fn from(err: candle_core::Error) -> Self {
        NliError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
