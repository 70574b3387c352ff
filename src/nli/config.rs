use std::path::PathBuf;

use super::device::DevicePreference;

use crate::constants::{DEFAULT_NLI_BATCH_SIZE, DEFAULT_NLI_MAX_SEQ_LEN};

#[derive(Debug, Clone, PartialEq)]
/// Configuration for [`NliModel`](super::NliModel).
pub struct NliConfig {
    /// Directory containing `config.json`, `model.safetensors`, and `tokenizer.json`.
    /// `None` runs the deterministic stub.
    pub model_path: Option<PathBuf>,

    /// Maximum tokens per (premise, hypothesis) pair.
    pub max_seq_len: usize,

    /// Pairs per forward pass.
    pub batch_size: usize,

    /// Compute device for the classifier. Ignored by the stub.
    pub device: DevicePreference,
}

impl Default for NliConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: DEFAULT_NLI_MAX_SEQ_LEN,
            batch_size: DEFAULT_NLI_BATCH_SIZE,
            device: DevicePreference::Auto,
        }
    }
}

impl NliConfig {
    pub const ENV_MODEL_PATH: &'static str = "ASSESSOR_NLI_MODEL_PATH";
    pub const ENV_BATCH_SIZE: &'static str = "ASSESSOR_NLI_BATCH_SIZE";
    pub const ENV_DEVICE: &'static str = "ASSESSOR_NLI_DEVICE";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be at least 1");
        self.batch_size = batch_size;
        self
    }

    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.max_seq_len == 0 {
            return Err("max_seq_len must be at least 1".to_string());
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }
}
