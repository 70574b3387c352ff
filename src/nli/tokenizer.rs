use std::path::Path;

use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams, TruncationStrategy};

use super::error::NliError;

/// File name expected next to the classifier weights.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Loads the model directory's tokenizer, set up for (premise, hypothesis) pairs.
///
/// Pairs longer than `max_len` tokens are cut from the longer side first so a long sentence
/// cannot crowd out the hypothesis. Every batch is padded to its longest pair.
pub fn load_pair_tokenizer(model_dir: &Path, max_len: usize) -> Result<Tokenizer, NliError> {
    let path = model_dir.join(TOKENIZER_FILE);
    let mut tokenizer = Tokenizer::from_file(&path).map_err(|e| NliError::ModelLoadFailed {
        reason: format!("cannot read {}: {e}", path.display()),
    })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            strategy: TruncationStrategy::LongestFirst,
            ..Default::default()
        }))
        .map_err(|e| NliError::InvalidConfig {
            reason: format!("max_seq_len {max_len} rejected by tokenizer: {e}"),
        })?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..Default::default()
    }));

    Ok(tokenizer)
}
