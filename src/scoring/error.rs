use thiserror::Error;

use crate::nli::NliError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("entailment backend error: {0}")]
    Nli(#[from] NliError),

    #[error("entailment backend returned {returned} results for {expected} pairs")]
    ResultCountMismatch { expected: usize, returned: usize },
}
