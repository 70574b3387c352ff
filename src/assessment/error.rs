use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("invalid assessment policy: {reason}")]
    InvalidPolicy { reason: String },
}
