use std::path::PathBuf;
use thiserror::Error;

use super::criterion::Criterion;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog must contain exactly {expected} criteria, found {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("criterion {criterion} is configured more than once")]
    DuplicateCriterion { criterion: Criterion },

    #[error("criterion {criterion} has no hypotheses")]
    NoHypotheses { criterion: Criterion },

    #[error("criterion {criterion} has no keywords")]
    NoKeywords { criterion: Criterion },

    #[error("criterion {criterion} has a blank hypothesis at position {position}")]
    BlankHypothesis { criterion: Criterion, position: usize },

    #[error("criterion {criterion} has a blank keyword at position {position}")]
    BlankKeyword { criterion: Criterion, position: usize },

    #[error("unknown criterion label: {label}")]
    UnknownCriterion { label: String },

    #[error("failed to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
