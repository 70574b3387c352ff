//! Semantic relevance scoring and lexical corroboration.
//!
//! [`RelevanceScorer`] asks the entailment backend whether a sentence implies each of a
//! criterion's hypotheses and keeps the **maximum** entailment probability: one strongly
//! matching phrasing is enough. [`keyword`] is the lexical filter the evidence aggregator uses
//! to decide whether a semantic match is corroborated.

pub mod error;
pub mod keyword;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::{RelevanceScorer, max_relevance};
pub use types::FailurePolicy;
