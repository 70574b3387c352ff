//! CV evidence assessor library (used by the server and integration tests).
//!
//! Scores a curriculum vitae against the eight O-1A evidentiary criteria and produces, per
//! criterion, a confidence score and up to two supporting sentences, plus an overall
//! High / Medium / Low qualification rating.
//!
//! # Pipeline
//!
//! text → [`SentenceSegmenter`] → [`RelevanceScorer`] + [`keyword`] filter →
//! [`EvidenceAggregator`] → [`RatingPolicy`] → [`Assessment`]
//!
//! [`Assessor`] wires the stages together. The semantic step depends only on the
//! [`EntailmentBackend`] trait; [`NliModel`] is the process-wide implementation (candle BERT
//! classifier, or a deterministic stub when no model is configured).
//!
//! ## Test/Mock Support
//! [`MockEntailment`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod assessment;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod evidence;
pub mod ingest;
pub mod nli;
pub mod rating;
pub mod scoring;
pub mod segment;

pub use assessment::{Assessment, AssessmentError, AssessmentPolicy, Assessor};
pub use catalog::{CatalogError, Criterion, CriterionCatalog, CriterionMap, CriterionProfile};
pub use config::{Config, ConfigError};
pub use evidence::{AggregatedEvidence, EvidenceAggregator, EvidencePolicy};
pub use ingest::{DocumentKind, IngestError, extract_text};
#[cfg(any(test, feature = "mock"))]
pub use nli::MockEntailment;
pub use nli::{
    BackendMode, EntailmentBackend, EntailmentDistribution, NliConfig, NliError, NliModel,
};
pub use rating::{Rating, RatingBreakdown, RatingPolicy};
pub use scoring::{FailurePolicy, RelevanceScorer, ScoringError, keyword};
pub use segment::SentenceSegmenter;
