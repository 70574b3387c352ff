//! Per-request evidence aggregation.
//!
//! [`EvidenceAggregator`] consumes `(sentence index, criterion, score, corroborated)`
//! observations once and keeps, per criterion, the running maximum score and the list of
//! corroborated sentences that cleared the relevance threshold. [`EvidenceAggregator::finalize`]
//! applies the zeroing rule: a criterion with no corroborated evidence reports `0.0` no matter
//! how high its semantic score was.
//!
//! Evidence is keyed by the original sentence index, so the result does not depend on the order
//! in which observations arrive.

mod aggregator;


pub use aggregator::{AggregatedEvidence, EvidenceAggregator, EvidencePolicy, ScoredSentence};
