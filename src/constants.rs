//! Cross-cutting, shared constants.
//!
//! Policy knobs (thresholds, counts) live here only as defaults. Runtime values are carried by
//! [`AssessmentPolicy`](crate::assessment::AssessmentPolicy) and
//! [`RatingPolicy`](crate::rating::RatingPolicy) so they can be overridden from the environment.

/// Number of evidentiary criteria assessed for every document.
pub const CRITERION_COUNT: usize = 8;

/// Sentences shorter than this (in characters, after trimming) are treated as noise.
pub const DEFAULT_MIN_SENTENCE_CHARS: usize = 10;

/// Minimum entailment score for a sentence to be collected as evidence.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.3;

/// Evidence sentences reported per criterion.
pub const DEFAULT_TOP_EVIDENCE: usize = 2;

/// Sentences whose (sentence, hypothesis) pairs are sent to the backend in one batch.
pub const DEFAULT_SENTENCE_BATCH: usize = 4;

/// Score at which a criterion counts as strong for rating purposes.
pub const DEFAULT_STRONG_SCORE: f32 = 0.5;

/// Strong criteria required for a `High` rating.
pub const DEFAULT_HIGH_MIN_STRONG: usize = 3;

/// Top-score average that must be exceeded for a `High` rating.
pub const DEFAULT_HIGH_MIN_AVG: f32 = 0.7;

/// Strong criteria required for a `Medium` rating.
pub const DEFAULT_MEDIUM_MIN_STRONG: usize = 2;

/// Top-score average that must be exceeded for a `Medium` rating.
pub const DEFAULT_MEDIUM_MIN_AVG: f32 = 0.5;

/// How many of the highest scores are averaged by the rating evaluator.
pub const DEFAULT_RATING_TOP_K: usize = 3;

/// Maximum tokens per (premise, hypothesis) pair fed to the NLI model.
pub const DEFAULT_NLI_MAX_SEQ_LEN: usize = 512;

/// Pairs per NLI forward pass.
pub const DEFAULT_NLI_BATCH_SIZE: usize = 32;
