//! The assessment pipeline.
//!
//! [`Assessor::assess`] turns plain CV text into an [`Assessment`]: sentence segmentation,
//! batched relevance scoring against the criterion catalog, keyword corroboration, evidence
//! aggregation and the final rating.

pub mod assessor;
pub mod error;
pub mod policy;
pub mod types;

#[cfg(test)]
mod tests;

pub use assessor::Assessor;
pub use error::AssessmentError;
pub use policy::AssessmentPolicy;
pub use types::Assessment;
