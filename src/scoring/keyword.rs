//! Lexical corroboration: does a sentence mention any of a criterion's keywords?

use crate::catalog::{CriterionCatalog, CriterionMap, CriterionProfile};

/// Case-insensitive substring check against lowercase `keywords`.
pub fn matches(sentence: &str, keywords: &[String]) -> bool {
    let lower = sentence.to_lowercase();
    contains_any(&lower, keywords)
}

pub fn corroborates(sentence: &str, profile: &CriterionProfile) -> bool {
    matches(sentence, profile.keywords())
}

/// Keyword filter results for every criterion, lowercasing the sentence once.
pub fn corroboration(sentence: &str, catalog: &CriterionCatalog) -> CriterionMap<bool> {
    let lower = sentence.to_lowercase();
    CriterionMap::from_fn(|criterion| contains_any(&lower, catalog.profile(criterion).keywords()))
}

fn contains_any(lower: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
}
