//! Criterion catalog: hypotheses and corroborating keywords per criterion.
//!
//! The catalog is validated once, when it is built, and is immutable afterwards. A catalog
//! always holds exactly one [`CriterionProfile`] per [`Criterion`], each with at least one
//! hypothesis and one keyword. Misconfiguration is rejected up front instead of showing up as a
//! criterion that can never score.
//!
//! Catalog files are JSON:
//!
//! ```json
//! { "criteria": [ { "criterion": "Awards", "hypotheses": ["..."], "keywords": ["award"] } ] }
//! ```

mod builtin;
pub mod criterion;
pub mod error;


pub use criterion::{Criterion, CriterionMap};
pub use error::CatalogError;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::CRITERION_COUNT;

/// Hypotheses and keywords for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionProfile {
    criterion: Criterion,
    hypotheses: Vec<String>,
    keywords: Vec<String>,
}

impl CriterionProfile {
    /// Validates and normalizes a profile.
    ///
    /// Hypotheses are trimmed. Keywords are trimmed, lowercased and deduplicated (first
    /// occurrence wins).
    pub fn new<H, K>(criterion: Criterion, hypotheses: H, keywords: K) -> Result<Self, CatalogError>
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let mut normalized_hypotheses = Vec::new();
        for (position, hypothesis) in hypotheses.into_iter().enumerate() {
            let hypothesis = hypothesis.as_ref().trim();
            if hypothesis.is_empty() {
                return Err(CatalogError::BlankHypothesis {
                    criterion,
                    position,
                });
            }
            normalized_hypotheses.push(hypothesis.to_string());
        }
        if normalized_hypotheses.is_empty() {
            return Err(CatalogError::NoHypotheses { criterion });
        }

        let mut normalized_keywords: Vec<String> = Vec::new();
        for (position, keyword) in keywords.into_iter().enumerate() {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(CatalogError::BlankKeyword {
                    criterion,
                    position,
                });
            }
            if !normalized_keywords.contains(&keyword) {
                normalized_keywords.push(keyword);
            }
        }
        if normalized_keywords.is_empty() {
            return Err(CatalogError::NoKeywords { criterion });
        }

        Ok(Self {
            criterion,
            hypotheses: normalized_hypotheses,
            keywords: normalized_keywords,
        })
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn hypotheses(&self) -> &[String] {
        &self.hypotheses
    }

    /// Lowercase keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    criteria: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    criterion: Criterion,
    #[serde(default)]
    hypotheses: Vec<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Validated, immutable table of [`CriterionProfile`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionCatalog {
    // One profile per criterion, stored at `Criterion::index()`.
    criteria: Vec<CriterionProfile>,
}

impl CriterionCatalog {
    /// Builds a catalog from exactly one profile per criterion (any order).
    pub fn new(profiles: Vec<CriterionProfile>) -> Result<Self, CatalogError> {
        if profiles.len() != CRITERION_COUNT {
            return Err(CatalogError::WrongCount {
                expected: CRITERION_COUNT,
                found: profiles.len(),
            });
        }

        let mut seen = [false; CRITERION_COUNT];
        for profile in &profiles {
            let slot = &mut seen[profile.criterion.index()];
            if *slot {
                return Err(CatalogError::DuplicateCriterion {
                    criterion: profile.criterion,
                });
            }
            *slot = true;
        }

        let mut criteria = profiles;
        criteria.sort_by_key(|p| p.criterion.index());

        debug!(
            hypotheses = criteria.iter().map(|p| p.hypotheses.len()).sum::<usize>(),
            keywords = criteria.iter().map(|p| p.keywords.len()).sum::<usize>(),
            "Criterion catalog validated"
        );

        Ok(Self { criteria })
    }

    /// The built-in O-1A catalog.
    pub fn o1a() -> Result<Self, CatalogError> {
        let profiles = builtin::O1A_PROFILES
            .iter()
            .map(|p| CriterionProfile::new(p.criterion, p.hypotheses, p.keywords))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(profiles)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let profiles = file
            .criteria
            .into_iter()
            .map(|e| CriterionProfile::new(e.criterion, e.hypotheses, e.keywords))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(profiles)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), "Loaded criterion catalog from file");
        Ok(catalog)
    }

    pub fn profile(&self, criterion: Criterion) -> &CriterionProfile {
        &self.criteria[criterion.index()]
    }

    /// Profiles in catalog order.
    pub fn profiles(&self) -> impl Iterator<Item = &CriterionProfile> + '_ {
        self.criteria.iter()
    }

    /// Total hypotheses across all criteria (entailment queries per sentence).
    pub fn hypothesis_count(&self) -> usize {
        self.criteria.iter().map(|p| p.hypotheses.len()).sum()
    }
}
