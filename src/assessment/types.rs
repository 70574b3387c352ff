use serde::{Deserialize, Serialize};

use crate::catalog::CriterionMap;
use crate::rating::Rating;

/// Result of assessing one document.
///
/// Both maps always carry all eight criteria. A criterion with no evidence always scores `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub criteria_scores: CriterionMap<f32>,
    /// At most `top_evidence` sentences per criterion, best first.
    pub criteria_evidence: CriterionMap<Vec<String>>,
    pub qualification_rating: Rating,
}
