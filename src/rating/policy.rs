use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CriterionMap;
use crate::constants::{
    DEFAULT_HIGH_MIN_AVG, DEFAULT_HIGH_MIN_STRONG, DEFAULT_MEDIUM_MIN_AVG,
    DEFAULT_MEDIUM_MIN_STRONG, DEFAULT_RATING_TOP_K, DEFAULT_STRONG_SCORE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    High,
    Medium,
    Low,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::High => "High",
            Rating::Medium => "Medium",
            Rating::Low => "Low",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two numbers the decision table looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBreakdown {
    /// Criteria scoring at or above `strong_score`.
    pub strong_count: usize,
    /// Mean of the `top_k` highest scores.
    pub avg_top: f32,
}

/// Decision table for the qualification rating.
///
/// Rows are checked in order and the first match wins:
///
/// | rating | strong criteria | top-k average |
/// |--------|-----------------|---------------|
/// | High   | `>= high_min_strong`   | `> high_min_avg`   |
/// | Medium | `>= medium_min_strong` | `> medium_min_avg` |
/// | Low    | otherwise | |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPolicy {
    pub strong_score: f32,
    pub high_min_strong: usize,
    pub high_min_avg: f32,
    pub medium_min_strong: usize,
    pub medium_min_avg: f32,
    pub top_k: usize,
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            strong_score: DEFAULT_STRONG_SCORE,
            high_min_strong: DEFAULT_HIGH_MIN_STRONG,
            high_min_avg: DEFAULT_HIGH_MIN_AVG,
            medium_min_strong: DEFAULT_MEDIUM_MIN_STRONG,
            medium_min_avg: DEFAULT_MEDIUM_MIN_AVG,
            top_k: DEFAULT_RATING_TOP_K,
        }
    }
}

impl RatingPolicy {
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("strong_score", self.strong_score),
            ("high_min_avg", self.high_min_avg),
            ("medium_min_avg", self.medium_min_avg),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        for (name, value) in [
            ("high_min_strong", self.high_min_strong),
            ("medium_min_strong", self.medium_min_strong),
            ("top_k", self.top_k),
        ] {
            if value == 0 {
                return Err(format!("{name} must be at least 1"));
            }
        }
        Ok(())
    }

    pub fn summarize(&self, scores: &CriterionMap<f32>) -> RatingBreakdown {
        let strong_count = scores
            .values()
            .filter(|score| **score >= self.strong_score)
            .count();

        let mut sorted: Vec<f32> = scores.values().copied().collect();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let top = &sorted[..self.top_k.min(sorted.len())];
        let avg_top = if top.is_empty() {
            0.0
        } else {
            top.iter().sum::<f32>() / top.len() as f32
        };

        RatingBreakdown {
            strong_count,
            avg_top,
        }
    }

    /// Rates a complete score map. Pure: depends on `scores` and the policy only.
    pub fn evaluate(&self, scores: &CriterionMap<f32>) -> Rating {
        self.rate(&self.summarize(scores))
    }

    pub fn rate(&self, breakdown: &RatingBreakdown) -> Rating {
        let RatingBreakdown {
            strong_count,
            avg_top,
        } = *breakdown;

        if strong_count >= self.high_min_strong && avg_top > self.high_min_avg {
            Rating::High
        } else if strong_count >= self.medium_min_strong && avg_top > self.medium_min_avg {
            Rating::Medium
        } else {
            Rating::Low
        }
    }
}
