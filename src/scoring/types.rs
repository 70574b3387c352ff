use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when the entailment backend fails for a (sentence, hypothesis) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole assessment with the backend error.
    #[default]
    FailRequest,
    /// Log the failing pair and count it as a zero-entailment sample.
    SkipPair,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::FailRequest => "fail",
            FailurePolicy::SkipPair => "skip",
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" | "fail_request" => Ok(FailurePolicy::FailRequest),
            "skip" | "skip_pair" => Ok(FailurePolicy::SkipPair),
            other => Err(format!("expected `fail` or `skip`, got `{other}`")),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
