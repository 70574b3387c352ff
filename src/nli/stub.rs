//! Deterministic lexical stand-in for the NLI model.
//!
//! Used when no model directory is configured. Scores are driven by content-word overlap between
//! premise and hypothesis, compared on 4-character stems so "awards" meets "award" and "judging"
//! meets "judged". The output is always a valid distribution.

use std::collections::HashSet;

use super::EntailmentDistribution;

const STEM_LEN: usize = 4;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "to",
    "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through", "during",
    "before", "after", "and", "but", "if", "or", "because", "while", "what", "which", "who",
    "this", "that", "these", "those", "it", "its", "i", "my", "me", "we", "our", "text",
    "individual", "describes", "mentions", "highlights", "indicates", "provides", "outlines",
    "part", "new", "major", "key",
];

fn stems(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1 && !STOP_WORDS.contains(w))
        .map(|w| w.chars().take(STEM_LEN).collect())
        .collect()
}

pub(crate) fn heuristic_distribution(premise: &str, hypothesis: &str) -> EntailmentDistribution {
    let premise_stems = stems(premise);
    let hypothesis_stems = stems(hypothesis);

    let smaller = premise_stems.len().min(hypothesis_stems.len());
    if smaller == 0 {
        return EntailmentDistribution::neutral();
    }

    let overlap = premise_stems.intersection(&hypothesis_stems).count();
    let coverage = overlap as f32 / smaller as f32;

    let entailment = (1.0 / (1.0 + (-10.0 * (coverage - 0.3)).exp())).clamp(0.0, 1.0);
    let contradiction = (1.0 - entailment) * 0.25;
    let neutral = (1.0 - entailment - contradiction).max(0.0);

    EntailmentDistribution {
        contradiction,
        neutral,
        entailment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_sums_to_one() {
        let d = heuristic_distribution(
            "Received the ACM award for excellence in research.",
            "This text highlights winning an award or being honored for excellence.",
        );
        assert!((d.contradiction + d.neutral + d.entailment - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_overlap_raises_entailment() {
        let hypothesis = "This text highlights winning an award or being honored for excellence.";
        let related = heuristic_distribution("Won an award for excellence.", hypothesis);
        let unrelated = heuristic_distribution("Maintained the build pipeline.", hypothesis);

        assert!(related.entailment > 0.5);
        assert!(unrelated.entailment < 0.1);
    }

    #[test]
    fn test_stems_match_inflections() {
        let d = heuristic_distribution(
            "Judged the regional robotics competitions.",
            "This text mentions judging roles in competitions.",
        );
        assert!(d.entailment > 0.5);
    }

    #[test]
    fn test_empty_premise_is_neutral() {
        assert_eq!(
            heuristic_distribution("", "Anything at all."),
            EntailmentDistribution::neutral()
        );
    }
}
