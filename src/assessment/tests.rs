use super::*;
use std::sync::Arc;

use crate::catalog::{Criterion, CriterionCatalog};
use crate::nli::{BackendMode, EntailmentBackend, MockEntailment, NliModel};
use crate::rating::Rating;
use crate::scoring::FailurePolicy;

const AWARD: &str = "Received the national award for research excellence.";
const JUDGE: &str = "Served as a judge on the review panel.";
const PAPERS: &str = "Published ten papers in peer-reviewed journals.";

fn assessor_with(mock: MockEntailment, policy: AssessmentPolicy) -> (Arc<MockEntailment>, Assessor) {
    let mock = Arc::new(mock);
    let backend: Arc<dyn EntailmentBackend> = mock.clone();
    let catalog = Arc::new(CriterionCatalog::o1a().unwrap());
    let assessor = Assessor::new(catalog, backend, policy).unwrap();
    (mock, assessor)
}

fn assessor(mock: MockEntailment) -> (Arc<MockEntailment>, Assessor) {
    assessor_with(mock, AssessmentPolicy::default())
}

fn strong_profile() -> MockEntailment {
    MockEntailment::new()
        .rule_for("national award", "award", 0.9)
        .rule_for("judge on", "judg", 0.8)
        .rule_for("published ten", "scholarly", 0.7)
}

fn assert_invariants(assessment: &Assessment) {
    for criterion in Criterion::ALL {
        let score = assessment.criteria_scores[criterion];
        let evidence = &assessment.criteria_evidence[criterion];
        assert!((0.0..=1.0).contains(&score), "{criterion}: {score}");
        assert!(evidence.len() <= 2);
        if evidence.is_empty() {
            assert_eq!(score, 0.0, "{criterion} has no evidence but scored {score}");
        }
    }
}

#[test]
fn test_empty_document() {
    let (mock, assessor) = assessor(MockEntailment::new().with_default(0.9));

    let assessment = assessor.assess("").unwrap();

    assert!(assessment.criteria_scores.values().all(|s| *s == 0.0));
    assert!(assessment.criteria_evidence.values().all(Vec::is_empty));
    assert_eq!(assessment.qualification_rating, Rating::Low);
    assert_eq!(mock.batch_calls(), 0);
}

#[test]
fn test_short_sentence_is_treated_as_empty() {
    let (mock, assessor) = assessor(MockEntailment::new().with_default(0.9));

    let assessment = assessor.assess("Won.").unwrap();

    assert_eq!(assessment, assessor.assess("   ").unwrap());
    assert_eq!(assessment.qualification_rating, Rating::Low);
    assert_eq!(mock.calls(), 0);
}

#[test]
fn test_single_corroborated_hit() {
    let (_, assessor) = assessor(MockEntailment::new().rule_for("national award", "award", 0.8));

    let assessment = assessor
        .assess(&format!("{AWARD}\nMaintained internal build tooling."))
        .unwrap();

    assert_eq!(assessment.criteria_scores[Criterion::Awards], 0.8);
    assert_eq!(assessment.criteria_evidence[Criterion::Awards], vec![AWARD]);
    for criterion in Criterion::ALL.into_iter().filter(|c| *c != Criterion::Awards) {
        assert_eq!(assessment.criteria_scores[criterion], 0.0);
        assert!(assessment.criteria_evidence[criterion].is_empty());
    }
    assert_eq!(assessment.qualification_rating, Rating::Low);
}

#[test]
fn test_semantic_match_without_keyword_is_zeroed() {
    let (_, assessor) = assessor(
        MockEntailment::new().rule_for("reviewed hundreds", "judg", 0.9),
    );

    let assessment = assessor
        .assess("Reviewed hundreds of competition submissions.")
        .unwrap();

    assert_eq!(assessment.criteria_scores[Criterion::Judging], 0.0);
    assert!(assessment.criteria_evidence[Criterion::Judging].is_empty());
}

#[test]
fn test_high_rating() {
    let (_, assessor) = assessor(strong_profile());

    let assessment = assessor
        .assess(&format!("{AWARD}\n{JUDGE}\n{PAPERS}"))
        .unwrap();

    assert_eq!(assessment.criteria_scores[Criterion::Awards], 0.9);
    assert_eq!(assessment.criteria_scores[Criterion::Judging], 0.8);
    assert_eq!(assessment.criteria_scores[Criterion::ScholarlyArticles], 0.7);
    assert_eq!(assessment.qualification_rating, Rating::High);
    assert_invariants(&assessment);
}

#[test]
fn test_medium_rating() {
    let (_, assessor) = assessor(
        MockEntailment::new()
            .rule_for("national award", "award", 0.9)
            .rule_for("judge on", "judg", 0.6)
            .rule_for("published ten", "scholarly", 0.4),
    );

    let assessment = assessor
        .assess(&format!("{AWARD}\n{JUDGE}\n{PAPERS}"))
        .unwrap();

    assert_eq!(assessment.qualification_rating, Rating::Medium);
}

#[test]
fn test_evidence_order_and_ties() {
    let first = "Won an award for community outreach.";
    let second = "Won an award for technical leadership.";
    let best = "Won an award from the president.";
    let (_, assessor) = assessor(
        MockEntailment::new()
            .rule_for("the president", "award", 0.95)
            .rule_for("won an award", "award", 0.6),
    );

    let assessment = assessor
        .assess(&format!("{first}\n{second}\n{best}"))
        .unwrap();

    assert_eq!(
        assessment.criteria_evidence[Criterion::Awards],
        vec![best, first]
    );
}

#[test]
fn test_batch_size_does_not_change_result() {
    let text = format!(
        "{AWARD}\n{JUDGE}\n{PAPERS}\nWon an award for outreach work.\nLead engineer on the platform team."
    );
    let mock = || {
        strong_profile()
            .rule_for("outreach", "award", 0.9)
            .rule_for("lead engineer", "employment", 0.65)
    };

    let (_, reference) = assessor_with(
        mock(),
        AssessmentPolicy {
            sentence_batch_size: 1,
            ..Default::default()
        },
    );
    let expected = reference.assess(&text).unwrap();

    for sentence_batch_size in [2, 3, 4, 16] {
        let (_, assessor) = assessor_with(
            mock(),
            AssessmentPolicy {
                sentence_batch_size,
                ..Default::default()
            },
        );
        assert_eq!(assessor.assess(&text).unwrap(), expected);
    }
}

#[test]
fn test_batches_follow_sentence_batch_size() {
    let (mock, assessor) = assessor_with(
        MockEntailment::new(),
        AssessmentPolicy {
            sentence_batch_size: 2,
            ..Default::default()
        },
    );

    assessor
        .assess(&format!("{AWARD}\n{JUDGE}\n{PAPERS}"))
        .unwrap();

    assert_eq!(mock.batch_calls(), 2);
    assert_eq!(mock.issued().len(), 3 * assessor.catalog().hypothesis_count());
}

#[test]
fn test_fail_policy_aborts() {
    let (_, assessor) = assessor(strong_profile().fail_on("judge on"));

    let err = assessor
        .assess(&format!("{AWARD}\n{JUDGE}\n{PAPERS}"))
        .unwrap_err();

    assert!(matches!(err, AssessmentError::Scoring(_)));
}

#[test]
fn test_skip_policy_zeroes_failing_pairs_only() {
    let (_, assessor) = assessor_with(
        strong_profile().fail_on("judge on"),
        AssessmentPolicy {
            failure_policy: FailurePolicy::SkipPair,
            ..Default::default()
        },
    );

    let assessment = assessor
        .assess(&format!("{AWARD}\n{JUDGE}\n{PAPERS}"))
        .unwrap();

    assert_eq!(assessment.criteria_scores[Criterion::Awards], 0.9);
    assert_eq!(assessment.criteria_scores[Criterion::Judging], 0.0);
    assert_eq!(assessment.criteria_scores[Criterion::ScholarlyArticles], 0.7);
    assert_eq!(assessment.qualification_rating, Rating::Medium);
}

#[test]
fn test_invalid_policy_rejected() {
    let catalog = Arc::new(CriterionCatalog::o1a().unwrap());
    let backend: Arc<dyn EntailmentBackend> = Arc::new(MockEntailment::new());
    let policy = AssessmentPolicy {
        sentence_batch_size: 0,
        ..Default::default()
    };

    let err = Assessor::new(catalog, backend, policy).unwrap_err();
    assert!(matches!(err, AssessmentError::InvalidPolicy { .. }));
}

#[test]
fn test_policy_validate() {
    assert!(AssessmentPolicy::default().validate().is_ok());

    let mut policy = AssessmentPolicy::default();
    policy.evidence.relevance_threshold = -0.1;
    assert!(policy.validate().is_err());

    let mut policy = AssessmentPolicy::default();
    policy.evidence.top_n = 0;
    assert!(policy.validate().is_err());

    let mut policy = AssessmentPolicy::default();
    policy.rating.high_min_avg = 2.0;
    assert!(policy.validate().is_err());
}

#[test]
fn test_stub_backend_on_realistic_cv() {
    let cv = "Jane Doe\n\
        Senior Software Engineer\n\n\
        Received the ACM Distinguished Award for excellence in systems research.\n\
        Member of the IEEE Computer Society and the Royal Society of Engineering.\n\
        Served as a judge on the national programming competition panel.\n\
        Published 14 papers in peer-reviewed journals and conferences.\n\
        Lead engineer for the payments platform, managing a team of twelve.\n\
        Featured in a TechCrunch interview on distributed databases.\n";
    let backend: Arc<dyn EntailmentBackend> = Arc::new(NliModel::stub().unwrap());
    let assessor = Assessor::new(
        Arc::new(CriterionCatalog::o1a().unwrap()),
        backend,
        AssessmentPolicy::default(),
    )
    .unwrap();

    let assessment = assessor.assess(cv).unwrap();

    assert_eq!(assessor.backend_mode(), BackendMode::Stub);
    assert_invariants(&assessment);
    assert_eq!(assessor.assess(cv).unwrap(), assessment);
}

#[test]
fn test_assessment_serialization_shape() {
    let (_, assessor) = assessor(strong_profile());
    let assessment = assessor.assess(AWARD).unwrap();

    let json = serde_json::to_value(&assessment).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(json["criteria_scores"].as_object().unwrap().len(), 8);
    assert_eq!(json["criteria_evidence"]["Awards"][0], AWARD);
    assert_eq!(json["criteria_evidence"]["Judging"], serde_json::json!([]));
    assert_eq!(json["qualification_rating"], "Low");

    let parsed: Assessment = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, assessment);
}
