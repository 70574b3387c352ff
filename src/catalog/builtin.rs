//! The O-1A hypothesis and keyword table shipped with the assessor.

use super::criterion::Criterion;

pub(super) struct BuiltinProfile {
    pub criterion: Criterion,
    pub hypotheses: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

pub(super) const O1A_PROFILES: [BuiltinProfile; 8] = [
    BuiltinProfile {
        criterion: Criterion::Awards,
        hypotheses: &[
            "This text describes receiving prestigious awards, honors, or recognitions.",
            "This text highlights winning an award or being honored for excellence.",
        ],
        keywords: &["award", "honor", "recognition", "excellence"],
    },
    BuiltinProfile {
        criterion: Criterion::Memberships,
        hypotheses: &[
            "This text mentions memberships in exclusive organizations or societies.",
            "The individual is part of elite professional associations.",
        ],
        keywords: &["member", "membership", "society", "association"],
    },
    BuiltinProfile {
        criterion: Criterion::PressMentions,
        hypotheses: &[
            "The text discusses significant press coverage or media features.",
            "This text highlights coverage in major media outlets or interviews.",
        ],
        keywords: &["press", "media", "interview", "feature"],
    },
    BuiltinProfile {
        criterion: Criterion::Judging,
        hypotheses: &[
            "The text highlights participation as a judge or evaluator in competitions or panels.",
            "This text mentions judging roles or being part of evaluation committees.",
        ],
        keywords: &["judge", "judged", "panel", "evaluate", "evaluator"],
    },
    BuiltinProfile {
        criterion: Criterion::OriginalContribution,
        hypotheses: &[
            "This text describes innovative contributions or breakthroughs.",
            "The individual pioneered new methods or technologies that disrupted the field.",
        ],
        keywords: &["contribution", "innovative", "pioneer", "developed"],
    },
    BuiltinProfile {
        criterion: Criterion::ScholarlyArticles,
        hypotheses: &[
            "This text mentions publishing scholarly articles, research papers, or studies.",
            "The text indicates contributions to academic journals or conferences.",
        ],
        keywords: &["paper", "article", "published", "journal"],
    },
    BuiltinProfile {
        criterion: Criterion::CriticalEmployment,
        hypotheses: &[
            "The text outlines critical roles and responsibilities in leading organizations.",
            "This text describes key employment positions that drove significant success.",
        ],
        keywords: &["senior", "lead", "engineer", "developer", "manager"],
    },
    BuiltinProfile {
        criterion: Criterion::HighRemuneration,
        hypotheses: &[
            "This text provides evidence of high compensation, salary, or financial rewards.",
            "The individual commands a compensation package that exceeds industry norms.",
        ],
        keywords: &["salary", "compensation", "remuneration", "earn"],
    },
];
