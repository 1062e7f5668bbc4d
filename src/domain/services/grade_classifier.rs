//! # Grade Classifier
//!
//! Maps pillar scores and red flags to a composite score and a letter grade.
//!
//! The composite score is always `round(mean * 100)`. Any red flag forces
//! [`Grade::F`] without touching the composite. Otherwise tiers are tried
//! top-down and the first match wins:
//!
//! | Grade | Mean | Per-pillar minimums |
//! |-------|------|---------------------|
//! | A+ | ≥ 0.95 | balance sheet, technology ≥ 0.90; others ≥ 0.80 |
//! | A | ≥ 0.90 | balance sheet ≥ 0.85; others ≥ 0.75 |
//! | B | ≥ 0.75 | pricing, DeFi ≥ 0.70 |
//! | C | ≥ 0.60 | |
//! | D | ≥ 0.50 | |
//! | F | otherwise | |

use crate::domain::value_objects::enums::Grade;
use crate::domain::value_objects::pillar_scores::PillarScores;
use crate::domain::value_objects::red_flag::RedFlag;
use serde::{Deserialize, Serialize};

/// Outcome of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    grade: Grade,
    composite_score: u8,
}

impl Rating {
    /// Letter grade.
    #[inline]
    #[must_use]
    pub const fn grade(&self) -> Grade {
        self.grade
    }

    /// Composite score in `0..=100`.
    #[inline]
    #[must_use]
    pub const fn composite_score(&self) -> u8 {
        self.composite_score
    }
}

/// Grade classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradeClassifier;

impl GradeClassifier {
    /// Classifies one set of pillar scores.
    #[must_use]
    pub fn classify(scores: &PillarScores, red_flags: &[RedFlag]) -> Rating {
        let mean = scores.mean();
        let grade = if red_flags.is_empty() {
            Self::tier(scores, mean)
        } else {
            Grade::F
        };
        Rating {
            grade,
            composite_score: Self::composite_score(mean),
        }
    }

    /// Converts a mean in `[0, 1]` to a `0..=100` score.
    #[must_use]
    pub fn composite_score(mean: f64) -> u8 {
        (mean.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    fn tier(s: &PillarScores, mean: f64) -> Grade {
        if mean >= 0.95
            && s.balance_sheet() >= 0.90
            && s.technology() >= 0.90
            && s.reputation() >= 0.80
            && s.communication() >= 0.80
            && s.pricing() >= 0.80
            && s.defi() >= 0.80
        {
            Grade::APlus
        } else if mean >= 0.90
            && s.balance_sheet() >= 0.85
            && s.reputation() >= 0.75
            && s.communication() >= 0.75
            && s.pricing() >= 0.75
            && s.technology() >= 0.75
            && s.defi() >= 0.75
        {
            Grade::A
        } else if mean >= 0.75 && s.pricing() >= 0.70 && s.defi() >= 0.70 {
            Grade::B
        } else if mean >= 0.60 {
            Grade::C
        } else if mean >= 0.50 {
            Grade::D
        } else {
            Grade::F
        }
    }
}
