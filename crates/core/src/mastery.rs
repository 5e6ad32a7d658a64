//! Per-topic mastery tiers and score aggregation (PRD-08).
//!
//! A topic's average score is recomputed from merged totals rather than
//! chained incrementally, so repeated merges of the same inputs are
//! deterministic.

use std::fmt;

// ---------------------------------------------------------------------------
// Tier thresholds
// ---------------------------------------------------------------------------

/// Average score from which a topic counts as intermediate.
pub const INTERMEDIATE_SCORE: f64 = 50.0;
/// Average score from which a topic counts as advanced.
pub const ADVANCED_SCORE: f64 = 75.0;
/// Average score from which a topic counts as mastered.
pub const EXPERT_SCORE: f64 = 90.0;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Derived mastery tier for a (user, topic) aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasteryLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl MasteryLevel {
    /// Derive the tier from an average score (0–100).
    pub fn from_average_score(average: f64) -> Self {
        if average >= EXPERT_SCORE {
            Self::Expert
        } else if average >= ADVANCED_SCORE {
            Self::Advanced
        } else if average >= INTERMEDIATE_SCORE {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "BEGINNER",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
            Self::Expert => "EXPERT",
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Average score (0–100) for cumulative question totals.
///
/// Zero questions yields 0.0 rather than a division error.
pub fn average_score(correct_answers: i32, total_questions: i32) -> f64 {
    if total_questions <= 0 {
        return 0.0;
    }
    f64::from(correct_answers.max(0)) / f64::from(total_questions) * 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
