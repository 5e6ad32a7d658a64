//! Recommendation types, priorities, and rule thresholds (PRD-08).
//!
//! The generator in `studyforge-engine` evaluates one rule per type; this
//! module holds the closed type set and the tuning constants the rules
//! compare against.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Rule thresholds
// ---------------------------------------------------------------------------

/// Average score below which a topic counts as weak.
pub const WEAK_TOPIC_SCORE: f64 = 60.0;
/// Days of inactivity after which a topic needs review.
pub const REVIEW_AFTER_DAYS: i64 = 7;
/// Days of inactivity that escalate a review suggestion to high priority.
pub const REVIEW_URGENT_DAYS: i64 = 14;
/// Window of days in which a topic counts as recently studied.
pub const RECENT_TOPIC_WINDOW_DAYS: i64 = 3;
/// Score band [low, high) in which a recent topic is worth continuing.
pub const CONTINUE_SCORE_LOW: f64 = 60.0;
pub const CONTINUE_SCORE_HIGH: f64 = 80.0;
/// Average score from which a topic qualifies for a challenge suggestion.
pub const CHALLENGE_SCORE: f64 = 80.0;
/// Overall average score the improve-average rule nudges toward.
pub const OVERALL_AVERAGE_TARGET: f64 = 70.0;
/// Total study minutes below which more study time is suggested.
pub const MIN_STUDY_MINUTES: i32 = 60;
/// Distinct topics below which exploring new ones is suggested.
pub const MIN_DISTINCT_TOPICS: i64 = 5;
/// Weekly XP below which the daily goal reminder fires.
pub const WEEKLY_XP_GOAL: i32 = 50;
/// Completed quizzes from which the milestone congratulation fires.
pub const MILESTONE_QUIZZES: i32 = 10;
/// Lifetime of a generated recommendation, in days.
pub const EXPIRY_DAYS: i64 = 1;

// ---------------------------------------------------------------------------
// Closed type set
// ---------------------------------------------------------------------------

/// What a recommendation suggests. One active recommendation per
/// (user, type, topic) at a time; the generator's dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationType {
    StreakReminder,
    WeaknessFocus,
    ReviewTopic,
    DailyGoal,
    NewTopic,
    StudyFlashcards,
    ContinueStudying,
    ChallengeYourself,
    ImproveAverage,
    StudyMore,
    Milestone,
}

impl RecommendationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StreakReminder => "STREAK_REMINDER",
            Self::WeaknessFocus => "WEAKNESS_FOCUS",
            Self::ReviewTopic => "REVIEW_TOPIC",
            Self::DailyGoal => "DAILY_GOAL",
            Self::NewTopic => "NEW_TOPIC",
            Self::StudyFlashcards => "STUDY_FLASHCARDS",
            Self::ContinueStudying => "CONTINUE_STUDYING",
            Self::ChallengeYourself => "CHALLENGE_YOURSELF",
            Self::ImproveAverage => "IMPROVE_AVERAGE",
            Self::StudyMore => "STUDY_MORE",
            Self::Milestone => "MILESTONE",
        }
    }

    const ALL: &'static [Self] = &[
        Self::StreakReminder,
        Self::WeaknessFocus,
        Self::ReviewTopic,
        Self::DailyGoal,
        Self::NewTopic,
        Self::StudyFlashcards,
        Self::ContinueStudying,
        Self::ChallengeYourself,
        Self::ImproveAverage,
        Self::StudyMore,
        Self::Milestone,
    ];
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown recommendation type: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Display priority. Ordered so `High > Medium > Low` for sorting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecPriority {
    Low,
    Medium,
    High,
}

impl RecPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RecPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(format!("Unknown priority: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

/// Priority of a review suggestion given how long a topic sat idle.
pub fn review_priority(days_idle: i64) -> RecPriority {
    if days_idle >= REVIEW_URGENT_DAYS {
        RecPriority::High
    } else {
        RecPriority::Medium
    }
}

/// Whether an average score sits in the keep-practicing band.
pub fn in_continue_band(average_score: f64) -> bool {
    (CONTINUE_SCORE_LOW..CONTINUE_SCORE_HIGH).contains(&average_score)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
