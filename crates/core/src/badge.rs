//! Badge requirement model and progress math (PRD-07).
//!
//! A badge unlocks when one stats counter reaches a threshold. The
//! requirement kinds form a closed set; adding one is a compile-checked
//! change everywhere a `match` consumes [`BadgeRequirement`].

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Requirement kinds
// ---------------------------------------------------------------------------

/// Which stats counter a badge threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeRequirement {
    ExplanationsCount,
    QuizzesCompleted,
    QuizzesPassed,
    FlashcardsStudied,
    StreakDays,
    TotalXp,
    Level,
    FocusSessions,
}

/// Fixed evaluation order for the unlock pass. TOTAL_XP and LEVEL come
/// after the activity counters, so bonuses granted earlier in the same pass
/// are not yet visible to them (single-pass policy).
pub const EVALUATION_ORDER: &[BadgeRequirement] = &[
    BadgeRequirement::ExplanationsCount,
    BadgeRequirement::QuizzesCompleted,
    BadgeRequirement::QuizzesPassed,
    BadgeRequirement::FlashcardsStudied,
    BadgeRequirement::StreakDays,
    BadgeRequirement::TotalXp,
    BadgeRequirement::Level,
    BadgeRequirement::FocusSessions,
];

impl BadgeRequirement {
    /// Wire/storage label (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExplanationsCount => "EXPLANATIONS_COUNT",
            Self::QuizzesCompleted => "QUIZZES_COMPLETED",
            Self::QuizzesPassed => "QUIZZES_PASSED",
            Self::FlashcardsStudied => "FLASHCARDS_STUDIED",
            Self::StreakDays => "STREAK_DAYS",
            Self::TotalXp => "TOTAL_XP",
            Self::Level => "LEVEL",
            Self::FocusSessions => "FOCUS_SESSIONS",
        }
    }

    /// Select the counter this requirement is measured against.
    pub fn counter_value(self, counters: &StatsCounters) -> i32 {
        match self {
            Self::ExplanationsCount => counters.explanations_requested,
            Self::QuizzesCompleted => counters.quizzes_completed,
            Self::QuizzesPassed => counters.quizzes_passed,
            Self::FlashcardsStudied => counters.flashcards_studied,
            Self::StreakDays => counters.current_streak,
            Self::TotalXp => counters.total_xp,
            Self::Level => counters.level,
            Self::FocusSessions => counters.focus_sessions_completed,
        }
    }
}

impl fmt::Display for BadgeRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeRequirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EVALUATION_ORDER
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown badge requirement type: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Counter snapshot
// ---------------------------------------------------------------------------

/// The stats counters badge requirements are measured against.
///
/// A plain value snapshot so the unlock pass and progress queries stay pure;
/// the engine fills it from the persisted stats row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsCounters {
    pub explanations_requested: i32,
    pub quizzes_completed: i32,
    pub quizzes_passed: i32,
    pub flashcards_studied: i32,
    pub current_streak: i32,
    pub total_xp: i32,
    pub level: i32,
    pub focus_sessions_completed: i32,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Percentage progress toward a requirement threshold, capped at 100.
///
/// Nonpositive thresholds count as already satisfied.
pub fn progress_percent(current: i32, requirement_value: i32) -> f64 {
    if requirement_value <= 0 {
        return 100.0;
    }
    let progress = f64::from(current.max(0)) / f64::from(requirement_value) * 100.0;
    progress.min(100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_partial() {
        assert!((progress_percent(15, 20) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn progress_capped_at_hundred() {
        assert!((progress_percent(25, 20) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_zero_counter() {
        assert!((progress_percent(0, 20) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_nonpositive_requirement_is_satisfied() {
        assert!((progress_percent(3, 0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_counter_clamped() {
        assert!((progress_percent(-2, 20) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn evaluation_order_covers_every_kind() {
        assert_eq!(EVALUATION_ORDER.len(), 8);
        for kind in EVALUATION_ORDER {
            assert!(EVALUATION_ORDER.contains(kind));
        }
    }

    #[test]
    fn labels_round_trip() {
        for kind in EVALUATION_ORDER.iter().copied() {
            assert_eq!(kind.as_str().parse::<BadgeRequirement>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_label_rejected() {
        assert!("PUSH_UPS".parse::<BadgeRequirement>().is_err());
    }

    #[test]
    fn counter_selection() {
        let counters = StatsCounters {
            explanations_requested: 1,
            quizzes_completed: 2,
            quizzes_passed: 3,
            flashcards_studied: 4,
            current_streak: 5,
            total_xp: 6,
            level: 7,
            focus_sessions_completed: 8,
        };
        assert_eq!(
            BadgeRequirement::ExplanationsCount.counter_value(&counters),
            1
        );
        assert_eq!(BadgeRequirement::StreakDays.counter_value(&counters), 5);
        assert_eq!(BadgeRequirement::FocusSessions.counter_value(&counters), 8);
    }
}
