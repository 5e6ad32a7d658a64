//! Daily streak calendar rules (PRD-06).
//!
//! A streak counts consecutive calendar days with at least one qualifying
//! activity. The update is idempotent within a day: once today has been
//! counted, further events leave the count untouched.

use chrono::Days;

use crate::types::Date;

/// Result of applying one qualifying activity to a user's streak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Date,
}

/// Apply one qualifying activity on `today`.
///
/// Branches:
/// - already counted today: streak unchanged
/// - last activity was yesterday: streak + 1
/// - gap of more than one day, or no prior activity: streak resets to 1
///
/// `longest_streak` never decreases and `last_activity_date` always becomes
/// `today`.
pub fn update(
    last_activity_date: Option<Date>,
    current_streak: i32,
    longest_streak: i32,
    today: Date,
) -> StreakUpdate {
    let yesterday = today.checked_sub_days(Days::new(1));

    let current = match last_activity_date {
        Some(last) if last == today => current_streak,
        Some(last) if Some(last) == yesterday => current_streak + 1,
        _ => 1,
    };

    StreakUpdate {
        current_streak: current,
        longest_streak: longest_streak.max(current),
        last_activity_date: today,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
