//! Per-user progress counters and XP totals (PRD-06).

use serde::Serialize;
use sqlx::FromRow;
use studyforge_core::badge::StatsCounters;
use studyforge_core::types::{Date, DbId, Timestamp};

/// A row from the `user_stats` table. One per user, created lazily on the
/// first reported event.
///
/// `total_xp` and `level` never decrease. `weekly_xp` / `monthly_xp` are
/// reset on period boundaries by a scheduled job outside this engine.
/// `version` guards the read-modify-write cycle: saves carry the version
/// they read and fail when another writer got there first.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserStats {
    pub id: DbId,
    pub user_id: DbId,
    pub total_xp: i32,
    pub weekly_xp: i32,
    pub monthly_xp: i32,
    pub level: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<Date>,
    pub explanations_requested: i32,
    pub quizzes_completed: i32,
    pub quizzes_passed: i32,
    pub flashcards_studied: i32,
    pub flashcards_mastered: i32,
    pub focus_sessions_completed: i32,
    pub total_study_time_minutes: i32,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserStats {
    /// Add XP to the running totals. Level recomputation is the caller's
    /// job (done once per event, after badge bonuses).
    pub fn add_xp(&mut self, amount: i32) {
        self.total_xp += amount;
        self.weekly_xp += amount;
        self.monthly_xp += amount;
    }

    /// Snapshot of the counters badge requirements are measured against.
    pub fn counters(&self) -> StatsCounters {
        StatsCounters {
            explanations_requested: self.explanations_requested,
            quizzes_completed: self.quizzes_completed,
            quizzes_passed: self.quizzes_passed,
            flashcards_studied: self.flashcards_studied,
            current_streak: self.current_streak,
            total_xp: self.total_xp,
            level: self.level,
            focus_sessions_completed: self.focus_sessions_completed,
        }
    }
}
