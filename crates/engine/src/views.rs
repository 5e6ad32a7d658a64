//! Read-model DTOs exposed to transport layers.
//!
//! Field names are the stable contract a serialization layer maps onto its
//! wire casing.

use serde::Serialize;
use studyforge_core::types::{Date, DbId, Timestamp};
use studyforge_core::xp::EventKind;
use studyforge_db::models::badge::Badge;

/// Outcome of applying one learning event.
///
/// `xp_earned` is the base award for the event itself; `total_xp` and
/// `level` include any badge bonus XP granted in the same call.
#[derive(Debug, Clone, Serialize)]
pub struct XpEventResult {
    pub event: EventKind,
    pub xp_earned: i32,
    pub total_xp: i32,
    pub level: i32,
    pub leveled_up: bool,
    pub new_badges: Vec<Badge>,
}

/// Full stats read model, including derived leveling fields.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatsView {
    pub user_id: DbId,
    pub total_xp: i32,
    pub weekly_xp: i32,
    pub monthly_xp: i32,
    pub level: i32,
    pub level_progress: f64,
    pub xp_for_next_level: i32,
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
    pub badges_unlocked: i64,
}

/// A catalog badge with the viewing user's unlock state.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeView {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub rarity: Option<String>,
    pub requirement_type: String,
    pub requirement_value: i32,
    pub xp_reward: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<Timestamp>,
    pub is_new: bool,
    pub progress_percent: f64,
}

/// An active suggestion for the user.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub id: DbId,
    pub rec_type: String,
    pub title: String,
    pub description: String,
    pub topic: Option<String>,
    pub reason: String,
    pub priority: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub rank: u32,
    pub user_id: DbId,
    pub value: i32,
    pub level: i32,
}
