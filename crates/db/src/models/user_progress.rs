//! Per-topic mastery aggregate models (PRD-08).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyforge_core::mastery::MasteryLevel;
use studyforge_core::types::{DbId, Timestamp};

/// A row from the `user_progress` table: one per (user, topic).
///
/// `average_score` is recomputed from the cumulative question totals on
/// every merge; `mastery_level` is derived from it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub topic: String,
    pub subject: Option<String>,
    pub quiz_completed: i32,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub average_score: f64,
    pub mastery_level: String,
    pub last_activity_at: Timestamp,
}

impl UserProgress {
    pub fn mastery(&self) -> Option<MasteryLevel> {
        match self.mastery_level.as_str() {
            "BEGINNER" => Some(MasteryLevel::Beginner),
            "INTERMEDIATE" => Some(MasteryLevel::Intermediate),
            "ADVANCED" => Some(MasteryLevel::Advanced),
            "EXPERT" => Some(MasteryLevel::Expert),
            _ => None,
        }
    }
}

/// DTO for merging one scored quiz into a topic aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressDelta {
    pub topic: String,
    pub subject: Option<String>,
    pub total_questions: i32,
    pub correct_answers: i32,
}
