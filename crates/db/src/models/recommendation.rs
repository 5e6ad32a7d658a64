//! Recommendation models and DTOs (PRD-08).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyforge_core::recommendation::{RecPriority, RecommendationType};
use studyforge_core::types::{DbId, Timestamp};

/// A row from the `recommendations` table.
///
/// A recommendation is *active* while it is neither dismissed nor completed
/// nor expired. Expired rows stay in place; readers filter on `expires_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recommendation {
    pub id: DbId,
    pub user_id: DbId,
    pub rec_type: String,
    pub title: String,
    pub description: String,
    pub topic: Option<String>,
    pub reason: String,
    pub priority: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_dismissed: bool,
    pub is_completed: bool,
}

impl Recommendation {
    pub fn rec_type(&self) -> Option<RecommendationType> {
        self.rec_type.parse().ok()
    }

    pub fn priority(&self) -> Option<RecPriority> {
        self.priority.parse().ok()
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.is_dismissed && !self.is_completed && self.expires_at > now
    }
}

/// DTO for inserting a generated recommendation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecommendation {
    pub user_id: DbId,
    pub rec_type: RecommendationType,
    pub title: String,
    pub description: String,
    pub topic: Option<String>,
    pub reason: String,
    pub priority: RecPriority,
    pub expires_at: Timestamp,
}
