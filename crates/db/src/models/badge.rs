//! Badge catalog and unlock record models (PRD-07).

use serde::Serialize;
use sqlx::FromRow;
use studyforge_core::badge::BadgeRequirement;
use studyforge_core::types::{DbId, Timestamp};

/// A row from the `badges` catalog table. Seeded by the deployment and
/// read-only to the engine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Badge {
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
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl Badge {
    /// Parsed requirement kind; `None` for catalog rows carrying a label
    /// this build does not know (skipped by the unlock pass).
    pub fn requirement(&self) -> Option<BadgeRequirement> {
        self.requirement_type.parse().ok()
    }
}

/// A row from the `user_badges` table. At most one per (user, badge);
/// the unique constraint backs the exactly-once unlock guarantee.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBadge {
    pub id: DbId,
    pub user_id: DbId,
    pub badge_id: DbId,
    pub unlocked_at: Timestamp,
    pub progress_at_unlock: i32,
    pub is_new: bool,
}
