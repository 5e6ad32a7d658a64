//! Repository for the `badges` catalog table (PRD-07).

use sqlx::PgPool;
use studyforge_core::badge::BadgeRequirement;

use crate::models::badge::Badge;

/// Column list for `badges` queries.
const COLUMNS: &str = "id, code, name, description, icon, color, category, rarity, \
    requirement_type, requirement_value, xp_reward, is_active, created_at";

/// Read-only access to the badge catalog.
pub struct BadgeRepo;

impl BadgeRepo {
    /// All active catalog entries, ascending by threshold.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Badge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM badges \
             WHERE is_active = TRUE \
             ORDER BY requirement_value ASC, id ASC"
        );
        sqlx::query_as::<_, Badge>(&query).fetch_all(pool).await
    }

    /// Active badges of one requirement kind whose threshold the counter
    /// has reached, ascending by threshold.
    pub async fn unlockable(
        pool: &PgPool,
        requirement: BadgeRequirement,
        counter_value: i32,
    ) -> Result<Vec<Badge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM badges \
             WHERE is_active = TRUE AND requirement_type = $1 AND requirement_value <= $2 \
             ORDER BY requirement_value ASC, id ASC"
        );
        sqlx::query_as::<_, Badge>(&query)
            .bind(requirement.as_str())
            .bind(counter_value)
            .fetch_all(pool)
            .await
    }
}
