//! Repository for the `user_badges` table (PRD-07).

use sqlx::PgPool;
use studyforge_core::types::DbId;

use crate::models::badge::UserBadge;

/// Column list for `user_badges` queries.
const COLUMNS: &str = "id, user_id, badge_id, unlocked_at, progress_at_unlock, is_new";

/// Unlock records. The (user_id, badge_id) unique constraint makes the
/// unlock insert idempotent.
pub struct UserBadgeRepo;

impl UserBadgeRepo {
    /// Record an unlock if none exists yet.
    ///
    /// Returns `true` when this call created the record, `false` when the
    /// badge was already unlocked (a concurrent pass or an earlier event).
    pub async fn try_unlock(
        pool: &PgPool,
        user_id: DbId,
        badge_id: DbId,
        progress_at_unlock: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_badges (user_id, badge_id, progress_at_unlock) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, badge_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(badge_id)
        .bind(progress_at_unlock)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// All unlocks for a user, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<UserBadge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_badges \
             WHERE user_id = $1 \
             ORDER BY unlocked_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserBadge>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Number of badges a user has unlocked.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_badges WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Flip `is_new` off for every unseen unlock of a user.
    pub async fn mark_all_seen(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE user_badges SET is_new = FALSE WHERE user_id = $1 AND is_new = TRUE")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
