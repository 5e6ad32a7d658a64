//! Repository for the `recommendations` table (PRD-08).

use sqlx::PgPool;
use studyforge_core::recommendation::RecommendationType;
use studyforge_core::types::{DbId, Timestamp};

use crate::models::recommendation::{NewRecommendation, Recommendation};

/// Column list for `recommendations` queries.
const COLUMNS: &str = "id, user_id, rec_type, title, description, topic, reason, \
    priority, created_at, expires_at, is_dismissed, is_completed";

/// Active-row predicate shared by the reader and the dedup check.
const ACTIVE_PREDICATE: &str = "is_dismissed = FALSE AND is_completed = FALSE AND expires_at > $2";

/// Suggestion rows. Termination is dismiss/complete; expiry is passive.
pub struct RecommendationRepo;

impl RecommendationRepo {
    /// Insert a generated recommendation.
    pub async fn insert(
        pool: &PgPool,
        rec: &NewRecommendation,
    ) -> Result<Recommendation, sqlx::Error> {
        let query = format!(
            "INSERT INTO recommendations \
                 (user_id, rec_type, title, description, topic, reason, priority, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(rec.user_id)
            .bind(rec.rec_type.as_str())
            .bind(&rec.title)
            .bind(&rec.description)
            .bind(&rec.topic)
            .bind(&rec.reason)
            .bind(rec.priority.as_str())
            .bind(rec.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Whether an active recommendation already covers (user, type, topic).
    ///
    /// `topic` is part of the dedup key; NULL topics compare equal to each
    /// other (`IS NOT DISTINCT FROM`).
    pub async fn exists_active(
        pool: &PgPool,
        user_id: DbId,
        rec_type: RecommendationType,
        topic: Option<&str>,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS( \
                 SELECT 1 FROM recommendations \
                 WHERE user_id = $1 AND {ACTIVE_PREDICATE} \
                   AND rec_type = $3 AND topic IS NOT DISTINCT FROM $4)"
        );
        sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(now)
            .bind(rec_type.as_str())
            .bind(topic)
            .fetch_one(pool)
            .await
    }

    /// Active recommendations for a user, highest priority first, newest
    /// first within a priority.
    pub async fn list_active(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<Recommendation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recommendations \
             WHERE user_id = $1 AND {ACTIVE_PREDICATE} \
             ORDER BY CASE priority \
                 WHEN 'HIGH' THEN 0 WHEN 'MEDIUM' THEN 1 ELSE 2 END, \
                 created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(user_id)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Find a recommendation by id, regardless of state.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Recommendation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM recommendations WHERE id = $1");
        sqlx::query_as::<_, Recommendation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a recommendation dismissed.
    pub async fn set_dismissed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE recommendations SET is_dismissed = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a recommendation completed.
    pub async fn set_completed(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE recommendations SET is_completed = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
