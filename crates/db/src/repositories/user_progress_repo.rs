//! Repository for the `user_progress` table (PRD-08).

use sqlx::PgPool;
use studyforge_core::mastery::{self, MasteryLevel};
use studyforge_core::types::{DbId, Timestamp};

use crate::models::user_progress::{ProgressDelta, UserProgress};

/// Column list for `user_progress` queries.
const COLUMNS: &str = "id, user_id, topic, subject, quiz_completed, total_questions, \
    correct_answers, average_score, mastery_level, last_activity_at";

/// Per-topic mastery aggregates, merged on every scored quiz.
pub struct UserProgressRepo;

impl UserProgressRepo {
    /// All topic aggregates for a user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_progress \
             WHERE user_id = $1 \
             ORDER BY topic ASC"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Merge one scored quiz into the (user, topic) aggregate.
    ///
    /// The row is locked for the read-compute-write cycle so two racing
    /// merges cannot drop each other's totals. The average and mastery
    /// tier are recomputed from the merged totals.
    pub async fn merge(
        pool: &PgPool,
        user_id: DbId,
        delta: &ProgressDelta,
        now: Timestamp,
    ) -> Result<UserProgress, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {COLUMNS} FROM user_progress \
             WHERE user_id = $1 AND topic = $2 \
             FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, UserProgress>(&select)
            .bind(user_id)
            .bind(&delta.topic)
            .fetch_optional(&mut *tx)
            .await?;

        let (quiz_completed, total_questions, correct_answers) = match &existing {
            Some(row) => (
                row.quiz_completed + 1,
                row.total_questions + delta.total_questions,
                row.correct_answers + delta.correct_answers,
            ),
            None => (1, delta.total_questions, delta.correct_answers),
        };
        let average = mastery::average_score(correct_answers, total_questions);
        let tier = MasteryLevel::from_average_score(average);

        let upsert = format!(
            "INSERT INTO user_progress \
                 (user_id, topic, subject, quiz_completed, total_questions, \
                  correct_answers, average_score, mastery_level, last_activity_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (user_id, topic) DO UPDATE SET \
                 subject = COALESCE(EXCLUDED.subject, user_progress.subject), \
                 quiz_completed = EXCLUDED.quiz_completed, \
                 total_questions = EXCLUDED.total_questions, \
                 correct_answers = EXCLUDED.correct_answers, \
                 average_score = EXCLUDED.average_score, \
                 mastery_level = EXCLUDED.mastery_level, \
                 last_activity_at = EXCLUDED.last_activity_at \
             RETURNING {COLUMNS}"
        );
        let merged = sqlx::query_as::<_, UserProgress>(&upsert)
            .bind(user_id)
            .bind(&delta.topic)
            .bind(&delta.subject)
            .bind(quiz_completed)
            .bind(total_questions)
            .bind(correct_answers)
            .bind(average)
            .bind(tier.as_str())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(merged)
    }
}
