//! Repository for the `user_stats` table (PRD-06).

use sqlx::PgPool;
use studyforge_core::leaderboard::LeaderboardMetric;
use studyforge_core::types::DbId;

use crate::models::user_stats::UserStats;

/// Column list for `user_stats` queries.
const COLUMNS: &str = "id, user_id, total_xp, weekly_xp, monthly_xp, level, \
    current_streak, longest_streak, last_activity_date, explanations_requested, \
    quizzes_completed, quizzes_passed, flashcards_studied, flashcards_mastered, \
    focus_sessions_completed, total_study_time_minutes, version, created_at, updated_at";

/// Provides reads and the versioned read-modify-write cycle for user stats.
pub struct UserStatsRepo;

impl UserStatsRepo {
    /// Find a user's stats row.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<UserStats>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_stats WHERE user_id = $1");
        sqlx::query_as::<_, UserStats>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Get a user's stats row, creating the zero-value record if missing.
    ///
    /// The insert ignores conflicts so two racing first events both end up
    /// reading the single surviving row.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserStats, sqlx::Error> {
        sqlx::query("INSERT INTO user_stats (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await?;

        let query = format!("SELECT {COLUMNS} FROM user_stats WHERE user_id = $1");
        sqlx::query_as::<_, UserStats>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Persist a mutated stats row.
    ///
    /// Carries the version the caller read; returns `false` when another
    /// writer bumped it first (the caller surfaces a conflict instead of
    /// silently losing the other writer's update).
    pub async fn save(pool: &PgPool, stats: &UserStats) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_stats SET \
                 total_xp = $1, weekly_xp = $2, monthly_xp = $3, level = $4, \
                 current_streak = $5, longest_streak = $6, last_activity_date = $7, \
                 explanations_requested = $8, quizzes_completed = $9, quizzes_passed = $10, \
                 flashcards_studied = $11, flashcards_mastered = $12, \
                 focus_sessions_completed = $13, total_study_time_minutes = $14, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $15 AND version = $16",
        )
        .bind(stats.total_xp)
        .bind(stats.weekly_xp)
        .bind(stats.monthly_xp)
        .bind(stats.level)
        .bind(stats.current_streak)
        .bind(stats.longest_streak)
        .bind(stats.last_activity_date)
        .bind(stats.explanations_requested)
        .bind(stats.quizzes_completed)
        .bind(stats.quizzes_passed)
        .bind(stats.flashcards_studied)
        .bind(stats.flashcards_mastered)
        .bind(stats.focus_sessions_completed)
        .bind(stats.total_study_time_minutes)
        .bind(stats.id)
        .bind(stats.version)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Top stats rows by a leaderboard metric.
    ///
    /// Ties break by ascending id (insertion order), keeping rankings
    /// deterministic for a fixed data set.
    pub async fn top_by_metric(
        pool: &PgPool,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> Result<Vec<UserStats>, sqlx::Error> {
        let order_column = match metric {
            LeaderboardMetric::TotalXp => "total_xp",
            LeaderboardMetric::WeeklyXp => "weekly_xp",
            LeaderboardMetric::Streak => "current_streak",
            LeaderboardMetric::Level => "level",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM user_stats \
             ORDER BY {order_column} DESC, id ASC \
             LIMIT $1"
        );
        sqlx::query_as::<_, UserStats>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
