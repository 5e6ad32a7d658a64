//! Storage port for the gamification engine.
//!
//! The engine never touches a database directly; every read and write goes
//! through [`GamificationStore`]. Production binds the port to PostgreSQL
//! ([`crate::pg::PgStore`]); tests bind it to
//! [`crate::memory::MemoryStore`]. Collaborator data the engine only
//! consumes — the badge catalog and per-topic progress — comes in through
//! the same port.

use async_trait::async_trait;
use studyforge_core::badge::BadgeRequirement;
use studyforge_core::leaderboard::LeaderboardMetric;
use studyforge_core::recommendation::RecommendationType;
use studyforge_core::types::{DbId, Timestamp};
use studyforge_db::models::badge::{Badge, UserBadge};
use studyforge_db::models::recommendation::{NewRecommendation, Recommendation};
use studyforge_db::models::user_progress::{ProgressDelta, UserProgress};
use studyforge_db::models::user_stats::UserStats;

/// A persistence failure surfaced by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store (or one collaborator table) is unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for store method results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the engine depends on.
///
/// Contracts the implementations must honor:
/// - `get_or_create_stats` never fails because the row is missing; the
///   zero-value record is created on demand.
/// - `save_stats` carries the version the caller read and reports `false`
///   on a version conflict instead of overwriting.
/// - `try_unlock_badge` inserts at most one record per (user, badge) and
///   reports whether this call inserted it.
/// - `top_stats` orders descending by the metric, ascending by stats id on
///   ties (deterministic for a fixed data set).
#[async_trait]
pub trait GamificationStore: Send + Sync {
    // -- user stats --

    async fn find_stats(&self, user_id: DbId) -> StoreResult<Option<UserStats>>;
    async fn get_or_create_stats(&self, user_id: DbId) -> StoreResult<UserStats>;
    async fn save_stats(&self, stats: &UserStats) -> StoreResult<bool>;
    async fn top_stats(
        &self,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<UserStats>>;

    // -- badge catalog (read-only) --

    async fn active_badges(&self) -> StoreResult<Vec<Badge>>;
    async fn unlockable_badges(
        &self,
        requirement: BadgeRequirement,
        counter_value: i32,
    ) -> StoreResult<Vec<Badge>>;

    // -- user badges --

    async fn try_unlock_badge(
        &self,
        user_id: DbId,
        badge_id: DbId,
        progress_at_unlock: i32,
    ) -> StoreResult<bool>;
    async fn user_badges(&self, user_id: DbId) -> StoreResult<Vec<UserBadge>>;
    async fn badge_count(&self, user_id: DbId) -> StoreResult<i64>;
    async fn mark_badges_seen(&self, user_id: DbId) -> StoreResult<u64>;

    // -- recommendations --

    async fn insert_recommendation(
        &self,
        rec: &NewRecommendation,
    ) -> StoreResult<Recommendation>;
    async fn exists_active_recommendation(
        &self,
        user_id: DbId,
        rec_type: RecommendationType,
        topic: Option<&str>,
        now: Timestamp,
    ) -> StoreResult<bool>;
    async fn active_recommendations(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> StoreResult<Vec<Recommendation>>;
    async fn find_recommendation(&self, id: DbId) -> StoreResult<Option<Recommendation>>;
    async fn dismiss_recommendation(&self, id: DbId) -> StoreResult<()>;
    async fn complete_recommendation(&self, id: DbId) -> StoreResult<()>;

    // -- per-topic progress --

    async fn user_progress(&self, user_id: DbId) -> StoreResult<Vec<UserProgress>>;
    async fn merge_progress(
        &self,
        user_id: DbId,
        delta: &ProgressDelta,
        now: Timestamp,
    ) -> StoreResult<UserProgress>;
}
