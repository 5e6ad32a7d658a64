//! PostgreSQL binding of the storage port.
//!
//! Thin delegation to the `studyforge-db` repositories; no logic of its
//! own beyond error conversion.

use async_trait::async_trait;
use studyforge_core::badge::BadgeRequirement;
use studyforge_core::leaderboard::LeaderboardMetric;
use studyforge_core::recommendation::RecommendationType;
use studyforge_core::types::{DbId, Timestamp};
use studyforge_db::models::badge::{Badge, UserBadge};
use studyforge_db::models::recommendation::{NewRecommendation, Recommendation};
use studyforge_db::models::user_progress::{ProgressDelta, UserProgress};
use studyforge_db::models::user_stats::UserStats;
use studyforge_db::repositories::{
    BadgeRepo, RecommendationRepo, UserBadgeRepo, UserProgressRepo, UserStatsRepo,
};
use studyforge_db::DbPool;

use crate::store::{GamificationStore, StoreResult};

/// [`GamificationStore`] backed by a PostgreSQL pool.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GamificationStore for PgStore {
    async fn find_stats(&self, user_id: DbId) -> StoreResult<Option<UserStats>> {
        Ok(UserStatsRepo::find_by_user(&self.pool, user_id).await?)
    }

    async fn get_or_create_stats(&self, user_id: DbId) -> StoreResult<UserStats> {
        Ok(UserStatsRepo::get_or_create(&self.pool, user_id).await?)
    }

    async fn save_stats(&self, stats: &UserStats) -> StoreResult<bool> {
        Ok(UserStatsRepo::save(&self.pool, stats).await?)
    }

    async fn top_stats(
        &self,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<UserStats>> {
        Ok(UserStatsRepo::top_by_metric(&self.pool, metric, limit).await?)
    }

    async fn active_badges(&self) -> StoreResult<Vec<Badge>> {
        Ok(BadgeRepo::list_active(&self.pool).await?)
    }

    async fn unlockable_badges(
        &self,
        requirement: BadgeRequirement,
        counter_value: i32,
    ) -> StoreResult<Vec<Badge>> {
        Ok(BadgeRepo::unlockable(&self.pool, requirement, counter_value).await?)
    }

    async fn try_unlock_badge(
        &self,
        user_id: DbId,
        badge_id: DbId,
        progress_at_unlock: i32,
    ) -> StoreResult<bool> {
        Ok(UserBadgeRepo::try_unlock(&self.pool, user_id, badge_id, progress_at_unlock).await?)
    }

    async fn user_badges(&self, user_id: DbId) -> StoreResult<Vec<UserBadge>> {
        Ok(UserBadgeRepo::list_for_user(&self.pool, user_id).await?)
    }

    async fn badge_count(&self, user_id: DbId) -> StoreResult<i64> {
        Ok(UserBadgeRepo::count_for_user(&self.pool, user_id).await?)
    }

    async fn mark_badges_seen(&self, user_id: DbId) -> StoreResult<u64> {
        Ok(UserBadgeRepo::mark_all_seen(&self.pool, user_id).await?)
    }

    async fn insert_recommendation(
        &self,
        rec: &NewRecommendation,
    ) -> StoreResult<Recommendation> {
        Ok(RecommendationRepo::insert(&self.pool, rec).await?)
    }

    async fn exists_active_recommendation(
        &self,
        user_id: DbId,
        rec_type: RecommendationType,
        topic: Option<&str>,
        now: Timestamp,
    ) -> StoreResult<bool> {
        Ok(RecommendationRepo::exists_active(&self.pool, user_id, rec_type, topic, now).await?)
    }

    async fn active_recommendations(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> StoreResult<Vec<Recommendation>> {
        Ok(RecommendationRepo::list_active(&self.pool, user_id, now).await?)
    }

    async fn find_recommendation(&self, id: DbId) -> StoreResult<Option<Recommendation>> {
        Ok(RecommendationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn dismiss_recommendation(&self, id: DbId) -> StoreResult<()> {
        Ok(RecommendationRepo::set_dismissed(&self.pool, id).await?)
    }

    async fn complete_recommendation(&self, id: DbId) -> StoreResult<()> {
        Ok(RecommendationRepo::set_completed(&self.pool, id).await?)
    }

    async fn user_progress(&self, user_id: DbId) -> StoreResult<Vec<UserProgress>> {
        Ok(UserProgressRepo::list_for_user(&self.pool, user_id).await?)
    }

    async fn merge_progress(
        &self,
        user_id: DbId,
        delta: &ProgressDelta,
        now: Timestamp,
    ) -> StoreResult<UserProgress> {
        Ok(UserProgressRepo::merge(&self.pool, user_id, delta, now).await?)
    }
}
