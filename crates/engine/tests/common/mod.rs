//! Shared helpers for engine integration tests.
//!
//! All scenarios run against [`MemoryStore`], which implements the same
//! store contracts as the PostgreSQL binding.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use studyforge_core::badge::BadgeRequirement;
use studyforge_core::leaderboard::LeaderboardMetric;
use studyforge_core::recommendation::RecommendationType;
use studyforge_core::types::{DbId, Timestamp};
use studyforge_db::models::badge::{Badge, UserBadge};
use studyforge_db::models::recommendation::{NewRecommendation, Recommendation};
use studyforge_db::models::user_progress::{ProgressDelta, UserProgress};
use studyforge_db::models::user_stats::UserStats;
use studyforge_engine::memory::MemoryStore;
use studyforge_engine::store::{GamificationStore, StoreError, StoreResult};
use studyforge_engine::GamificationService;

/// A service over a fresh in-memory store. The store handle is returned
/// too, for seeding catalog rows and stats fixtures.
pub fn service() -> (Arc<MemoryStore>, GamificationService) {
    let store = Arc::new(MemoryStore::new());
    let service = GamificationService::new(store.clone());
    (store, service)
}

/// Store fake whose per-topic progress reads always fail, for exercising
/// the generator's failure isolation. Everything else delegates to the
/// wrapped [`MemoryStore`].
pub struct FailingProgressStore {
    pub inner: MemoryStore,
}

impl FailingProgressStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl GamificationStore for FailingProgressStore {
    async fn find_stats(&self, user_id: DbId) -> StoreResult<Option<UserStats>> {
        self.inner.find_stats(user_id).await
    }

    async fn get_or_create_stats(&self, user_id: DbId) -> StoreResult<UserStats> {
        self.inner.get_or_create_stats(user_id).await
    }

    async fn save_stats(&self, stats: &UserStats) -> StoreResult<bool> {
        self.inner.save_stats(stats).await
    }

    async fn top_stats(
        &self,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<UserStats>> {
        self.inner.top_stats(metric, limit).await
    }

    async fn active_badges(&self) -> StoreResult<Vec<Badge>> {
        self.inner.active_badges().await
    }

    async fn unlockable_badges(
        &self,
        requirement: BadgeRequirement,
        counter_value: i32,
    ) -> StoreResult<Vec<Badge>> {
        self.inner.unlockable_badges(requirement, counter_value).await
    }

    async fn try_unlock_badge(
        &self,
        user_id: DbId,
        badge_id: DbId,
        progress_at_unlock: i32,
    ) -> StoreResult<bool> {
        self.inner
            .try_unlock_badge(user_id, badge_id, progress_at_unlock)
            .await
    }

    async fn user_badges(&self, user_id: DbId) -> StoreResult<Vec<UserBadge>> {
        self.inner.user_badges(user_id).await
    }

    async fn badge_count(&self, user_id: DbId) -> StoreResult<i64> {
        self.inner.badge_count(user_id).await
    }

    async fn mark_badges_seen(&self, user_id: DbId) -> StoreResult<u64> {
        self.inner.mark_badges_seen(user_id).await
    }

    async fn insert_recommendation(
        &self,
        rec: &NewRecommendation,
    ) -> StoreResult<Recommendation> {
        self.inner.insert_recommendation(rec).await
    }

    async fn exists_active_recommendation(
        &self,
        user_id: DbId,
        rec_type: RecommendationType,
        topic: Option<&str>,
        now: Timestamp,
    ) -> StoreResult<bool> {
        self.inner
            .exists_active_recommendation(user_id, rec_type, topic, now)
            .await
    }

    async fn active_recommendations(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> StoreResult<Vec<Recommendation>> {
        self.inner.active_recommendations(user_id, now).await
    }

    async fn find_recommendation(&self, id: DbId) -> StoreResult<Option<Recommendation>> {
        self.inner.find_recommendation(id).await
    }

    async fn dismiss_recommendation(&self, id: DbId) -> StoreResult<()> {
        self.inner.dismiss_recommendation(id).await
    }

    async fn complete_recommendation(&self, id: DbId) -> StoreResult<()> {
        self.inner.complete_recommendation(id).await
    }

    async fn user_progress(&self, _user_id: DbId) -> StoreResult<Vec<UserProgress>> {
        Err(StoreError::Unavailable(
            "progress reads disabled for this test".to_string(),
        ))
    }

    async fn merge_progress(
        &self,
        user_id: DbId,
        delta: &ProgressDelta,
        now: Timestamp,
    ) -> StoreResult<UserProgress> {
        self.inner.merge_progress(user_id, delta, now).await
    }
}
