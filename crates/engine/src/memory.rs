//! In-memory binding of the storage port.
//!
//! Backs the engine's integration tests and embedded/demo deployments with
//! plain `HashMap`/`Vec` tables behind a `tokio::sync::RwLock`. Implements
//! the same contracts as [`crate::pg::PgStore`]: versioned stats saves,
//! at-most-once badge unlock inserts, and deterministic leaderboard
//! ordering (metric descending, id ascending).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use studyforge_core::badge::BadgeRequirement;
use studyforge_core::leaderboard::LeaderboardMetric;
use studyforge_core::mastery::{self, MasteryLevel};
use studyforge_core::recommendation::RecommendationType;
use studyforge_core::types::{DbId, Timestamp};
use studyforge_db::models::badge::{Badge, UserBadge};
use studyforge_db::models::recommendation::{NewRecommendation, Recommendation};
use studyforge_db::models::user_progress::{ProgressDelta, UserProgress};
use studyforge_db::models::user_stats::UserStats;

use crate::leaderboard::metric_value;
use crate::store::{GamificationStore, StoreResult};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    stats: HashMap<DbId, UserStats>,
    badges: Vec<Badge>,
    user_badges: Vec<UserBadge>,
    recommendations: Vec<Recommendation>,
    progress: Vec<UserProgress>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// [`GamificationStore`] over in-memory tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one badge catalog entry.
    pub async fn seed_badge(
        &self,
        code: &str,
        requirement: BadgeRequirement,
        requirement_value: i32,
        xp_reward: i32,
        is_active: bool,
    ) -> Badge {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let badge = Badge {
            id,
            code: code.to_string(),
            name: code.to_string(),
            description: None,
            icon: None,
            color: None,
            category: None,
            rarity: None,
            requirement_type: requirement.as_str().to_string(),
            requirement_value,
            xp_reward,
            is_active,
            created_at: Utc::now(),
        };
        tables.badges.push(badge.clone());
        badge
    }

    /// Create-if-missing and mutate a stats row in place, bypassing the
    /// version cycle. Test/seed helper only.
    pub async fn with_stats<F>(&self, user_id: DbId, mutate: F)
    where
        F: FnOnce(&mut UserStats),
    {
        let mut tables = self.tables.write().await;
        if !tables.stats.contains_key(&user_id) {
            let row = zero_stats(tables.allocate_id(), user_id);
            tables.stats.insert(user_id, row);
        }
        if let Some(row) = tables.stats.get_mut(&user_id) {
            mutate(row);
        }
    }
}

fn zero_stats(id: DbId, user_id: DbId) -> UserStats {
    let now = Utc::now();
    UserStats {
        id,
        user_id,
        total_xp: 0,
        weekly_xp: 0,
        monthly_xp: 0,
        level: 1,
        current_streak: 0,
        longest_streak: 0,
        last_activity_date: None,
        explanations_requested: 0,
        quizzes_completed: 0,
        quizzes_passed: 0,
        flashcards_studied: 0,
        flashcards_mastered: 0,
        focus_sessions_completed: 0,
        total_study_time_minutes: 0,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

fn priority_rank(priority: &str) -> i32 {
    match priority {
        "HIGH" => 0,
        "MEDIUM" => 1,
        _ => 2,
    }
}

#[async_trait]
impl GamificationStore for MemoryStore {
    async fn find_stats(&self, user_id: DbId) -> StoreResult<Option<UserStats>> {
        Ok(self.tables.read().await.stats.get(&user_id).cloned())
    }

    async fn get_or_create_stats(&self, user_id: DbId) -> StoreResult<UserStats> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.stats.get(&user_id) {
            return Ok(existing.clone());
        }
        let row = zero_stats(tables.allocate_id(), user_id);
        tables.stats.insert(user_id, row.clone());
        Ok(row)
    }

    async fn save_stats(&self, stats: &UserStats) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.stats.get_mut(&stats.user_id) else {
            return Ok(false);
        };
        if current.id != stats.id || current.version != stats.version {
            return Ok(false);
        }
        *current = UserStats {
            version: stats.version + 1,
            updated_at: Utc::now(),
            ..stats.clone()
        };
        Ok(true)
    }

    async fn top_stats(
        &self,
        metric: LeaderboardMetric,
        limit: i64,
    ) -> StoreResult<Vec<UserStats>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<UserStats> = tables.stats.values().cloned().collect();
        rows.sort_by_key(|s| (std::cmp::Reverse(metric_value(metric, s)), s.id));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn active_badges(&self) -> StoreResult<Vec<Badge>> {
        let tables = self.tables.read().await;
        let mut badges: Vec<Badge> = tables
            .badges
            .iter()
            .filter(|b| b.is_active)
            .cloned()
            .collect();
        badges.sort_by_key(|b| (b.requirement_value, b.id));
        Ok(badges)
    }

    async fn unlockable_badges(
        &self,
        requirement: BadgeRequirement,
        counter_value: i32,
    ) -> StoreResult<Vec<Badge>> {
        let tables = self.tables.read().await;
        let mut badges: Vec<Badge> = tables
            .badges
            .iter()
            .filter(|b| {
                b.is_active
                    && b.requirement_type == requirement.as_str()
                    && b.requirement_value <= counter_value
            })
            .cloned()
            .collect();
        badges.sort_by_key(|b| (b.requirement_value, b.id));
        Ok(badges)
    }

    async fn try_unlock_badge(
        &self,
        user_id: DbId,
        badge_id: DbId,
        progress_at_unlock: i32,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let already = tables
            .user_badges
            .iter()
            .any(|ub| ub.user_id == user_id && ub.badge_id == badge_id);
        if already {
            return Ok(false);
        }
        let id = tables.allocate_id();
        tables.user_badges.push(UserBadge {
            id,
            user_id,
            badge_id,
            unlocked_at: Utc::now(),
            progress_at_unlock,
            is_new: true,
        });
        Ok(true)
    }

    async fn user_badges(&self, user_id: DbId) -> StoreResult<Vec<UserBadge>> {
        let tables = self.tables.read().await;
        let mut unlocks: Vec<UserBadge> = tables
            .user_badges
            .iter()
            .filter(|ub| ub.user_id == user_id)
            .cloned()
            .collect();
        unlocks.sort_by_key(|ub| (std::cmp::Reverse(ub.unlocked_at), std::cmp::Reverse(ub.id)));
        Ok(unlocks)
    }

    async fn badge_count(&self, user_id: DbId) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_badges
            .iter()
            .filter(|ub| ub.user_id == user_id)
            .count() as i64)
    }

    async fn mark_badges_seen(&self, user_id: DbId) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for ub in tables
            .user_badges
            .iter_mut()
            .filter(|ub| ub.user_id == user_id && ub.is_new)
        {
            ub.is_new = false;
            changed += 1;
        }
        Ok(changed)
    }

    async fn insert_recommendation(
        &self,
        rec: &NewRecommendation,
    ) -> StoreResult<Recommendation> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let row = Recommendation {
            id,
            user_id: rec.user_id,
            rec_type: rec.rec_type.as_str().to_string(),
            title: rec.title.clone(),
            description: rec.description.clone(),
            topic: rec.topic.clone(),
            reason: rec.reason.clone(),
            priority: rec.priority.as_str().to_string(),
            created_at: Utc::now(),
            expires_at: rec.expires_at,
            is_dismissed: false,
            is_completed: false,
        };
        tables.recommendations.push(row.clone());
        Ok(row)
    }

    async fn exists_active_recommendation(
        &self,
        user_id: DbId,
        rec_type: RecommendationType,
        topic: Option<&str>,
        now: Timestamp,
    ) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.recommendations.iter().any(|r| {
            r.user_id == user_id
                && r.rec_type == rec_type.as_str()
                && r.topic.as_deref() == topic
                && r.is_active(now)
        }))
    }

    async fn active_recommendations(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> StoreResult<Vec<Recommendation>> {
        let tables = self.tables.read().await;
        let mut active: Vec<Recommendation> = tables
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id && r.is_active(now))
            .cloned()
            .collect();
        active.sort_by_key(|r| {
            (
                priority_rank(&r.priority),
                std::cmp::Reverse(r.created_at),
                std::cmp::Reverse(r.id),
            )
        });
        Ok(active)
    }

    async fn find_recommendation(&self, id: DbId) -> StoreResult<Option<Recommendation>> {
        let tables = self.tables.read().await;
        Ok(tables.recommendations.iter().find(|r| r.id == id).cloned())
    }

    async fn dismiss_recommendation(&self, id: DbId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(rec) = tables.recommendations.iter_mut().find(|r| r.id == id) {
            rec.is_dismissed = true;
        }
        Ok(())
    }

    async fn complete_recommendation(&self, id: DbId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(rec) = tables.recommendations.iter_mut().find(|r| r.id == id) {
            rec.is_completed = true;
        }
        Ok(())
    }

    async fn user_progress(&self, user_id: DbId) -> StoreResult<Vec<UserProgress>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<UserProgress> = tables
            .progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.topic.cmp(&b.topic));
        Ok(rows)
    }

    async fn merge_progress(
        &self,
        user_id: DbId,
        delta: &ProgressDelta,
        now: Timestamp,
    ) -> StoreResult<UserProgress> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .progress
            .iter()
            .position(|p| p.user_id == user_id && p.topic == delta.topic);

        let merged = match existing {
            Some(index) => {
                let row = &mut tables.progress[index];
                row.quiz_completed += 1;
                row.total_questions += delta.total_questions;
                row.correct_answers += delta.correct_answers;
                row.average_score = mastery::average_score(row.correct_answers, row.total_questions);
                row.mastery_level = MasteryLevel::from_average_score(row.average_score)
                    .as_str()
                    .to_string();
                if row.subject.is_none() {
                    row.subject = delta.subject.clone();
                }
                row.last_activity_at = now;
                row.clone()
            }
            None => {
                let average = mastery::average_score(delta.correct_answers, delta.total_questions);
                let id = tables.allocate_id();
                let row = UserProgress {
                    id,
                    user_id,
                    topic: delta.topic.clone(),
                    subject: delta.subject.clone(),
                    quiz_completed: 1,
                    total_questions: delta.total_questions,
                    correct_answers: delta.correct_answers,
                    average_score: average,
                    mastery_level: MasteryLevel::from_average_score(average).as_str().to_string(),
                    last_activity_at: now,
                };
                tables.progress.push(row.clone());
                row
            }
        };
        Ok(merged)
    }
}
