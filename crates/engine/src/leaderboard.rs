//! Leaderboard ranker (PRD-09).

use std::sync::Arc;

use studyforge_core::leaderboard::{clamp_limit, LeaderboardMetric, RANK_CANDIDATE_LIMIT};
use studyforge_core::types::DbId;
use studyforge_db::models::user_stats::UserStats;

use crate::error::EngineResult;
use crate::store::GamificationStore;
use crate::views::RankedEntry;

/// The stat value a leaderboard metric reads off a stats row.
pub fn metric_value(metric: LeaderboardMetric, stats: &UserStats) -> i32 {
    match metric {
        LeaderboardMetric::TotalXp => stats.total_xp,
        LeaderboardMetric::WeeklyXp => stats.weekly_xp,
        LeaderboardMetric::Streak => stats.current_streak,
        LeaderboardMetric::Level => stats.level,
    }
}

/// Read-only ranked views over all users' stats.
pub struct LeaderboardRanker {
    store: Arc<dyn GamificationStore>,
}

impl LeaderboardRanker {
    pub fn new(store: Arc<dyn GamificationStore>) -> Self {
        Self { store }
    }

    /// Top entries by a metric, descending; ties break by stats row id
    /// (store contract), so rankings are reproducible.
    pub async fn top_by_metric(
        &self,
        metric: LeaderboardMetric,
        limit: Option<i64>,
    ) -> EngineResult<Vec<RankedEntry>> {
        let rows = self.store.top_stats(metric, clamp_limit(limit)).await?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, stats)| RankedEntry {
                rank: index as u32 + 1,
                user_id: stats.user_id,
                value: metric_value(metric, stats),
                level: stats.level,
            })
            .collect())
    }

    /// 1-based position of a user within the top candidate set
    /// ([`RANK_CANDIDATE_LIMIT`]); `None` when the user sits outside it.
    pub async fn rank_of(
        &self,
        user_id: DbId,
        metric: LeaderboardMetric,
    ) -> EngineResult<Option<u32>> {
        let rows = self.store.top_stats(metric, RANK_CANDIDATE_LIMIT).await?;
        Ok(rows
            .iter()
            .position(|stats| stats.user_id == user_id)
            .map(|index| index as u32 + 1))
    }
}
