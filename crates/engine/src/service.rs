//! Stats aggregator and public engine surface (PRD-06).
//!
//! One entry point per reported event kind, all funneling into
//! [`GamificationService::apply_event`]: counters, streak, XP, level, and
//! the badge unlock pass execute as one per-user critical section and
//! persist with a single versioned save.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use studyforge_core::error::CoreError;
use studyforge_core::leaderboard::LeaderboardMetric;
use studyforge_core::leveling::LevelCurve;
use studyforge_core::streak;
use studyforge_core::types::DbId;
use studyforge_core::xp::{self, LearningEvent};
use studyforge_db::models::recommendation::Recommendation;
use studyforge_db::models::user_progress::ProgressDelta;

use crate::badges;
use crate::error::EngineResult;
use crate::leaderboard::LeaderboardRanker;
use crate::locks::UserLocks;
use crate::recommend::RecommendationGenerator;
use crate::store::GamificationStore;
use crate::views::{BadgeView, RankedEntry, RecommendationView, UserStatsView, XpEventResult};

/// Quiz completion report from the quiz collaborator. Score fields are
/// optional; when topic and question totals are all present the event also
/// merges the per-topic progress aggregate.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct QuizReport {
    pub passed: bool,
    pub topic: Option<String>,
    pub subject: Option<String>,
    pub score: Option<f64>,
    pub total_questions: Option<i32>,
    pub correct_answers: Option<i32>,
}

/// The engine facade collaborators talk to.
pub struct GamificationService {
    store: Arc<dyn GamificationStore>,
    curve: LevelCurve,
    locks: UserLocks,
    recommender: RecommendationGenerator,
    ranker: LeaderboardRanker,
}

impl GamificationService {
    pub fn new(store: Arc<dyn GamificationStore>) -> Self {
        Self::with_curve(store, LevelCurve::default())
    }

    /// Construct with a non-default leveling curve.
    pub fn with_curve(store: Arc<dyn GamificationStore>, curve: LevelCurve) -> Self {
        Self {
            recommender: RecommendationGenerator::new(Arc::clone(&store)),
            ranker: LeaderboardRanker::new(Arc::clone(&store)),
            locks: UserLocks::new(),
            curve,
            store,
        }
    }

    // -- event reporting -----------------------------------------------------

    pub async fn report_explanation(
        &self,
        user_id: DbId,
        topic: Option<String>,
        subject: Option<String>,
    ) -> EngineResult<XpEventResult> {
        self.apply_event(user_id, LearningEvent::Explanation { topic, subject })
            .await
    }

    pub async fn report_quiz_completion(
        &self,
        user_id: DbId,
        report: QuizReport,
    ) -> EngineResult<XpEventResult> {
        self.apply_event(
            user_id,
            LearningEvent::QuizCompleted {
                passed: report.passed,
                topic: report.topic,
                subject: report.subject,
                score: report.score,
                total_questions: report.total_questions,
                correct_answers: report.correct_answers,
            },
        )
        .await
    }

    pub async fn report_flashcards_studied(
        &self,
        user_id: DbId,
        card_count: i32,
        mastered_count: i32,
    ) -> EngineResult<XpEventResult> {
        self.apply_event(
            user_id,
            LearningEvent::FlashcardsStudied {
                card_count,
                mastered_count,
            },
        )
        .await
    }

    pub async fn report_focus_session(
        &self,
        user_id: DbId,
        duration_minutes: i32,
        xp_to_award: i32,
    ) -> EngineResult<XpEventResult> {
        self.apply_event(
            user_id,
            LearningEvent::FocusSession {
                duration_minutes,
                xp_to_award,
            },
        )
        .await
    }

    /// Apply one learning event: validate, then — under the user's lock —
    /// bump counters, update the streak, add XP, recompute the level, run
    /// the badge unlock pass, and persist the stats row once.
    ///
    /// The returned totals include badge bonus XP; `xp_earned` is the base
    /// award only.
    pub async fn apply_event(
        &self,
        user_id: DbId,
        event: LearningEvent,
    ) -> EngineResult<XpEventResult> {
        xp::validate(&event)?;

        let _guard = self.locks.acquire(user_id).await;

        let mut stats = self.store.get_or_create_stats(user_id).await?;
        let level_before = stats.level;

        // 1. Counters.
        match &event {
            LearningEvent::Explanation { .. } => {
                stats.explanations_requested += 1;
            }
            LearningEvent::QuizCompleted { passed, .. } => {
                stats.quizzes_completed += 1;
                if *passed {
                    stats.quizzes_passed += 1;
                }
            }
            LearningEvent::FlashcardsStudied {
                card_count,
                mastered_count,
            } => {
                stats.flashcards_studied += card_count;
                stats.flashcards_mastered += mastered_count;
            }
            LearningEvent::FocusSession {
                duration_minutes, ..
            } => {
                stats.focus_sessions_completed += 1;
                stats.total_study_time_minutes += duration_minutes;
            }
        }

        // 2. Streak.
        let today = Utc::now().date_naive();
        let update = streak::update(
            stats.last_activity_date,
            stats.current_streak,
            stats.longest_streak,
            today,
        );
        stats.current_streak = update.current_streak;
        stats.longest_streak = update.longest_streak;
        stats.last_activity_date = Some(update.last_activity_date);

        // 3. Base XP and level.
        let xp_earned = event.base_award();
        stats.add_xp(xp_earned);
        stats.level = self.curve.level_for_xp(stats.total_xp).level;

        // 4. Badge pass; bonuses land on the totals, level recomputed once.
        let new_badges = badges::check_and_unlock(self.store.as_ref(), user_id, &mut stats).await;
        stats.level = self.curve.level_for_xp(stats.total_xp).level;
        let leveled_up = stats.level > level_before;

        // 5. Persist once.
        if !self.store.save_stats(&stats).await? {
            return Err(CoreError::Conflict(format!(
                "Concurrent stats update for user {user_id}"
            ))
            .into());
        }

        // Scoring side effect: merge the per-topic aggregate when the quiz
        // carried topic and question totals. Isolated — the event already
        // counted.
        if let LearningEvent::QuizCompleted {
            topic: Some(topic),
            subject,
            total_questions: Some(total_questions),
            correct_answers: Some(correct_answers),
            ..
        } = &event
        {
            let delta = ProgressDelta {
                topic: topic.clone(),
                subject: subject.clone(),
                total_questions: *total_questions,
                correct_answers: *correct_answers,
            };
            if let Err(err) = self.store.merge_progress(user_id, &delta, Utc::now()).await {
                tracing::warn!(user_id, topic = %topic, error = %err, "Progress merge failed");
            }
        }

        tracing::info!(
            user_id,
            event = ?event.kind(),
            xp_earned,
            total_xp = stats.total_xp,
            level = stats.level,
            new_badges = new_badges.len(),
            "Event applied",
        );

        Ok(XpEventResult {
            event: event.kind(),
            xp_earned,
            total_xp: stats.total_xp,
            level: stats.level,
            leveled_up,
            new_badges,
        })
    }

    // -- stats ---------------------------------------------------------------

    /// Stats read model; the zero-value row is created on first access.
    pub async fn get_stats(&self, user_id: DbId) -> EngineResult<UserStatsView> {
        let stats = self.store.get_or_create_stats(user_id).await?;
        let badges_unlocked = self.store.badge_count(user_id).await?;
        let info = self.curve.level_for_xp(stats.total_xp);
        Ok(UserStatsView {
            user_id: stats.user_id,
            total_xp: stats.total_xp,
            weekly_xp: stats.weekly_xp,
            monthly_xp: stats.monthly_xp,
            level: stats.level,
            level_progress: info.progress_percent,
            xp_for_next_level: info.xp_for_next_level,
            current_streak: stats.current_streak,
            longest_streak: stats.longest_streak,
            last_activity_date: stats.last_activity_date,
            explanations_requested: stats.explanations_requested,
            quizzes_completed: stats.quizzes_completed,
            quizzes_passed: stats.quizzes_passed,
            flashcards_studied: stats.flashcards_studied,
            flashcards_mastered: stats.flashcards_mastered,
            focus_sessions_completed: stats.focus_sessions_completed,
            total_study_time_minutes: stats.total_study_time_minutes,
            badges_unlocked,
        })
    }

    // -- badges --------------------------------------------------------------

    /// Every active catalog badge with the user's unlock state and live
    /// progress. Unlocked badges report 100% regardless of the counter's
    /// current value (streaks can fall after the unlock).
    pub async fn get_badges(&self, user_id: DbId) -> EngineResult<Vec<BadgeView>> {
        let catalog = self.store.active_badges().await?;
        let stats = self.store.get_or_create_stats(user_id).await?;
        let counters = stats.counters();
        let unlocked: HashMap<DbId, _> = self
            .store
            .user_badges(user_id)
            .await?
            .into_iter()
            .map(|ub| (ub.badge_id, ub))
            .collect();

        Ok(catalog
            .into_iter()
            .map(|badge| {
                let unlock = unlocked.get(&badge.id);
                let progress_percent = match unlock {
                    Some(_) => 100.0,
                    None => badges::progress_for(&badge, &counters),
                };
                BadgeView {
                    unlocked: unlock.is_some(),
                    unlocked_at: unlock.map(|ub| ub.unlocked_at),
                    is_new: unlock.is_some_and(|ub| ub.is_new),
                    progress_percent,
                    id: badge.id,
                    code: badge.code,
                    name: badge.name,
                    description: badge.description,
                    icon: badge.icon,
                    color: badge.color,
                    category: badge.category,
                    rarity: badge.rarity,
                    requirement_type: badge.requirement_type,
                    requirement_value: badge.requirement_value,
                    xp_reward: badge.xp_reward,
                }
            })
            .collect())
    }

    /// Unlocked badges the user has not seen yet.
    pub async fn get_new_badges(&self, user_id: DbId) -> EngineResult<Vec<BadgeView>> {
        let badges = self.get_badges(user_id).await?;
        Ok(badges.into_iter().filter(|b| b.is_new).collect())
    }

    /// Flip the unseen flag on every unlock of the user.
    pub async fn mark_badges_seen(&self, user_id: DbId) -> EngineResult<()> {
        self.store.mark_badges_seen(user_id).await?;
        Ok(())
    }

    // -- recommendations -----------------------------------------------------

    /// Run the generator; returns only the recommendations it created.
    pub async fn generate_recommendations(
        &self,
        user_id: DbId,
    ) -> EngineResult<Vec<Recommendation>> {
        self.recommender.generate(user_id).await
    }

    /// Active (not dismissed, not completed, not expired) recommendations,
    /// highest priority first.
    pub async fn get_active_recommendations(
        &self,
        user_id: DbId,
    ) -> EngineResult<Vec<RecommendationView>> {
        let active = self
            .store
            .active_recommendations(user_id, Utc::now())
            .await?;
        Ok(active
            .into_iter()
            .map(|rec| RecommendationView {
                id: rec.id,
                rec_type: rec.rec_type,
                title: rec.title,
                description: rec.description,
                topic: rec.topic,
                reason: rec.reason,
                priority: rec.priority,
                created_at: rec.created_at,
                expires_at: rec.expires_at,
            })
            .collect())
    }

    pub async fn dismiss_recommendation(&self, id: DbId, user_id: DbId) -> EngineResult<()> {
        self.authorize_recommendation(id, user_id).await?;
        self.store.dismiss_recommendation(id).await?;
        Ok(())
    }

    pub async fn complete_recommendation(&self, id: DbId, user_id: DbId) -> EngineResult<()> {
        self.authorize_recommendation(id, user_id).await?;
        self.store.complete_recommendation(id).await?;
        Ok(())
    }

    /// The recommendation must exist and belong to the acting user.
    async fn authorize_recommendation(&self, id: DbId, user_id: DbId) -> EngineResult<()> {
        let rec = self
            .store
            .find_recommendation(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "recommendation",
                id,
            })?;
        if rec.user_id != user_id {
            return Err(CoreError::Unauthorized(format!(
                "Recommendation {id} belongs to another user"
            ))
            .into());
        }
        Ok(())
    }

    // -- leaderboards --------------------------------------------------------

    pub async fn get_leaderboard(
        &self,
        metric: LeaderboardMetric,
        limit: Option<i64>,
    ) -> EngineResult<Vec<RankedEntry>> {
        self.ranker.top_by_metric(metric, limit).await
    }

    /// 1-based rank within the bounded candidate set; `None` outside it.
    pub async fn get_user_rank(
        &self,
        user_id: DbId,
        metric: LeaderboardMetric,
    ) -> EngineResult<Option<u32>> {
        self.ranker.rank_of(user_id, metric).await
    }
}
