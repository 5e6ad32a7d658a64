//! Rule-based recommendation generator (PRD-08).
//!
//! Each rule is gated by a dedup check: while an active recommendation of
//! the same (type, topic) exists, the rule is skipped. Rules that depend on
//! per-topic progress are isolated from the rest — a failed progress read
//! still lets the stats-only rules run.

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc, Weekday};
use studyforge_core::recommendation::{
    in_continue_band, review_priority, RecPriority, RecommendationType, CHALLENGE_SCORE,
    EXPIRY_DAYS, MILESTONE_QUIZZES, MIN_DISTINCT_TOPICS, MIN_STUDY_MINUTES,
    OVERALL_AVERAGE_TARGET, RECENT_TOPIC_WINDOW_DAYS, REVIEW_AFTER_DAYS, WEAK_TOPIC_SCORE,
    WEEKLY_XP_GOAL,
};
use studyforge_core::types::{DbId, Timestamp};
use studyforge_db::models::recommendation::{NewRecommendation, Recommendation};
use studyforge_db::models::user_progress::UserProgress;

use crate::error::EngineResult;
use crate::store::GamificationStore;

/// Generates a user's recommendation set from their stats and per-topic
/// progress. Already-active recommendations are left untouched.
pub struct RecommendationGenerator {
    store: Arc<dyn GamificationStore>,
}

impl RecommendationGenerator {
    pub fn new(store: Arc<dyn GamificationStore>) -> Self {
        Self { store }
    }

    /// Evaluate every rule and return the recommendations newly created by
    /// this call.
    pub async fn generate(&self, user_id: DbId) -> EngineResult<Vec<Recommendation>> {
        let now = Utc::now();
        let today = now.date_naive();
        let stats = self.store.get_or_create_stats(user_id).await?;
        let mut created = Vec::new();

        // 1. Streak at risk: active streak, nothing counted today yet.
        if stats.current_streak > 0 && stats.last_activity_date.is_some_and(|d| d < today) {
            self.try_create(
                user_id,
                RecommendationType::StreakReminder,
                format!("Keep your {} day streak alive", stats.current_streak),
                "One study activity today keeps your streak going.".to_string(),
                None,
                "No activity counted today yet".to_string(),
                RecPriority::High,
                now,
                &mut created,
            )
            .await;
        }

        // Topic rules need the progress collaborator; when it is down the
        // stats-only rules below must still run.
        match self.store.user_progress(user_id).await {
            Ok(progress) => {
                self.topic_rules(user_id, &progress, now, &mut created).await;
            }
            Err(err) => {
                tracing::warn!(
                    user_id,
                    error = %err,
                    "Progress read failed; skipping topic rules",
                );
            }
        }

        // 7. Not enough total study time yet.
        if stats.total_study_time_minutes < MIN_STUDY_MINUTES {
            self.try_create(
                user_id,
                RecommendationType::StudyMore,
                "Build up your study time".to_string(),
                "You have studied less than an hour in total. Even 15 minutes a day adds up."
                    .to_string(),
                None,
                format!("Total study time below {MIN_STUDY_MINUTES} minutes"),
                RecPriority::Low,
                now,
                &mut created,
            )
            .await;
        }

        // 9. Weekly XP behind the daily goal pace.
        if stats.weekly_xp < WEEKLY_XP_GOAL {
            self.try_create(
                user_id,
                RecommendationType::DailyGoal,
                format!("Reach {WEEKLY_XP_GOAL} XP today"),
                "Complete a few activities to hit your goal.".to_string(),
                None,
                "Earning XP levels you up".to_string(),
                RecPriority::Medium,
                now,
                &mut created,
            )
            .await;
        }

        // 10. Features never tried.
        if stats.quizzes_completed == 0 {
            self.try_create(
                user_id,
                RecommendationType::NewTopic,
                "Try your first quiz".to_string(),
                "Generate a quiz to test what you know.".to_string(),
                None,
                "No quizzes completed yet".to_string(),
                RecPriority::Medium,
                now,
                &mut created,
            )
            .await;
        }
        if stats.flashcards_studied == 0 {
            self.try_create(
                user_id,
                RecommendationType::StudyFlashcards,
                "Discover flashcards".to_string(),
                "Build a deck to memorize the concepts that matter.".to_string(),
                None,
                "No flashcards studied yet".to_string(),
                RecPriority::Medium,
                now,
                &mut created,
            )
            .await;
        }

        // 11. Milestone congratulations.
        if stats.quizzes_completed >= MILESTONE_QUIZZES {
            self.try_create(
                user_id,
                RecommendationType::Milestone,
                format!("{MILESTONE_QUIZZES}+ quizzes completed"),
                "Great work — keep the pace up.".to_string(),
                None,
                "Among the most active learners".to_string(),
                RecPriority::Low,
                now,
                &mut created,
            )
            .await;
        }

        // Weekend slot: suppressed by the daily-goal dedup key whenever
        // rule 9 already fired this period.
        if matches!(today.weekday(), Weekday::Sat | Weekday::Sun) {
            self.try_create(
                user_id,
                RecommendationType::DailyGoal,
                "Weekend study session".to_string(),
                "Use the weekend to catch up or go deeper.".to_string(),
                None,
                "Weekends fit longer sessions".to_string(),
                RecPriority::Low,
                now,
                &mut created,
            )
            .await;
        }

        Ok(created)
    }

    /// Rules 2–6 and 8: everything derived from per-topic progress.
    async fn topic_rules(
        &self,
        user_id: DbId,
        progress: &[UserProgress],
        now: Timestamp,
        created: &mut Vec<Recommendation>,
    ) {
        let today = now.date_naive();

        // 2. Weak topics: quizzed, but averaging below the bar.
        for p in progress
            .iter()
            .filter(|p| p.quiz_completed > 0 && p.average_score < WEAK_TOPIC_SCORE)
        {
            self.try_create(
                user_id,
                RecommendationType::WeaknessFocus,
                format!("Review {}", p.topic),
                format!(
                    "Your average score is {:.0}%. A refresher could help.",
                    p.average_score
                ),
                Some(p.topic.clone()),
                format!("Score below {WEAK_TOPIC_SCORE:.0}%"),
                RecPriority::High,
                now,
                created,
            )
            .await;
        }

        // 3. Topics idle past the review window.
        for p in progress {
            let days_idle = (today - p.last_activity_at.date_naive()).num_days();
            if days_idle >= REVIEW_AFTER_DAYS {
                self.try_create(
                    user_id,
                    RecommendationType::ReviewTopic,
                    format!("Time to revisit {}", p.topic),
                    format!("No activity on this topic for {days_idle} days."),
                    Some(p.topic.clone()),
                    "Periodic review supports long-term retention".to_string(),
                    review_priority(days_idle),
                    now,
                    created,
                )
                .await;
            }
        }

        // 4. Recently studied topics in the keep-practicing band.
        let recent_cutoff = now - Duration::days(RECENT_TOPIC_WINDOW_DAYS);
        for p in progress
            .iter()
            .filter(|p| p.last_activity_at > recent_cutoff && in_continue_band(p.average_score))
        {
            self.try_create(
                user_id,
                RecommendationType::ContinueStudying,
                format!("Continue with {}", p.topic),
                format!(
                    "You are on track at {:.0}%. A bit more practice seals it.",
                    p.average_score
                ),
                Some(p.topic.clone()),
                "Close to mastering this topic".to_string(),
                RecPriority::Medium,
                now,
                created,
            )
            .await;
        }

        // 5. Strongest topic: suggest a harder challenge.
        let most_studied = progress
            .iter()
            .max_by_key(|p| (p.quiz_completed, std::cmp::Reverse(p.id)));
        if let Some(top) = most_studied {
            if top.quiz_completed > 0 && top.average_score >= CHALLENGE_SCORE {
                self.try_create(
                    user_id,
                    RecommendationType::ChallengeYourself,
                    format!("Challenge yourself on {}", top.topic),
                    "You are strong here. Try a harder quiz.".to_string(),
                    Some(top.topic.clone()),
                    format!("Averaging {:.0}% — aim for 100%", top.average_score),
                    RecPriority::Low,
                    now,
                    created,
                )
                .await;
            }
        }

        // 6. Overall average across quizzed topics below target.
        let quizzed: Vec<&UserProgress> =
            progress.iter().filter(|p| p.quiz_completed > 0).collect();
        if !quizzed.is_empty() {
            let overall =
                quizzed.iter().map(|p| p.average_score).sum::<f64>() / quizzed.len() as f64;
            if overall < OVERALL_AVERAGE_TARGET {
                self.try_create(
                    user_id,
                    RecommendationType::ImproveAverage,
                    "Raise your overall average".to_string(),
                    format!(
                        "Your overall average is {overall:.0}%. Revisit the weaker topics."
                    ),
                    None,
                    format!("Average below {OVERALL_AVERAGE_TARGET:.0}%"),
                    RecPriority::Medium,
                    now,
                    created,
                )
                .await;
            }
        }

        // 8. Little variety so far.
        if (progress.len() as i64) < MIN_DISTINCT_TOPICS {
            self.try_create(
                user_id,
                RecommendationType::NewTopic,
                "Explore a new topic".to_string(),
                format!(
                    "You have studied {} topics so far. Broaden the mix.",
                    progress.len()
                ),
                None,
                "Variety keeps motivation up".to_string(),
                RecPriority::Low,
                now,
                created,
            )
            .await;
        }
    }

    /// Create one recommendation unless an active duplicate exists.
    ///
    /// Store failures are logged and swallowed so one bad rule never takes
    /// down the rest of the pass.
    #[allow(clippy::too_many_arguments)]
    async fn try_create(
        &self,
        user_id: DbId,
        rec_type: RecommendationType,
        title: String,
        description: String,
        topic: Option<String>,
        reason: String,
        priority: RecPriority,
        now: Timestamp,
        created: &mut Vec<Recommendation>,
    ) {
        match self
            .store
            .exists_active_recommendation(user_id, rec_type, topic.as_deref(), now)
            .await
        {
            Ok(true) => return,
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(user_id, rec_type = %rec_type, error = %err, "Dedup check failed");
                return;
            }
        }

        let rec = NewRecommendation {
            user_id,
            rec_type,
            title,
            description,
            topic,
            reason,
            priority,
            expires_at: now + Duration::days(EXPIRY_DAYS),
        };
        match self.store.insert_recommendation(&rec).await {
            Ok(row) => {
                tracing::info!(user_id, rec_type = %rec_type, "Recommendation created");
                created.push(row);
            }
            Err(err) => {
                tracing::warn!(user_id, rec_type = %rec_type, error = %err, "Insert failed");
            }
        }
    }
}
