//! Badge unlock engine (PRD-07).
//!
//! Runs inside the per-user critical section of the event pipeline, against
//! a counter snapshot taken on entry (single-pass policy: bonus XP granted
//! while evaluating one requirement kind is not visible to the kinds that
//! follow in the same pass; it lands on the next event).

use studyforge_core::badge::{self, StatsCounters, EVALUATION_ORDER};
use studyforge_core::types::DbId;
use studyforge_db::models::badge::Badge;
use studyforge_db::models::user_stats::UserStats;

use crate::store::GamificationStore;

/// Evaluate every requirement kind and unlock what the counters have
/// earned. Newly granted `xp_reward`s are added to `stats`; the caller
/// recomputes the level once afterwards.
///
/// A store failure on one requirement kind is logged and skipped; the
/// remaining kinds still run. Returns the badges newly unlocked by this
/// call (a badge already recorded for the user is never returned again).
pub async fn check_and_unlock(
    store: &dyn GamificationStore,
    user_id: DbId,
    stats: &mut UserStats,
) -> Vec<Badge> {
    let counters = stats.counters();
    let mut newly_unlocked = Vec::new();

    for requirement in EVALUATION_ORDER.iter().copied() {
        let counter_value = requirement.counter_value(&counters);

        let eligible = match store.unlockable_badges(requirement, counter_value).await {
            Ok(badges) => badges,
            Err(err) => {
                tracing::warn!(
                    user_id,
                    requirement = %requirement,
                    error = %err,
                    "Badge lookup failed; skipping requirement kind",
                );
                continue;
            }
        };

        for badge in eligible {
            match store.try_unlock_badge(user_id, badge.id, counter_value).await {
                Ok(true) => {
                    if badge.xp_reward > 0 {
                        stats.add_xp(badge.xp_reward);
                    }
                    tracing::info!(user_id, badge = %badge.code, "Badge unlocked");
                    newly_unlocked.push(badge);
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(
                        user_id,
                        badge = %badge.code,
                        error = %err,
                        "Badge unlock write failed",
                    );
                }
            }
        }
    }

    newly_unlocked
}

/// Percentage progress toward one catalog badge, from a counter snapshot.
///
/// Rows carrying a requirement label this build does not know report 0.
pub fn progress_for(badge: &Badge, counters: &StatsCounters) -> f64 {
    match badge.requirement() {
        Some(requirement) => {
            badge::progress_percent(requirement.counter_value(counters), badge.requirement_value)
        }
        None => 0.0,
    }
}
