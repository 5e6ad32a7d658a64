//! Leaderboard metrics and ranking helpers (PRD-09).

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Default number of entries returned when the caller does not say.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
/// Hard cap on a single leaderboard page.
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;
/// Size of the candidate set rank lookups scan. A user outside the top
/// candidates has no rank rather than triggering an unbounded scan.
pub const RANK_CANDIDATE_LIMIT: i64 = 1000;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The stat a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaderboardMetric {
    TotalXp,
    WeeklyXp,
    Streak,
    Level,
}

impl LeaderboardMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TotalXp => "TOTAL_XP",
            Self::WeeklyXp => "WEEKLY_XP",
            Self::Streak => "STREAK",
            Self::Level => "LEVEL",
        }
    }

    const ALL: &'static [Self] = &[Self::TotalXp, Self::WeeklyXp, Self::Streak, Self::Level];
}

impl fmt::Display for LeaderboardMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown leaderboard metric: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Clamp a caller-provided page size to 1..=[`MAX_LEADERBOARD_LIMIT`].
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
