//! Leveling curve constants, types, and pure logic (PRD-06).
//!
//! Maps a user's total XP to a level, the XP still missing for the next
//! level, and a progress percentage within the current level. Called after
//! every XP mutation; deterministic for a given total.

// ---------------------------------------------------------------------------
// Curve constants
// ---------------------------------------------------------------------------

/// XP required to advance one level. Product tuning knob; use
/// [`LevelCurve`] to override instead of editing this value.
pub const XP_PER_LEVEL: i32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Snapshot of a user's position on the leveling curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LevelInfo {
    /// Current level, starting at 1 for 0 XP.
    pub level: i32,
    /// XP still needed to reach the next level.
    pub xp_for_next_level: i32,
    /// Progress through the current level, 0.0–100.0.
    pub progress_percent: f64,
}

/// A leveling curve with a fixed per-level XP cost.
#[derive(Debug, Clone, Copy)]
pub struct LevelCurve {
    pub xp_per_level: i32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            xp_per_level: XP_PER_LEVEL,
        }
    }
}

impl LevelCurve {
    /// Compute the level snapshot for a total XP amount.
    ///
    /// The level is a strictly increasing step function of `total_xp`:
    /// `level = total_xp / cost + 1`. Negative totals are treated as 0
    /// (totals are non-decreasing by contract; this only guards arithmetic).
    pub fn level_for_xp(&self, total_xp: i32) -> LevelInfo {
        let cost = self.xp_per_level.max(1);
        let total = total_xp.max(0);
        let into_level = total % cost;
        LevelInfo {
            level: total / cost + 1,
            xp_for_next_level: cost - into_level,
            progress_percent: f64::from(into_level) / f64::from(cost) * 100.0,
        }
    }
}

/// Level snapshot under the default curve ([`XP_PER_LEVEL`]).
pub fn level_for_xp(total_xp: i32) -> LevelInfo {
    LevelCurve::default().level_for_xp(total_xp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
