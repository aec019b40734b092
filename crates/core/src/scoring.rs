//! Scoring module - reward and penalty rules for a single decision
//!
//! A correct classification earns `BASE_POINTS` plus a streak bonus of
//! `STREAK_BONUS_STEP` per consecutive correct answer, capped at
//! `STREAK_BONUS_CAP`, and restores a little calm. A wrong one drains battery
//! and calm and breaks the streak. Battery and calm stay in `[0, RESOURCE_MAX]`
//! after every mutation.

use crate::rank::derive_rank;
use crate::types::{
    ContentItem, Decision, PlayerStats, RankTier, BASE_POINTS, BATTERY_PENALTY, CALM_PENALTY,
    CALM_REWARD, RESOURCE_MAX, STREAK_BONUS_CAP, STREAK_BONUS_STEP,
};

/// What the session does once the feedback pause ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Move to the next card and keep playing.
    Advance,
    /// Show the explanation of the missed card.
    Educate,
}

/// Result of applying one decision to the player's stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionResult {
    pub correct: bool,
    /// Points awarded (0 when wrong).
    pub points: u32,
    /// Battery actually lost (0 when correct).
    pub battery_lost: u8,
    pub stats: PlayerStats,
    pub resolution: Resolution,
    /// Set when the score change crossed a rank threshold.
    pub rank_change: Option<(RankTier, RankTier)>,
}

/// Points for a correct answer given the streak before it.
pub fn streak_points(correct_streak: u32) -> u32 {
    let bonus = correct_streak
        .saturating_mul(STREAK_BONUS_STEP)
        .min(STREAK_BONUS_CAP);
    BASE_POINTS + bonus
}

/// Add to a resource, clamped to the upper bound.
pub fn raise_resource(value: u8, delta: u8) -> u8 {
    value.saturating_add(delta).min(RESOURCE_MAX)
}

/// Subtract from a resource, clamped to the valid range.
pub fn lower_resource(value: u8, delta: u8) -> u8 {
    value.saturating_sub(delta).min(RESOURCE_MAX)
}

/// Apply a decision about `item` to `stats`.
pub fn apply_decision(stats: &PlayerStats, item: &ContentItem, decision: Decision) -> DecisionResult {
    let correct = item.verdict == decision.verdict();
    let mut next = *stats;

    if correct {
        let points = streak_points(stats.correct_streak);
        next.score = stats.score.saturating_add(points);
        next.calm_index = raise_resource(stats.calm_index, CALM_REWARD);
        next.correct_streak = stats.correct_streak.saturating_add(1);
        next.battery = next.battery.min(RESOURCE_MAX);

        let rank = derive_rank(next.score);
        let rank_change = (rank != stats.rank).then_some((stats.rank, rank));
        next.rank = rank;

        DecisionResult {
            correct,
            points,
            battery_lost: 0,
            stats: next,
            resolution: Resolution::Advance,
            rank_change,
        }
    } else {
        next.battery = lower_resource(stats.battery, BATTERY_PENALTY);
        next.calm_index = lower_resource(stats.calm_index, CALM_PENALTY);
        next.correct_streak = 0;

        DecisionResult {
            correct,
            points: 0,
            battery_lost: stats.battery.min(RESOURCE_MAX) - next.battery,
            stats: next,
            resolution: Resolution::Educate,
            rank_change: None,
        }
    }
}
