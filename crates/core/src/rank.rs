//! Rank module - maps cumulative score to a rank tier
//!
//! Thresholds are strictly increasing. The derived tier is the one with the
//! greatest minimum score not above the player's score.

use crate::types::RankTier;

/// Ordered (tier, minimum score) table.
pub const RANK_THRESHOLDS: [(RankTier, u32); 5] = [
    (RankTier::Novice, 0),
    (RankTier::Junior, 500),
    (RankTier::Senior, 1500),
    (RankTier::Expert, 3500),
    (RankTier::Master, 6000),
];

/// Rank tier for a score.
pub fn derive_rank(score: u32) -> RankTier {
    RANK_THRESHOLDS
        .iter()
        .rev()
        .find(|&&(_, min)| min <= score)
        .map(|&(tier, _)| tier)
        .unwrap_or(RankTier::Novice)
}

/// The next tier above `score` and the score it unlocks at.
///
/// `None` once the top tier is reached.
pub fn next_threshold(score: u32) -> Option<(RankTier, u32)> {
    RANK_THRESHOLDS
        .iter()
        .find(|&&(_, min)| min > score)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_strictly_increasing() {
        for w in RANK_THRESHOLDS.windows(2) {
            assert!(w[0].1 < w[1].1);
            assert!(w[0].0 < w[1].0);
        }
        assert_eq!(RANK_THRESHOLDS[0].1, 0);
    }

    #[test]
    fn test_derive_rank_boundaries() {
        assert_eq!(derive_rank(0), RankTier::Novice);
        assert_eq!(derive_rank(499), RankTier::Novice);
        assert_eq!(derive_rank(500), RankTier::Junior);
        assert_eq!(derive_rank(1499), RankTier::Junior);
        assert_eq!(derive_rank(1500), RankTier::Senior);
        assert_eq!(derive_rank(3499), RankTier::Senior);
        assert_eq!(derive_rank(3500), RankTier::Expert);
        assert_eq!(derive_rank(5999), RankTier::Expert);
        assert_eq!(derive_rank(6000), RankTier::Master);
        assert_eq!(derive_rank(u32::MAX), RankTier::Master);
    }

    #[test]
    fn test_derive_rank_matches_greatest_threshold() {
        for score in (0..8000).step_by(37) {
            let expected = RANK_THRESHOLDS
                .iter()
                .filter(|(_, min)| *min <= score)
                .max_by_key(|(_, min)| *min)
                .map(|(t, _)| *t)
                .unwrap();
            assert_eq!(derive_rank(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_next_threshold() {
        assert_eq!(next_threshold(0), Some((RankTier::Junior, 500)));
        assert_eq!(next_threshold(500), Some((RankTier::Senior, 1500)));
        assert_eq!(next_threshold(5999), Some((RankTier::Master, 6000)));
        assert_eq!(next_threshold(6000), None);
    }
}
