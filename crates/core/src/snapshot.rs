//! Snapshot module - read-only view of a session for front ends

use crate::types::{ContentItem, Feedback, PlayerStats, RankTier, SessionPhase};

/// Everything a front end needs to draw one frame of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub stats: PlayerStats,
    pub episode_id: u32,
    pub cursor: usize,
    pub queue_len: usize,
    /// `None` while the queue is exhausted.
    pub current: Option<ContentItem>,
    pub last_correction: Option<ContentItem>,
    pub feedback: Option<Feedback>,
    pub processing: bool,
    pub exit_prompt: bool,
    pub syncing: bool,
    pub next_rank: Option<(RankTier, u32)>,
}

impl SessionSnapshot {
    /// Whether a decision would be accepted right now.
    pub fn accepts_decision(&self) -> bool {
        self.phase == SessionPhase::Playing
            && !self.processing
            && !self.exit_prompt
            && self.current.is_some()
    }

    /// Progress towards the next rank in `[0, 100]`.
    pub fn rank_progress_pct(&self) -> u8 {
        let floor = crate::rank::RANK_THRESHOLDS
            .iter()
            .rev()
            .find(|(tier, _)| *tier == self.stats.rank)
            .map(|(_, min)| *min)
            .unwrap_or(0);
        match self.next_rank {
            None => 100,
            Some((_, next)) if next > floor => {
                let done = self.stats.score.saturating_sub(floor) as u64 * 100;
                (done / u64::from(next - floor)).min(100) as u8
            }
            Some(_) => 0,
        }
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Menu,
            stats: PlayerStats::fresh(),
            episode_id: 0,
            cursor: 0,
            queue_len: 0,
            current: None,
            last_correction: None,
            feedback: None,
            processing: false,
            exit_prompt: false,
            syncing: false,
            next_rank: crate::rank::next_threshold(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot() {
        let s = SessionSnapshot::default();
        assert_eq!(s.phase, SessionPhase::Menu);
        assert!(!s.accepts_decision());
        assert_eq!(s.rank_progress_pct(), 0);
    }

    #[test]
    fn test_rank_progress() {
        let mut s = SessionSnapshot::default();
        s.stats.score = 250;
        assert_eq!(s.rank_progress_pct(), 50);

        s.stats.score = 1000;
        s.stats.rank = RankTier::Junior;
        s.next_rank = crate::rank::next_threshold(1000);
        assert_eq!(s.rank_progress_pct(), 50);

        s.stats.score = 7000;
        s.stats.rank = RankTier::Master;
        s.next_rank = None;
        assert_eq!(s.rank_progress_pct(), 100);
    }
}
