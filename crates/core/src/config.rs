//! Session configuration.

use crate::types::{CORRECT_SETTLE_MS, DEFAULT_LOW_WATER, WRONG_SETTLE_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Shuffle seed. `None` seeds from the clock.
    pub seed: Option<u32>,
    /// Buffered cards left before a replenishment is requested.
    pub low_water: usize,
    /// Pause after a correct answer before the next card.
    pub correct_settle_ms: u32,
    /// Pause after a wrong answer before the education screen.
    pub wrong_settle_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            low_water: DEFAULT_LOW_WATER,
            correct_settle_ms: CORRECT_SETTLE_MS,
            wrong_settle_ms: WRONG_SETTLE_MS,
        }
    }
}

impl SessionConfig {
    /// Deterministic configuration for tests and replays.
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let seed = env::var("CYBER_SHIELD_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let low_water = env::var("CYBER_SHIELD_LOW_WATER")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.low_water);

        Self {
            seed,
            low_water,
            ..defaults
        }
    }
}
