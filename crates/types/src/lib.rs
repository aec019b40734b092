//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no behaviour beyond parsing and formatting, making
//! them usable in any context (session logic, terminal rendering, remote protocol).
//!
//! # Rule Constants
//!
//! Player resources and rewards are exact integers:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `RESOURCE_MAX` | 100 | Upper bound of battery and calm index |
//! | `BASE_POINTS` | 100 | Points for any correct classification |
//! | `STREAK_BONUS_STEP` | 10 | Bonus per streak step |
//! | `STREAK_BONUS_CAP` | 50 | Maximum streak bonus |
//! | `CALM_REWARD` | 5 | Calm regained on a correct answer |
//! | `BATTERY_PENALTY` | 20 | Battery lost on a wrong answer |
//! | `CALM_PENALTY` | 15 | Calm lost on a wrong answer |
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep of the driver loop |
//! | `CORRECT_SETTLE_MS` | 400 | Feedback pause before the next card |
//! | `WRONG_SETTLE_MS` | 500 | Feedback pause before the education screen |
//!
//! # Examples
//!
//! ```
//! use cyber_shield_types::{Command, Decision, RankTier, Verdict};
//!
//! let decision = Decision::from_str("decideFalse").unwrap();
//! assert_eq!(decision.verdict(), Verdict::False);
//!
//! let cmd = Command::from_str("continue").unwrap();
//! assert_eq!(cmd, Command::Continue);
//!
//! assert!(RankTier::Master > RankTier::Novice);
//! assert_eq!(RankTier::Junior.label(), "Junior Fact-Checker");
//! ```

use serde::{Deserialize, Serialize};

/// Upper bound for battery and calm index.
pub const RESOURCE_MAX: u8 = 100;

/// Scoring rules.
pub const BASE_POINTS: u32 = 100;
pub const STREAK_BONUS_STEP: u32 = 10;
pub const STREAK_BONUS_CAP: u32 = 50;

/// Resource deltas.
pub const CALM_REWARD: u8 = 5;
pub const BATTERY_PENALTY: u8 = 20;
pub const CALM_PENALTY: u8 = 15;

/// Driver timing (milliseconds).
pub const TICK_MS: u32 = 16;
pub const CORRECT_SETTLE_MS: u32 = 400;
pub const WRONG_SETTLE_MS: u32 = 500;

/// Buffered cards left before a replenishment is requested.
pub const DEFAULT_LOW_WATER: usize = 3;

/// Ground truth of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "FACT", alias = "GENUINE")]
    Genuine,
    #[serde(rename = "HOAX", alias = "FALSE")]
    False,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Genuine => "FACT",
            Verdict::False => "HOAX",
        }
    }
}

/// A single classifiable card.
///
/// Immutable once created; recycled catalog copies share ids with the originals,
/// so queue position rather than `id` identifies a card within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub headline: String,
    pub source: String,
    pub url: String,
    /// Body text.
    pub content: String,
    #[serde(rename = "type")]
    pub verdict: Verdict,
    pub image_url: String,
    /// Why the item is genuine or false.
    pub explanation: String,
    /// Ordered tags pointing at the telltale signs.
    pub indicators: Vec<String>,
}

impl ContentItem {
    /// Every field populated, as required of generated batches.
    pub fn is_complete(&self) -> bool {
        let text = [
            &self.id,
            &self.headline,
            &self.source,
            &self.url,
            &self.content,
            &self.image_url,
            &self.explanation,
        ];
        text.iter().all(|s| !s.trim().is_empty())
            && !self.indicators.is_empty()
            && self.indicators.iter().all(|s| !s.trim().is_empty())
    }
}

/// The player's binary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    ClassifyGenuine,
    ClassifyFalse,
}

impl Decision {
    /// Verdict the player claims.
    pub fn verdict(&self) -> Verdict {
        match self {
            Decision::ClassifyGenuine => Verdict::Genuine,
            Decision::ClassifyFalse => Verdict::False,
        }
    }

    /// Parse decision from string (for the control protocol)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "decidegenuine" | "genuine" | "fact" => Some(Decision::ClassifyGenuine),
            "decidefalse" | "false" | "hoax" => Some(Decision::ClassifyFalse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::ClassifyGenuine => "decideGenuine",
            Decision::ClassifyFalse => "decideFalse",
        }
    }
}

/// Rank tiers, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Novice,
    Junior,
    Senior,
    Expert,
    Master,
}

impl RankTier {
    /// Player-facing title.
    pub fn label(&self) -> &'static str {
        match self {
            RankTier::Novice => "Novice Scout",
            RankTier::Junior => "Junior Fact-Checker",
            RankTier::Senior => "Senior Investigator",
            RankTier::Expert => "Truth Specialist",
            RankTier::Master => "Master Verificator",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankTier::Novice => "novice",
            RankTier::Junior => "junior",
            RankTier::Senior => "senior",
            RankTier::Expert => "expert",
            RankTier::Master => "master",
        }
    }
}

/// Session phases. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Menu,
    Playing,
    Education,
    /// Reserved; no transition enters it.
    RankUp,
    GameOver,
    Shutdown,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Menu => "menu",
            SessionPhase::Playing => "playing",
            SessionPhase::Education => "education",
            SessionPhase::RankUp => "rank_up",
            SessionPhase::GameOver => "game_over",
            SessionPhase::Shutdown => "shutdown",
        }
    }
}

/// Player resources for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub score: u32,
    /// Life resource in `[0, RESOURCE_MAX]`.
    pub battery: u8,
    /// Morale resource in `[0, RESOURCE_MAX]`.
    pub calm_index: u8,
    pub correct_streak: u32,
    pub rank: RankTier,
}

impl PlayerStats {
    /// Stats at the start of every session.
    pub fn fresh() -> Self {
        Self {
            score: 0,
            battery: RESOURCE_MAX,
            calm_index: RESOURCE_MAX,
            correct_streak: 0,
            rank: RankTier::Novice,
        }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Transient feedback shown while a decision settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Reward { points: u32 },
    Penalty { battery: u8 },
}

/// Commands accepted by the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Decide(Decision),
    Continue,
    RequestExit,
    ConfirmExit,
    CancelExit,
    Restart,
    Shutdown,
    PowerOn,
}

impl Command {
    /// Parse command from string (for the control protocol)
    pub fn from_str(s: &str) -> Option<Self> {
        if let Some(decision) = Decision::from_str(s) {
            return Some(Command::Decide(decision));
        }
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "continue" => Some(Command::Continue),
            "exit" | "requestexit" => Some(Command::RequestExit),
            "confirmexit" => Some(Command::ConfirmExit),
            "cancelexit" => Some(Command::CancelExit),
            "restart" => Some(Command::Restart),
            "shutdown" => Some(Command::Shutdown),
            "poweron" => Some(Command::PowerOn),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Decide(d) => d.as_str(),
            Command::Continue => "continue",
            Command::RequestExit => "exit",
            Command::ConfirmExit => "confirmExit",
            Command::CancelExit => "cancelExit",
            Command::Restart => "restart",
            Command::Shutdown => "shutdown",
            Command::PowerOn => "powerOn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> ContentItem {
        ContentItem {
            id: "x1".to_string(),
            headline: "Headline".to_string(),
            source: "Source".to_string(),
            url: "www.example.go.id/x".to_string(),
            content: "Body".to_string(),
            verdict: Verdict::Genuine,
            image_url: "https://picsum.photos/600/400?random=1".to_string(),
            explanation: "Because".to_string(),
            indicators: vec!["Official Domain".to_string()],
        }
    }

    #[test]
    fn test_command_round_trip_strings() {
        for cmd in [
            Command::Start,
            Command::Decide(Decision::ClassifyGenuine),
            Command::Decide(Decision::ClassifyFalse),
            Command::Continue,
            Command::RequestExit,
            Command::ConfirmExit,
            Command::CancelExit,
            Command::Restart,
            Command::Shutdown,
            Command::PowerOn,
        ] {
            assert_eq!(Command::from_str(cmd.as_str()), Some(cmd));
        }
        assert_eq!(Command::from_str("jump"), None);
    }

    #[test]
    fn test_rank_order_and_labels() {
        assert!(RankTier::Novice < RankTier::Junior);
        assert!(RankTier::Expert < RankTier::Master);
        assert_eq!(RankTier::Master.label(), "Master Verificator");
    }

    #[test]
    fn test_fresh_stats() {
        let s = PlayerStats::fresh();
        assert_eq!(s.score, 0);
        assert_eq!(s.battery, 100);
        assert_eq!(s.calm_index, 100);
        assert_eq!(s.correct_streak, 0);
        assert_eq!(s.rank, RankTier::Novice);
    }

    #[test]
    fn test_item_wire_format() {
        let json = r#"{
            "id": "g1",
            "headline": "H",
            "source": "S",
            "url": "u",
            "content": "c",
            "type": "HOAX",
            "imageUrl": "i",
            "explanation": "e",
            "indicators": ["a", "b"]
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.verdict, Verdict::False);
        assert_eq!(item.image_url, "i");
        assert!(item.is_complete());

        let v = serde_json::to_value(sample_item()).unwrap();
        assert_eq!(v["type"], "FACT");
        assert_eq!(v["imageUrl"], "https://picsum.photos/600/400?random=1");
    }

    #[test]
    fn test_verdict_aliases() {
        let v: Verdict = serde_json::from_str("\"GENUINE\"").unwrap();
        assert_eq!(v, Verdict::Genuine);
        let v: Verdict = serde_json::from_str("\"FALSE\"").unwrap();
        assert_eq!(v, Verdict::False);
    }

    #[test]
    fn test_incomplete_items() {
        let mut item = sample_item();
        item.explanation = "  ".to_string();
        assert!(!item.is_complete());

        let mut item = sample_item();
        item.indicators.clear();
        assert!(!item.is_complete());
    }
}
