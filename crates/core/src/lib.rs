//! Core session logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the game and the state machine that enforces
//! them. It has no dependencies on terminals, sockets or async runtimes:
//!
//! - **Deterministic**: same seed, same deal; time advances only through `tick`
//! - **Testable**: every rule and transition is covered by unit tests
//! - **Portable**: any front end drives it through [`Session::apply`] and renders
//!   [`SessionSnapshot`]
//!
//! # Module Structure
//!
//! - [`catalog`]: the fixed seed set of content items
//! - [`queue`]: append-only content queue with a read cursor
//! - [`supplier`]: low-water replenishment with catalog fallback
//! - [`rank`]: score → rank tier thresholds
//! - [`scoring`]: reward and penalty rules for one decision
//! - [`session`]: the phase state machine
//! - [`rng`]: seeded shuffling
//!
//! # Example
//!
//! ```
//! use cyber_shield_core::{Session, SessionConfig};
//! use cyber_shield_types::{Command, Decision, SessionPhase};
//!
//! let mut session = Session::new(SessionConfig::seeded(7));
//! session.apply(Command::Start);
//! assert_eq!(session.phase(), SessionPhase::Playing);
//!
//! session.apply(Command::Decide(Decision::ClassifyFalse));
//! session.tick(500);
//!
//! // Either the answer was right and the next card is up, or the explanation
//! // screen is showing.
//! assert!(matches!(
//!     session.phase(),
//!     SessionPhase::Playing | SessionPhase::Education
//! ));
//! ```

pub mod catalog;
pub mod config;
pub mod queue;
pub mod rank;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod supplier;

pub use cyber_shield_types as types;

// Re-export commonly used types for convenience
pub use catalog::{catalog, sample_shuffled, topic_of, Topic};
pub use config::SessionConfig;
pub use queue::ContentQueue;
pub use rank::{derive_rank, next_threshold, RANK_THRESHOLDS};
pub use rng::SimpleRng;
pub use scoring::{apply_decision, streak_points, DecisionResult, Resolution};
pub use session::{EventBuf, Session, SessionEvent, EVENT_CAPACITY};
pub use snapshot::SessionSnapshot;
pub use supplier::{ContentSupplier, ReplenishTicket, SupplyError, SupplyOutcome};
