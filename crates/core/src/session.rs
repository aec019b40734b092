//! Session module - the authoritative state machine for one play session
//!
//! The session owns the phase, the player's stats, the content queue and the
//! supplier. Stats change only inside [`Session::apply`] (through the scoring
//! rules) and inside the delayed resolutions fired by [`Session::tick`].
//!
//! # Phases
//!
//! ```text
//! MENU --start--> PLAYING --wrong answer (after settle)--> EDUCATION
//!  ^  \             |  ^                                     |
//!  |   shutdown     |  +----------continue (battery > 0)-----+
//!  |    v           |                                        |
//!  | SHUTDOWN    exit + confirm                    continue (battery == 0)
//!  |    |           v                                        v
//!  +-power on--  MENU                                    GAME_OVER --restart--> PLAYING
//! ```
//!
//! # Decision settling
//!
//! A decision applies its stat changes immediately, then holds the session in a
//! "processing" state for the settle delay while feedback is shown. Further
//! decisions are refused until the delay elapses. Time only moves through
//! `tick`, so the delay is deterministic. Resetting or leaving the session
//! cancels a pending resolution.

use arrayvec::ArrayVec;
use tracing::{info, trace, warn};

use crate::config::SessionConfig;
use crate::queue::ContentQueue;
use crate::rank::next_threshold;
use crate::rng::SimpleRng;
use crate::scoring::{apply_decision, Resolution};
use crate::snapshot::SessionSnapshot;
use crate::supplier::{ContentSupplier, ReplenishTicket, SupplyError, SupplyOutcome};
use crate::types::{
    Command, ContentItem, Decision, Feedback, PlayerStats, RankTier, SessionPhase,
};

/// Capacity of the per-step event buffer.
pub const EVENT_CAPACITY: usize = 16;

/// Presentation notifications. Front ends drive audio, haptics and effects
/// from these; the session itself performs no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    PhaseChanged { from: SessionPhase, to: SessionPhase },
    RankChanged { from: RankTier, to: RankTier },
    Rewarded { points: u32, streak: u32 },
    Penalized { battery: u8 },
    ReplenishRequested { rank: RankTier },
    Replenished(SupplyOutcome),
}

pub type EventBuf = ArrayVec<SessionEvent, EVENT_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingResolution {
    resolution: Resolution,
    due_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    phase: SessionPhase,
    stats: PlayerStats,
    queue: ContentQueue,
    supplier: ContentSupplier,
    last_correction: Option<ContentItem>,
    pending: Option<PendingResolution>,
    feedback: Option<Feedback>,
    exit_prompt: bool,
    /// Monotonic session id (increments on start/restart). Also the supplier
    /// generation.
    episode_id: u32,
    /// Monotonic session clock.
    clock_ms: u64,
    outbox: Option<ReplenishTicket>,
    events: EventBuf,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_clock(),
        };
        let supplier = ContentSupplier::new(rng, config.low_water);

        Self {
            config,
            phase: SessionPhase::Menu,
            stats: PlayerStats::fresh(),
            queue: ContentQueue::new(),
            supplier,
            last_correction: None,
            pending: None,
            feedback: None,
            exit_prompt: false,
            episode_id: 0,
            clock_ms: 0,
            outbox: None,
            events: EventBuf::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn queue(&self) -> &ContentQueue {
        &self.queue
    }

    pub fn current_item(&self) -> Option<&ContentItem> {
        self.queue.current()
    }

    pub fn last_correction(&self) -> Option<&ContentItem> {
        self.last_correction.as_ref()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// A decision is settling; new decisions are refused.
    pub fn is_processing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn exit_prompt(&self) -> bool {
        self.exit_prompt
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Queue exhausted while a replenishment is outstanding.
    pub fn is_syncing(&self) -> bool {
        self.phase == SessionPhase::Playing
            && self.queue.is_exhausted()
            && self.supplier.in_flight().is_some()
    }

    /// Apply a command. Returns false when the command is not valid in the
    /// current state; nothing changes in that case.
    pub fn apply(&mut self, command: Command) -> bool {
        let accepted = match command {
            Command::Start => self.start(),
            Command::Decide(decision) => self.decide(decision),
            Command::Continue => self.continue_after_education(),
            Command::RequestExit => self.request_exit(),
            Command::ConfirmExit => self.confirm_exit(),
            Command::CancelExit => self.cancel_exit(),
            Command::Restart => self.restart(),
            Command::Shutdown => self.shutdown(),
            Command::PowerOn => self.power_on(),
        };
        if !accepted {
            trace!(
                command = command.as_str(),
                phase = self.phase.as_str(),
                "command ignored"
            );
        }
        accepted
    }

    fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Menu {
            return false;
        }
        self.reset();
        true
    }

    fn restart(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.reset();
        true
    }

    /// Fresh stats, fresh deal, new generation.
    fn reset(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.stats = PlayerStats::fresh();
        self.pending = None;
        self.feedback = None;
        self.exit_prompt = false;
        self.last_correction = None;
        self.outbox = None;
        self.supplier.reseed(&mut self.queue, self.episode_id);
        info!(episode = self.episode_id, "session started");
        self.set_phase(SessionPhase::Playing);
        self.check_supply();
    }

    fn decide(&mut self, decision: Decision) -> bool {
        if self.phase != SessionPhase::Playing || self.pending.is_some() || self.exit_prompt {
            return false;
        }
        let Some(item) = self.queue.current() else {
            return false;
        };

        let result = apply_decision(&self.stats, item, decision);
        let missed = (!result.correct).then(|| item.clone());
        self.stats = result.stats;

        if let Some((from, to)) = result.rank_change {
            info!(from = from.as_str(), to = to.as_str(), "rank changed");
            self.push_event(SessionEvent::RankChanged { from, to });
        }

        let delay = match result.resolution {
            Resolution::Advance => {
                self.feedback = Some(Feedback::Reward {
                    points: result.points,
                });
                self.push_event(SessionEvent::Rewarded {
                    points: result.points,
                    streak: self.stats.correct_streak,
                });
                self.config.correct_settle_ms
            }
            Resolution::Educate => {
                self.last_correction = missed;
                self.feedback = Some(Feedback::Penalty {
                    battery: result.battery_lost,
                });
                self.push_event(SessionEvent::Penalized {
                    battery: result.battery_lost,
                });
                self.config.wrong_settle_ms
            }
        };

        self.pending = Some(PendingResolution {
            resolution: result.resolution,
            due_ms: self.clock_ms + u64::from(delay),
        });
        true
    }

    fn continue_after_education(&mut self) -> bool {
        if self.phase != SessionPhase::Education || self.pending.is_some() {
            return false;
        }
        if self.stats.battery == 0 {
            self.set_phase(SessionPhase::GameOver);
            info!(
                episode = self.episode_id,
                score = self.stats.score,
                "session over"
            );
        } else {
            self.queue.advance();
            self.set_phase(SessionPhase::Playing);
            self.check_supply();
        }
        true
    }

    fn request_exit(&mut self) -> bool {
        if self.phase != SessionPhase::Playing || self.exit_prompt {
            return false;
        }
        self.exit_prompt = true;
        true
    }

    fn confirm_exit(&mut self) -> bool {
        if self.phase != SessionPhase::Playing || !self.exit_prompt {
            return false;
        }
        self.exit_prompt = false;
        self.pending = None;
        self.feedback = None;
        self.set_phase(SessionPhase::Menu);
        true
    }

    fn cancel_exit(&mut self) -> bool {
        if !self.exit_prompt {
            return false;
        }
        self.exit_prompt = false;
        true
    }

    fn shutdown(&mut self) -> bool {
        if self.phase != SessionPhase::Menu {
            return false;
        }
        self.set_phase(SessionPhase::Shutdown);
        true
    }

    fn power_on(&mut self) -> bool {
        if self.phase != SessionPhase::Shutdown {
            return false;
        }
        self.set_phase(SessionPhase::Menu);
        true
    }

    /// Advance the session clock and fire a due resolution.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.clock_ms += u64::from(elapsed_ms);

        if let Some(pending) = self.pending {
            if self.clock_ms >= pending.due_ms {
                self.pending = None;
                self.feedback = None;
                match pending.resolution {
                    Resolution::Advance => {
                        self.queue.advance();
                    }
                    Resolution::Educate => {
                        self.set_phase(SessionPhase::Education);
                    }
                }
            }
        }

        if self.phase == SessionPhase::Playing {
            self.check_supply();
        }
    }

    fn check_supply(&mut self) {
        if self.outbox.is_some() {
            return;
        }
        if let Some(ticket) = self.supplier.poll(&self.queue, self.stats.rank) {
            self.outbox = Some(ticket);
            self.push_event(SessionEvent::ReplenishRequested { rank: ticket.rank });
        }
    }

    /// Take the replenishment request waiting to be sent to the generator.
    pub fn take_replenish_request(&mut self) -> Option<ReplenishTicket> {
        self.outbox.take()
    }

    /// Apply a generator result for `ticket`.
    pub fn complete_replenish(
        &mut self,
        ticket: ReplenishTicket,
        result: Result<Vec<ContentItem>, SupplyError>,
    ) -> SupplyOutcome {
        let outcome = self.supplier.complete(&mut self.queue, ticket, result);
        if outcome != SupplyOutcome::Stale {
            self.push_event(SessionEvent::Replenished(outcome));
            if self.phase == SessionPhase::Playing {
                self.check_supply();
            }
        }
        outcome
    }

    /// Drain presentation events accumulated since the last call.
    pub fn drain_events(&mut self) -> EventBuf {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            stats: self.stats,
            episode_id: self.episode_id,
            cursor: self.queue.cursor(),
            queue_len: self.queue.len(),
            current: self.queue.current().cloned(),
            last_correction: self.last_correction.clone(),
            feedback: self.feedback,
            processing: self.pending.is_some(),
            exit_prompt: self.exit_prompt,
            syncing: self.is_syncing(),
            next_rank: next_threshold(self.stats.score),
        }
    }

    fn set_phase(&mut self, to: SessionPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        // The exit prompt only exists on the playing screen.
        if to != SessionPhase::Playing {
            self.exit_prompt = false;
        }
        info!(from = from.as_str(), to = to.as_str(), "phase changed");
        self.push_event(SessionEvent::PhaseChanged { from, to });
    }

    fn push_event(&mut self, event: SessionEvent) {
        if self.events.try_push(event).is_err() {
            warn!(?event, "session event buffer full, dropping event");
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
