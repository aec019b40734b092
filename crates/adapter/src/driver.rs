//! Driver - pumps remote commands, generator results and time into a session
//!
//! One `step` per frame, in this order:
//!
//! 1. apply queued adapter commands (acking each one)
//! 2. apply finished generator calls
//! 3. advance the session clock
//! 4. hand new replenishment tickets to the generator worker
//! 5. broadcast an observation if the snapshot changed

use tracing::debug;

use crate::core::{EventBuf, Session, SessionSnapshot};
use crate::generator::{ContentGenerator, GeneratorWorker};
use crate::protocol::{build_observation, create_ack, ServerMessage};
use crate::runtime::{Adapter, InboundPayload, OutboundMessage};
use crate::types::Command;

pub struct Driver<G> {
    session: Session,
    worker: GeneratorWorker<G>,
    adapter: Option<Adapter>,
    last_broadcast: Option<SessionSnapshot>,
    obs_seq: u64,
}

impl<G: ContentGenerator> Driver<G> {
    pub fn new(session: Session, worker: GeneratorWorker<G>, adapter: Option<Adapter>) -> Self {
        Self {
            session,
            worker,
            adapter,
            last_broadcast: None,
            obs_seq: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn worker(&self) -> &GeneratorWorker<G> {
        &self.worker
    }

    pub fn has_adapter(&self) -> bool {
        self.adapter.is_some()
    }

    /// Apply a local command (keyboard).
    pub fn apply(&mut self, command: Command) -> bool {
        let applied = self.session.apply(command);
        self.dispatch_requests();
        applied
    }

    /// Run one frame and return the presentation events it produced.
    pub fn step(&mut self, elapsed_ms: u32) -> EventBuf {
        self.pump_adapter();

        while let Some(done) = self.worker.try_recv() {
            let outcome = self.session.complete_replenish(done.ticket, done.result);
            debug!(?outcome, "replenishment completed");
        }

        self.session.tick(elapsed_ms);
        self.dispatch_requests();
        self.broadcast_if_changed();

        self.session.drain_events()
    }

    fn pump_adapter(&mut self) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };

        while let Some(inbound) = adapter.try_recv() {
            let msg = match inbound.payload {
                InboundPayload::Command(command) => {
                    let applied = self.session.apply(command);
                    ServerMessage::Ack(create_ack(inbound.seq, applied))
                }
                InboundPayload::Snapshot => {
                    self.obs_seq += 1;
                    let obs = build_observation(self.obs_seq, &self.session.snapshot());
                    ServerMessage::Observation(Box::new(obs))
                }
            };
            adapter.send(OutboundMessage::ToClient {
                client_id: inbound.client_id,
                msg,
            });
        }
    }

    fn dispatch_requests(&mut self) {
        if let Some(ticket) = self.session.take_replenish_request() {
            self.worker.request(ticket);
        }
    }

    fn broadcast_if_changed(&mut self) {
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };

        let snapshot = self.session.snapshot();
        if self.last_broadcast.as_ref() == Some(&snapshot) {
            return;
        }

        self.obs_seq += 1;
        let obs = build_observation(self.obs_seq, &snapshot);
        adapter.send(OutboundMessage::Broadcast {
            msg: ServerMessage::Observation(Box::new(obs)),
        });
        self.last_broadcast = Some(snapshot);
    }
}
