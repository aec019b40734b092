//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::error;

use crate::protocol::ServerMessage;
use crate::server::{run_server, ServerConfig, ServerState};
use crate::types::Command;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: u64,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPayload {
    /// Apply a session command and ack it.
    Command(Command),
    /// Send the current observation to this client.
    Snapshot,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: u64, msg: ServerMessage },
    /// Delivered to every handshaken client that streams observations.
    Broadcast { msg: ServerMessage },
}

/// Running adapter instance.
pub struct Adapter {
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Spawn the server on `handle`.
    pub fn start(config: ServerConfig, handle: &Handle) -> Self {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        handle.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                error!(error = %e, "adapter server stopped");
            }
        });

        Self { cmd_rx, out_tx }
    }

    /// Start the adapter from environment variables.
    ///
    /// Returns None if `CYBER_SHIELD_AI_DISABLED` is set.
    pub fn start_from_env(handle: &Handle) -> Option<Self> {
        if ServerState::is_disabled() {
            return None;
        }
        Some(Self::start(ServerConfig::from_env(), handle))
    }

    /// Build an adapter around channels owned by the caller.
    pub fn from_channels(
        cmd_rx: mpsc::Receiver<InboundCommand>,
        out_tx: mpsc::UnboundedSender<OutboundMessage>,
    ) -> Self {
        Self { cmd_rx, out_tx }
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
