//! TCP server for remote front ends
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::runtime::{InboundCommand, InboundPayload, OutboundMessage};
use crate::types::Command;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("CYBER_SHIELD_AI_HOST").unwrap_or(defaults.host);
        let port = env::var("CYBER_SHIELD_AI_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let max_pending_commands = env::var("CYBER_SHIELD_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            max_pending_commands,
            ..defaults
        }
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<u64>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("CYBER_SHIELD_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    async fn is_handshaken(&self, client_id: u64) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    async fn is_controller(&self, client_id: u64) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Enforce strictly increasing seq per client.
    async fn check_and_update_seq(&self, client_id: u64, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };

        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn send_to(&self, client_id: u64, msg: ServerMessage) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    async fn broadcast(&self, msg: ServerMessage) {
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
            let _ = c.tx.send(msg.clone());
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: u64,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ServerMessage>,
}

/// Start the TCP server
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0u64;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClient { client_id, msg } => {
                        state.send_to(client_id, msg).await
                    }
                    OutboundMessage::Broadcast { msg } => state.broadcast(msg).await,
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, Arc::clone(&state), command_tx).await
            {
                warn!(client_id, error = %e, "client error");
            }
            release_client(&state, client_id).await;
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: u64,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let line = match msg.to_json() {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "failed to serialize outbound message");
                    continue;
                }
            };
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let reply = |msg: ServerMessage| {
        let _ = tx.send(msg);
    };
    let reply_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ServerMessage::Error(create_error(seq, code, message)));
    };

    // Handle incoming messages
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(client_id, line = trimmed, "received");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    reply_error(hello.seq, ErrorCode::InvalidSeq, "seq must be strictly increasing");
                    continue;
                }

                let expected_major = state
                    .config
                    .protocol_version
                    .split('.')
                    .next()
                    .unwrap_or_default();
                if hello.protocol_version.split('.').next() != Some(expected_major) {
                    reply_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                {
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.stream_observations;
                    }
                }

                // First client to hello becomes controller
                let role = {
                    let mut controller = state.controller.write().await;
                    match *controller {
                        None => {
                            *controller = Some(client_id);
                            info!(client_id, client = %hello.client.name, "client is now controller");
                            AssignedRole::Controller
                        }
                        Some(id) if id == client_id => AssignedRole::Controller,
                        Some(_) => AssignedRole::Observer,
                    }
                };

                reply(ServerMessage::Welcome(create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id,
                    role,
                )));

                // Initial observation, produced by the game loop.
                if hello.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::Snapshot,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    reply_error(cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }

                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reply_error(cmd.seq, ErrorCode::InvalidSeq, "seq must be strictly increasing");
                    continue;
                }

                if !state.is_controller(client_id).await {
                    reply_error(cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let Some(command) = Command::from_str(&cmd.command) else {
                    reply_error(
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        &format!("Unknown command: {}", cmd.command),
                    );
                    continue;
                };

                // Backpressure: bounded queue. The game loop acks once applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(command),
                    })
                    .is_err()
                {
                    reply_error(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, unknown.seq).await
                {
                    reply_error(unknown.seq, ErrorCode::InvalidSeq, "seq must be strictly increasing");
                    continue;
                }
                reply_error(unknown.seq, ErrorCode::InvalidMessage, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply_error(seq, ErrorCode::InvalidMessage, &format!("JSON parse error: {}", e));
            }
        }
    }

    // Stop the writer once queued replies are flushed.
    {
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);
    }
    drop(tx);
    let _ = write_task.await;

    Ok(())
}

/// Remove a client and promote a new controller if it held control.
async fn release_client(state: &ServerState, client_id: u64) {
    let mut controller = state.controller.write().await;
    let mut clients = state.clients.write().await;

    clients.retain(|c| c.id != client_id);

    if *controller == Some(client_id) {
        // Promote the longest-connected handshaken client.
        let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
        *controller = next_id;
        match next_id {
            Some(new_id) => info!(client_id = new_id, "controller promoted"),
            None => info!(client_id, "controller released"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 7777);
        assert_eq!(c.protocol_version, PROTOCOL_VERSION);
        assert_eq!(c.max_pending_commands, 10);
    }

    #[tokio::test]
    async fn test_seq_must_increase() {
        let state = ServerState::new(ServerConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        state.clients.write().await.push(ClientHandle {
            id: 1,
            addr: "127.0.0.1:1".parse().unwrap(),
            stream_observations: true,
            handshaken: true,
            last_seq: Some(3),
            tx,
        });

        assert!(!state.check_and_update_seq(1, 3).await);
        assert!(!state.check_and_update_seq(1, 2).await);
        assert!(state.check_and_update_seq(1, 4).await);
        assert!(!state.check_and_update_seq(1, 4).await);
    }

    #[tokio::test]
    async fn test_release_promotes_handshaken_client() {
        let state = ServerState::new(ServerConfig::default());
        for (id, handshaken) in [(1u64, true), (2, false), (3, true)] {
            let (tx, _rx) = mpsc::unbounded_channel();
            state.clients.write().await.push(ClientHandle {
                id,
                addr: "127.0.0.1:1".parse().unwrap(),
                stream_observations: true,
                handshaken,
                last_seq: None,
                tx,
            });
        }
        *state.controller.write().await = Some(1);

        release_client(&state, 1).await;
        assert_eq!(*state.controller.read().await, Some(3));

        release_client(&state, 3).await;
        assert_eq!(*state.controller.read().await, None);
    }
}
