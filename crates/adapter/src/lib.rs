//! Adapter crate - the session's connections to the outside world
//!
//! Two collaborators live outside the deterministic core:
//!
//! - a **content generator** that produces new cards for the player's rank
//!   ([`generator`]), run off the game loop by a [`GeneratorWorker`]
//! - **remote front ends** that render observations and send commands over a
//!   line-delimited JSON protocol on TCP ([`protocol`], [`server`])
//!
//! The [`Driver`] ties both to one [`Session`](crate::core::Session).
//!
//! # Protocol Overview
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7777)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends an observation whenever the
//!    session changes
//! 5. **Commanding**: Controller sends commands; each is acked once applied
//!
//! # Environment Variables
//!
//! - `CYBER_SHIELD_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `CYBER_SHIELD_AI_PORT`: Port number (default: 7777)
//! - `CYBER_SHIELD_AI_MAX_PENDING`: Bounded command queue (default: 10)
//! - `CYBER_SHIELD_AI_DISABLED`: Set to "1" or "true" to disable the server
//! - `CYBER_SHIELD_GENERATOR_URL`: Content endpoint; offline when unset
//! - `CYBER_SHIELD_GENERATOR_TOKEN`: Optional bearer token
//! - `CYBER_SHIELD_GENERATOR_TIMEOUT_MS`: Request timeout (default: 10000)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"web-ui","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,"role":"controller"}
//! Server -> Client: {"type":"observation","seq":1,"ts":1234567891,"phase":"menu",...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"command":"start"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1234567892,"status":"ok"}
//! ```

pub mod driver;
pub mod generator;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use cyber_shield_core as core;
pub use cyber_shield_types as types;

pub use driver::Driver;
pub use generator::{
    parse_batch, Completion, ConfiguredGenerator, ContentGenerator, GeneratorConfig,
    GeneratorWorker, HttpGenerator, OfflineGenerator,
};
pub use protocol::PROTOCOL_VERSION;
pub use runtime::{Adapter, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{run_server, ServerConfig, ServerState};
