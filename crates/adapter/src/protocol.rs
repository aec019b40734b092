//! Protocol module - JSON message types for remote front ends
//!
//! Line-delimited JSON over TCP. Every message has: type, seq (sequence
//! number), ts (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::core::SessionSnapshot;
use crate::types::{ContentItem, Feedback, PlayerStats, RankTier, SessionPhase};

pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    /// Receive an observation after every state change.
    #[serde(default = "default_stream")]
    pub stream_observations: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Session command (`start`, `decideGenuine`, `decideFalse`, `continue`, `exit`,
/// `confirmExit`, `cancelExit`, `restart`, `shutdown`, `powerOn`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub command: String,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedRole {
    Controller,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    /// Command applied.
    Ok,
    /// Command not valid in the current phase; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    InvalidCommand,
    InvalidMessage,
    InvalidSeq,
    Backpressure,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
}

/// Command acknowledgment, sent once the game loop has applied the command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// The visible face of a card. Ground truth and rationale stay hidden until
/// the card is shown on the education screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: String,
    pub headline: String,
    pub source: String,
    pub url: String,
    pub content: String,
    pub image_url: String,
}

impl From<&ContentItem> for CardView {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id.clone(),
            headline: item.headline.clone(),
            source: item.source.clone(),
            url: item.url.clone(),
            content: item.content.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextRank {
    pub rank: RankTier,
    pub label: String,
    pub score: u32,
}

/// Full session observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub phase: SessionPhase,
    pub stats: PlayerStats,
    pub rank_label: String,
    pub cursor: usize,
    pub queue_len: usize,
    pub card: Option<CardView>,
    pub correction: Option<ContentItem>,
    pub feedback: Option<Feedback>,
    pub processing: bool,
    pub exit_prompt: bool,
    pub syncing: bool,
    pub next_rank: Option<NextRank>,
}

/// Any message the game sends.
#[derive(Debug, Clone)]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(Box<ObservationMessage>),
}

impl ServerMessage {
    /// Serialize as a single JSON line (without the trailing newline).
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            ServerMessage::Welcome(m) => serde_json::to_string(m),
            ServerMessage::Ack(m) => serde_json::to_string(m),
            ServerMessage::Error(m) => serde_json::to_string(m),
            ServerMessage::Observation(m) => serde_json::to_string(m),
        }
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if msg_type != "hello" && msg_type != "command" {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage { seq }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

/// Pull `seq` out of a line that failed to parse, for the error reply.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        stream_observations: true,
    }
}

/// Create a command message
pub fn create_command(seq: u64, command: &str) -> CommandMessage {
    CommandMessage {
        msg_type: CommandType::Command,
        seq,
        ts: current_timestamp_ms(),
        command: command.to_string(),
    }
}

pub fn create_welcome(seq: u64, protocol_version: &str, client_id: u64, role: AssignedRole) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id,
        role,
    }
}

/// Create an ack for the command with sequence number `seq`
pub fn create_ack(seq: u64, applied: bool) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        status: if applied { AckStatus::Ok } else { AckStatus::Ignored },
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Build an observation from a session snapshot
pub fn build_observation(seq: u64, snapshot: &SessionSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        episode_id: snapshot.episode_id,
        phase: snapshot.phase,
        stats: snapshot.stats,
        rank_label: snapshot.stats.rank.label().to_string(),
        cursor: snapshot.cursor,
        queue_len: snapshot.queue_len,
        card: snapshot.current.as_ref().map(CardView::from),
        correction: snapshot.last_correction.clone(),
        feedback: snapshot.feedback,
        processing: snapshot.processing,
        exit_prompt: snapshot.exit_prompt,
        syncing: snapshot.syncing,
        next_rank: snapshot.next_rank.map(|(rank, score)| NextRank {
            rank,
            label: rank.label().to_string(),
            score,
        }),
    }
}

pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Session, SessionConfig};
    use crate::types::Command;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"web-ui","version":"1.0.0"},"protocol_version":"1.0.0"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "web-ui");
                assert!(msg.stream_observations);
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_parse_command() {
        let json = r#"{"type":"command","seq":2,"ts":1234567900,"command":"decideFalse"}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.seq, 2);
                assert_eq!(msg.command, "decideFalse");
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        let json = r#"{"type":"dance","seq":9}"#;
        match parse_message(json).unwrap() {
            ParsedMessage::Unknown(u) => assert_eq!(u.seq, 9),
            _ => panic!("Expected Unknown message"),
        }
    }

    #[test]
    fn test_parse_invalid_command_shape() {
        let json = r#"{"type":"command","seq":3}"#;
        assert!(parse_message(json).is_err());
        assert_eq!(extract_seq_best_effort(json), Some(3));
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "x"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"seq":"a"}"#), None);
        assert_eq!(extract_seq_best_effort("garbage"), None);
    }

    #[test]
    fn test_ack_and_error_serialization() {
        let v = serde_json::to_value(create_ack(5, true)).unwrap();
        assert_eq!(v["type"], "ack");
        assert_eq!(v["seq"], 5);
        assert_eq!(v["status"], "ok");

        let v = serde_json::to_value(create_ack(6, false)).unwrap();
        assert_eq!(v["status"], "ignored");

        let v = serde_json::to_value(create_error(7, ErrorCode::NotController, "observer")).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(v["code"], "not_controller");
    }

    #[test]
    fn test_observation_hides_ground_truth() {
        let mut session = Session::new(SessionConfig::seeded(3));
        session.apply(Command::Start);
        let obs = build_observation(1, &session.snapshot());
        let v = serde_json::to_value(&obs).unwrap();

        assert_eq!(v["type"], "observation");
        assert_eq!(v["phase"], "playing");
        assert_eq!(v["stats"]["battery"], 100);
        assert_eq!(v["stats"]["rank"], "novice");
        assert_eq!(v["rank_label"], "Novice Scout");
        assert!(v["card"]["headline"].is_string());
        assert!(v["card"].get("type").is_none());
        assert!(v["card"].get("explanation").is_none());
        assert_eq!(v["next_rank"]["score"], 500);
    }
}
