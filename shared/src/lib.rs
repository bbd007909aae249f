use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fallback drawing-surface size used until the server supplies a
/// [`GameConfig`] of its own.
pub const DEFAULT_FIELD_WIDTH: i32 = 800;
pub const DEFAULT_FIELD_HEIGHT: i32 = 400;
pub const DEFAULT_PADDLE_WIDTH: i32 = 10;
pub const DEFAULT_PADDLE_HEIGHT: i32 = 100;
pub const DEFAULT_BALL_RADIUS: i32 = 10;

/// A player's assigned side for the duration of a match.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player1,
    Player2,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player1 => write!(f, "player1"),
            Role::Player2 => write!(f, "player2"),
        }
    }
}

/// Server-declared stage of a match. The client never self-transitions;
/// whatever the latest `game_state` frame says is the phase.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Waiting,
    Starting,
    Playing,
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Waiting => write!(f, "waiting"),
            SessionPhase::Starting => write!(f, "starting"),
            SessionPhase::Playing => write!(f, "playing"),
            SessionPhase::Finished => write!(f, "finished"),
        }
    }
}

/// How a finished match ended.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    Normal,
    OpponentDisconnected,
}

/// Paddle movement directions, carried on the wire as the key names the
/// original browser client sent.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paddle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ball {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

/// Field-layout parameters. Optional in any `game_state` frame; once
/// received it replaces the previous configuration wholesale.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub field_width: i32,
    pub field_height: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    pub ball_radius: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            paddle_width: DEFAULT_PADDLE_WIDTH,
            paddle_height: DEFAULT_PADDLE_HEIGHT,
            ball_radius: DEFAULT_BALL_RADIUS,
        }
    }
}

/// The `state` object of a `game_state` frame: one complete, self-contained
/// snapshot of renderable match state. Snapshots replace each other
/// wholesale; nothing is diffed or merged.
///
/// `start_time` is only meaningful while `state` is `starting`, and
/// `winner`/`win_reason` only while it is `finished`. Everything except the
/// phase itself is optional so a bare lobby frame (`{"state":"waiting"}`)
/// parses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteState {
    pub state: SessionPhase,
    /// Elapsed match time in whole seconds.
    #[serde(default)]
    pub game_time: u64,
    #[serde(default)]
    pub score1: u32,
    #[serde(default)]
    pub score2: u32,
    #[serde(default)]
    pub paddle1: Paddle,
    #[serde(default)]
    pub paddle2: Paddle,
    #[serde(default)]
    pub balls: Vec<Ball>,
    /// Absolute wall-clock milliseconds at which play begins.
    #[serde(default)]
    pub start_time: Option<u64>,
    #[serde(default)]
    pub winner: Option<Role>,
    #[serde(default)]
    pub win_reason: Option<WinReason>,
}

/// Frames the client sends. All timestamps are monotonic microseconds from
/// the client's own clock; the server only ever echoes them back.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Name registration, sent immediately after the connection opens.
    SetName { name: String },
    /// Latency probe. `probe_id` correlates the eventual pong with this
    /// exact probe, so a late reply can never be mistaken for a fresh one.
    Ping {
        timestamp: u64,
        #[serde(rename = "probeId")]
        probe_id: u64,
    },
    /// Paddle input, forwarded verbatim; the server decides whether a move
    /// is meaningful in the current phase.
    Move {
        direction: MoveDirection,
        role: Role,
        #[serde(rename = "sendTime")]
        send_time: u64,
    },
}

/// Frames the server sends.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Identity assignment. May arrive at any point; re-assignment simply
    /// overwrites the previous identity.
    ClientId {
        role: Role,
        #[serde(default)]
        name: Option<String>,
    },
    /// Reply to a `ping`, echoing both the timestamp and the probe id.
    Pong {
        #[serde(rename = "originalTimestamp")]
        original_timestamp: u64,
        #[serde(rename = "probeId")]
        probe_id: u64,
    },
    /// Authoritative snapshot broadcast. `seq` increases monotonically per
    /// connection; consumers must drop any frame whose `seq` is not greater
    /// than the last one they applied.
    GameState {
        seq: u64,
        state: RemoteState,
        #[serde(default)]
        config: Option<GameConfig>,
    },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serializes an outbound message to a JSON text frame.
pub fn encode(message: &ClientMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

/// Total classification of an inbound text frame: either a known message
/// variant with a valid payload, or an error the caller logs and drops.
/// Unknown `type` tags, unknown enum strings and missing required fields
/// all land in the error arm; extra fields are tolerated.
pub fn decode(frame: &str) -> Result<ServerMessage, ProtocolError> {
    Ok(serde_json::from_str(frame)?)
}
