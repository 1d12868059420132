//! Core protocol types for the relay's wire format.
//!
//! Every type here is serialized into a WebSocket text frame or read out of
//! one. The event names and camelCase field names are what browser clients
//! already speak, so changing a serde attribute here is a protocol change.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The wire identity of a player.
///
/// The relay derives it from the transport's connection id, one per
/// connection, so a client can never pick its own. `#[serde(transparent)]`
/// makes `PlayerId(42)` serialize as just `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A short, human-enterable room code such as `"K7Q2ZD"`.
///
/// Codes are normalized to trimmed uppercase whenever one is built from a
/// string (including during deserialization), so a player typing
/// `" k7q2zd"` still lands in the right room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Returns the normalized code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }
}

impl From<&str> for RoomCode {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one of a player's pieces on the board.
///
/// Opaque to the relay: it forwards the number without checking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece-{}", self.0)
    }
}

/// One roster entry as clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    /// Only ever set by the offline simulation; omitted from the wire when
    /// false.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_bot: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ---------------------------------------------------------------------------
// Recipient: who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies which members of a room receive a server event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every member of the room.
    All,

    /// One specific member.
    Player(PlayerId),

    /// Everyone except the given member. Used for "X did something"
    /// notices the actor already knows about.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if a member with this id should get the event.
    pub fn includes(&self, player_id: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(target) => *target == player_id,
            Self::AllExcept(excluded) => *excluded != player_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends to the relay.
///
/// `#[serde(tag = "event", content = "data")]` produces "adjacently
/// tagged" JSON:
///   `{ "event": "joinRoom", "data": { "roomId": "K7Q2ZD", "playerName": "Bob" } }`
///
/// The `playerId` fields are whatever the client remembers from its last
/// `roomCreated`/`roomJoined`. The relay ignores them and uses the
/// connection's own identity, so they are parsed leniently: a number, a
/// numeric string, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    CreateRoom {
        player_name: String,
    },
    JoinRoom {
        room_id: RoomCode,
        player_name: String,
    },
    StartGame {
        room_id: RoomCode,
        #[serde(
            default,
            deserialize_with = "lenient_player_id",
            skip_serializing_if = "Option::is_none"
        )]
        player_id: Option<PlayerId>,
    },
    RollDice {
        room_id: RoomCode,
        #[serde(
            default,
            deserialize_with = "lenient_player_id",
            skip_serializing_if = "Option::is_none"
        )]
        player_id: Option<PlayerId>,
    },
    MovePiece {
        room_id: RoomCode,
        #[serde(
            default,
            deserialize_with = "lenient_player_id",
            skip_serializing_if = "Option::is_none"
        )]
        player_id: Option<PlayerId>,
        piece_id: PieceId,
    },
    LeaveRoom {
        room_id: RoomCode,
        #[serde(
            default,
            deserialize_with = "lenient_player_id",
            skip_serializing_if = "Option::is_none"
        )]
        player_id: Option<PlayerId>,
    },
}

impl ClientEvent {
    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "createRoom",
            Self::JoinRoom { .. } => "joinRoom",
            Self::StartGame { .. } => "startGame",
            Self::RollDice { .. } => "rollDice",
            Self::MovePiece { .. } => "movePiece",
            Self::LeaveRoom { .. } => "leaveRoom",
        }
    }
}

/// Events the relay (or the offline simulation) sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Reply to `createRoom`, sent only to the creator.
    RoomCreated {
        room_id: RoomCode,
        player_id: PlayerId,
        players: Vec<PlayerSummary>,
    },

    /// Reply to `joinRoom`, sent only to the joiner.
    RoomJoined {
        room_id: RoomCode,
        player_id: PlayerId,
        players: Vec<PlayerSummary>,
    },

    /// Sent to the members who were already in the room.
    PlayerJoined {
        players: Vec<PlayerSummary>,
        player_name: String,
    },

    /// Sent to the remaining members after a leave or disconnect.
    /// `current_player` is present once the game has started, since a
    /// departure can shift whose turn it is.
    PlayerLeft {
        players: Vec<PlayerSummary>,
        player_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_player: Option<usize>,
    },

    GameStarted {
        current_player: usize,
        players: Vec<PlayerSummary>,
    },

    DiceRolled {
        value: u8,
        player_id: PlayerId,
        player_name: String,
        current_player: usize,
    },

    /// `player_name` is `None` when the sender is not a room member.
    PieceMoved {
        player_id: PlayerId,
        piece_id: PieceId,
        player_name: Option<String>,
    },

    /// A request failed. Only the requesting connection receives it.
    Error {
        message: String,
    },
}

/// Accepts a number, a numeric string, or null/absent. Anything else
/// (an opaque socket id string, a bool) becomes `None`.
fn lenient_player_id<'de, D>(deserializer: D) -> Result<Option<PlayerId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPlayerId {
        Number(u64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let raw = Option::<RawPlayerId>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawPlayerId::Number(n) => Some(PlayerId(n)),
        RawPlayerId::Text(s) => s.trim().parse().ok().map(PlayerId),
        RawPlayerId::Other(_) => None,
    }))
}

// =========================================================================
// Tests
// =========================================================================
