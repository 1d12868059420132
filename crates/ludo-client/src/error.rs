//! Error types for the client.
//!
//! Input and gating errors carry the texts a UI shows the player as-is.

use std::time::Duration;

use ludo_protocol::ProtocolError;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// `create_room` with a blank name.
    #[error("Please enter your name")]
    EmptyName,

    /// `join_room` with a blank name or room code.
    #[error("Please enter your name and room code")]
    MissingRoomCode,

    /// Joining needs the relay; the offline simulation has no other rooms.
    #[error("Not connected to server. Cannot join room.")]
    Offline,

    /// Rolling or moving while another player holds the turn.
    #[error("Not your turn!")]
    NotYourTurn,

    /// Clicking a piece from another player's seat.
    #[error("That's not your piece!")]
    NotYourPiece,

    /// The operation needs a room and the client is not in one.
    #[error("not in a room")]
    NoRoom,

    /// No answer within the request or connect timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The relay answered with an `error` event.
    #[error("{0}")]
    Rejected(String),

    /// The session ended.
    #[error("connection closed")]
    Closed,

    /// WebSocket failure talking to the relay.
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
