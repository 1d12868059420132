//! Error types for the room layer.
//!
//! The `Display` text of each variant is exactly what the client sees in
//! its `error { message }` event, so keep these strings stable.

use ludo_protocol::RoomCode;

/// Errors that can occur during room operations.
///
/// None of these end the connection. The relay reports them to the
/// requesting player and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No live room has this code.
    #[error("Room not found")]
    NotFound(RoomCode),

    /// The room already holds `max_players`.
    #[error("Room is full")]
    RoomFull(RoomCode),

    /// Only the host may start the game.
    #[error("Only host can start game")]
    NotHost,

    /// Fewer than `min_players` are present.
    #[error("Need at least {0} players")]
    NotEnoughPlayers(usize),

    /// The caller does not hold the turn (or the game has not started).
    #[error("Not your turn")]
    NotYourTurn,

    /// `start_game` on a room that is already running.
    #[error("Game already started")]
    AlreadyStarted,

    /// Every room code is taken, or redrawing gave up.
    #[error("No room codes available")]
    NoCodeAvailable,
}
