//! Room registry and turn relay for the Ludo relay.
//!
//! The relay keeps every room in process memory. A room is a short code,
//! an ordered roster, a host and (once started) the index of whoever holds
//! the turn. The relay does not know the board: it rotates turns on dice
//! rolls and forwards moves to the other players verbatim.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: owns every room; create/join/leave/disconnect plus
//!   the turn operations (`start_game`, `roll_dice`, `move_piece`)
//! - [`Room`] / [`Player`]: one room's roster and turn state
//! - [`RoomConfig`]: player limits, code length, extra-roll rule
//! - [`Dice`]: injectable randomness ([`RandomDice`], [`ScriptedDice`])
//! - [`TurnRule`]: the pure "who rolls next" function, shared with the
//!   offline client
//!
//! All registry methods are synchronous. The server wraps the registry in
//! a single `tokio::sync::Mutex`, so every operation (including its
//! broadcasts) runs to completion before the next one starts.

mod code;
mod config;
mod dice;
mod error;
mod registry;
mod relay;
mod room;
mod turn;

pub use code::generate_code;
pub use config::{RoomConfig, RoomConfigError};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use error::RoomError;
pub use registry::{Departure, Joined, RoomRegistry};
pub use relay::DiceRoll;
pub use room::{Player, PlayerSender, Room};
pub use turn::TurnRule;
