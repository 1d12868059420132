//! Room configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by every room in a registry.
///
/// The defaults are the classic four-player Ludo table with six-character
/// room codes. Tests shrink `max_players` or switch off the extra roll to
/// reach edge cases quickly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Minimum players required before the host may start.
    pub min_players: usize,

    /// Maximum players allowed in a room.
    pub max_players: usize,

    /// Length of generated room codes.
    pub code_len: usize,

    /// Rolling a six keeps the turn with the same player.
    pub extra_roll_on_six: bool,
}

impl RoomConfig {
    /// Checks the limits before a registry is built on them.
    ///
    /// # Errors
    /// - [`RoomConfigError::NoCodeLength`] if `code_len` is 0
    /// - [`RoomConfigError::TooFewPlayers`] if `min_players` is below 2
    /// - [`RoomConfigError::PlayerLimits`] if `max_players < min_players`
    pub fn validate(&self) -> Result<(), RoomConfigError> {
        if self.code_len == 0 {
            return Err(RoomConfigError::NoCodeLength);
        }
        if self.min_players < 2 {
            return Err(RoomConfigError::TooFewPlayers(self.min_players));
        }
        if self.max_players < self.min_players {
            return Err(RoomConfigError::PlayerLimits {
                min: self.min_players,
                max: self.max_players,
            });
        }
        Ok(())
    }
}

/// A [`RoomConfig`] that no registry should run with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomConfigError {
    #[error("code_len must be at least 1")]
    NoCodeLength,

    #[error("min_players must be at least 2, got {0}")]
    TooFewPlayers(usize),

    #[error("max_players ({max}) is below min_players ({min})")]
    PlayerLimits { min: usize, max: usize },
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 4,
            code_len: 6,
            extra_roll_on_six: true,
        }
    }
}
