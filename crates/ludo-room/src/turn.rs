//! The turn rule: who rolls after a given roll.

use crate::RoomConfig;

/// Decides the next turn index after a roll.
///
/// Pure and copyable so the relay and the offline client apply the same
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRule {
    /// A six keeps the turn.
    pub extra_roll_on_six: bool,
}

impl TurnRule {
    /// Returns the index of the player who rolls next.
    ///
    /// With `roster_len == 0` there is nobody to rotate to and the result
    /// is `0`; callers delete empty rooms before this can matter.
    pub fn next(&self, current: usize, roster_len: usize, rolled: u8) -> usize {
        if self.extra_roll_on_six && rolled == 6 {
            return current;
        }
        (current + 1).checked_rem(roster_len).unwrap_or(0)
    }
}

impl Default for TurnRule {
    fn default() -> Self {
        Self {
            extra_roll_on_six: true,
        }
    }
}

impl From<&RoomConfig> for TurnRule {
    fn from(config: &RoomConfig) -> Self {
        Self {
            extra_roll_on_six: config.extra_roll_on_six,
        }
    }
}
