//! Turn relay: starting games, rolling dice and forwarding moves.
//!
//! These are the in-game operations on [`RoomRegistry`]. The relay knows
//! whose turn it is and nothing about the board: moves are forwarded
//! without any validation.

use ludo_protocol::{PieceId, PlayerId, Recipient, RoomCode, ServerEvent};

use crate::{RoomError, RoomRegistry, TurnRule};

/// The outcome of a successful roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    pub value: u8,
    /// Index of the player who rolls next.
    pub current_player: usize,
}

impl RoomRegistry {
    /// Starts the game in room `code` and broadcasts `gameStarted`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] if no room has this code
    /// - [`RoomError::NotHost`] if `player_id` is not the host
    /// - [`RoomError::AlreadyStarted`] if the game is running
    /// - [`RoomError::NotEnoughPlayers`] below `min_players`
    pub fn start_game(&mut self, code: &RoomCode, player_id: PlayerId) -> Result<(), RoomError> {
        let min_players = self.config.min_players;
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if room.host() != player_id {
            return Err(RoomError::NotHost);
        }
        if room.is_started() {
            return Err(RoomError::AlreadyStarted);
        }
        if room.len() < min_players {
            return Err(RoomError::NotEnoughPlayers(min_players));
        }

        room.start();
        room.broadcast(
            Recipient::All,
            &ServerEvent::GameStarted {
                current_player: room.current_player(),
                players: room.roster(),
            },
        );
        tracing::info!(room_id = %code, players = room.len(), "game started");
        Ok(())
    }

    /// Rolls for `player_id` and broadcasts `diceRolled` to the room.
    ///
    /// A six keeps the turn when the room config allows extra rolls;
    /// anything else passes it to the next seat.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] if no room has this code
    /// - [`RoomError::NotYourTurn`] if the game has not started or
    ///   another player holds the turn
    pub fn roll_dice(&mut self, code: &RoomCode, player_id: PlayerId) -> Result<DiceRoll, RoomError> {
        let rule = TurnRule::from(&self.config);
        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if !room.is_started() {
            return Err(RoomError::NotYourTurn);
        }
        let current = room.current_player();
        let roller = match room.players().get(current) {
            Some(player) if player.id == player_id => player.name.clone(),
            _ => return Err(RoomError::NotYourTurn),
        };

        let value = self.dice.roll();
        let next = rule.next(current, room.len(), value);
        room.set_current_player(next);

        room.broadcast(
            Recipient::All,
            &ServerEvent::DiceRolled {
                value,
                player_id,
                player_name: roller,
                current_player: next,
            },
        );
        tracing::debug!(room_id = %code, %player_id, value, next, "dice rolled");

        Ok(DiceRoll {
            value,
            current_player: next,
        })
    }

    /// Forwards a move to every other member of room `code`.
    ///
    /// Ownership, destination and turn are not checked. The sender's name
    /// is attached if it is a member.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no room has this code.
    pub fn move_piece(
        &mut self,
        code: &RoomCode,
        player_id: PlayerId,
        piece_id: PieceId,
    ) -> Result<(), RoomError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        room.broadcast(
            Recipient::AllExcept(player_id),
            &ServerEvent::PieceMoved {
                player_id,
                piece_id,
                player_name: room.player(player_id).map(|p| p.name.clone()),
            },
        );
        tracing::debug!(room_id = %code, %player_id, %piece_id, "piece moved");
        Ok(())
    }
}
