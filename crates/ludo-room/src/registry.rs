//! Room registry: creates rooms, tracks membership, deletes empty rooms.

use std::collections::HashMap;

use ludo_protocol::{PlayerId, PlayerSummary, Recipient, RoomCode, ServerEvent};

use crate::code::code_space;
use crate::{
    Dice, Player, PlayerSender, RandomDice, Room, RoomConfig, RoomError,
    generate_code,
};

/// Redraws allowed before `create` gives up on finding a free code.
const MAX_CODE_DRAWS: usize = 1000;

/// The result of a successful create or join: what the caller needs for
/// its `roomCreated` / `roomJoined` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    pub room_id: RoomCode,
    pub player_id: PlayerId,
    pub players: Vec<PlayerSummary>,
}

/// What happened when a player left a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomCode,
    pub player_name: String,
    /// The room was deleted because the player was its last member.
    pub room_closed: bool,
}

/// Owns every live room.
///
/// One instance lives inside the server state behind a mutex; tests build
/// their own. Each method is one atomic registry operation: it validates,
/// mutates and pushes the resulting broadcasts into the members' channels
/// before returning.
pub struct RoomRegistry {
    pub(crate) rooms: HashMap<RoomCode, Room>,

    /// Maps each player to the room they're currently in.
    /// A player can be in at most ONE room at a time.
    pub(crate) memberships: HashMap<PlayerId, RoomCode>,

    pub(crate) config: RoomConfig,
    pub(crate) dice: Box<dyn Dice>,
}

impl RoomRegistry {
    /// Creates an empty registry rolling a fair die.
    pub fn new(config: RoomConfig) -> Self {
        Self::with_dice(config, Box::new(RandomDice))
    }

    /// Creates an empty registry with an injected die.
    pub fn with_dice(config: RoomConfig, dice: Box<dyn Dice>) -> Self {
        Self {
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            config,
            dice,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Creates a room with `player_id` as its only member and host.
    ///
    /// A player already sitting in another room leaves it first.
    ///
    /// # Errors
    /// [`RoomError::NoCodeAvailable`] if no free room code can be drawn.
    /// The player keeps their current room in that case.
    pub fn create(
        &mut self,
        player_id: PlayerId,
        player_name: &str,
        sender: PlayerSender,
    ) -> Result<Joined, RoomError> {
        let room_id = self.unused_code()?;
        self.disconnect(player_id);

        let room = Room::new(room_id.clone(), Player::new(player_id, player_name, sender));
        let players = room.roster();

        self.rooms.insert(room_id.clone(), room);
        self.memberships.insert(player_id, room_id.clone());
        tracing::info!(%room_id, %player_id, player_name, "room created");

        Ok(Joined {
            room_id,
            player_id,
            players,
        })
    }

    /// Adds `player_id` to the room `code`.
    ///
    /// The existing members receive `playerJoined`; the joiner gets the
    /// returned roster for its own reply. Joining a started game is
    /// allowed and puts the player at the end of the rotation. A player in
    /// another room leaves it only once this join is known to succeed;
    /// joining the room you are already in just returns its roster.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] if no room has this code
    /// - [`RoomError::RoomFull`] if it already holds `max_players`
    pub fn join(
        &mut self,
        code: &RoomCode,
        player_id: PlayerId,
        player_name: &str,
        sender: PlayerSender,
    ) -> Result<Joined, RoomError> {
        let room = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        if room.contains(player_id) {
            return Ok(Joined {
                room_id: code.clone(),
                player_id,
                players: room.roster(),
            });
        }
        if room.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(code.clone()));
        }

        self.disconnect(player_id);

        let room = self
            .rooms
            .get_mut(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        room.push(Player::new(player_id, player_name, sender));
        let players = room.roster();
        room.broadcast(
            Recipient::AllExcept(player_id),
            &ServerEvent::PlayerJoined {
                players: players.clone(),
                player_name: player_name.to_owned(),
            },
        );

        self.memberships.insert(player_id, code.clone());
        tracing::info!(
            room_id = %code,
            %player_id,
            player_name,
            players = players.len(),
            "player joined"
        );

        Ok(Joined {
            room_id: code.clone(),
            player_id,
            players,
        })
    }

    /// Removes `player_id` from the room `code`.
    ///
    /// Deletes the room if it is now empty. Otherwise the remaining
    /// members receive `playerLeft` with the new roster (and, mid-game,
    /// the possibly shifted turn index). Returns `None` when the room does
    /// not exist or the player is not in it.
    pub fn leave(&mut self, code: &RoomCode, player_id: PlayerId) -> Option<Departure> {
        let room = self.rooms.get_mut(code)?;
        let removed = room.remove(player_id)?;
        self.memberships.remove(&player_id);

        if room.is_empty() {
            self.rooms.remove(code);
            tracing::info!(room_id = %code, %player_id, "last player left, room deleted");
            return Some(Departure {
                room_id: code.clone(),
                player_name: removed.name,
                room_closed: true,
            });
        }

        room.broadcast(
            Recipient::All,
            &ServerEvent::PlayerLeft {
                players: room.roster(),
                player_name: removed.name.clone(),
                current_player: room.is_started().then_some(room.current_player()),
            },
        );
        tracing::info!(
            room_id = %code,
            %player_id,
            host = %room.host(),
            players = room.len(),
            "player left"
        );

        Some(Departure {
            room_id: code.clone(),
            player_name: removed.name,
            room_closed: false,
        })
    }

    /// Removes `player_id` from whichever room holds it, if any.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Option<Departure> {
        let code = self.memberships.get(&player_id)?.clone();
        self.leave(&code, player_id)
    }

    pub fn room(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The room a player is currently in.
    pub fn room_of(&self, player_id: PlayerId) -> Option<&RoomCode> {
        self.memberships.get(&player_id)
    }

    /// Draws codes until one is not in use by a live room.
    fn unused_code(&self) -> Result<RoomCode, RoomError> {
        let len = self.config.code_len;
        if code_space(len).is_some_and(|space| self.rooms.len() >= space) {
            tracing::warn!(code_len = len, "every room code is in use");
            return Err(RoomError::NoCodeAvailable);
        }

        for _ in 0..MAX_CODE_DRAWS {
            let code = generate_code(len);
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
            tracing::debug!(%code, "room code collision, redrawing");
        }
        tracing::warn!(code_len = len, "gave up drawing a free room code");
        Err(RoomError::NoCodeAvailable)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl std::fmt::Debug for RoomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRegistry")
            .field("rooms", &self.rooms.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
