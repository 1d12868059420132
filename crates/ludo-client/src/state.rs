//! What the client knows about its room, rebuilt from server events.

use ludo_protocol::{PlayerId, PlayerSummary, RoomCode, ServerEvent};

/// The client's view of its room.
///
/// Only [`apply`](Self::apply) changes it, so it can never disagree with
/// the events the session delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub room_id: Option<RoomCode>,
    pub player_id: Option<PlayerId>,
    pub players: Vec<PlayerSummary>,
    pub current_player: usize,
    pub started: bool,
    pub last_roll: Option<u8>,
}

impl ClientState {
    /// Folds one event into the state.
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::RoomCreated {
                room_id,
                player_id,
                players,
            }
            | ServerEvent::RoomJoined {
                room_id,
                player_id,
                players,
            } => {
                *self = Self {
                    room_id: Some(room_id.clone()),
                    player_id: Some(*player_id),
                    players: players.clone(),
                    ..Self::default()
                };
            }
            ServerEvent::PlayerJoined { players, .. } => {
                self.players = players.clone();
            }
            ServerEvent::PlayerLeft {
                players,
                current_player,
                ..
            } => {
                self.players = players.clone();
                if let Some(index) = current_player {
                    self.current_player = *index;
                }
            }
            ServerEvent::GameStarted {
                current_player,
                players,
            } => {
                self.started = true;
                self.current_player = *current_player;
                self.players = players.clone();
            }
            ServerEvent::DiceRolled {
                value,
                current_player,
                ..
            } => {
                self.last_roll = Some(*value);
                self.current_player = *current_player;
            }
            ServerEvent::PieceMoved { .. } | ServerEvent::Error { .. } => {}
        }
    }

    /// Forgets the room, e.g. after leaving.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn in_room(&self) -> bool {
        self.room_id.is_some()
    }

    /// Our seat in the roster.
    pub fn my_index(&self) -> Option<usize> {
        let me = self.player_id?;
        self.players.iter().position(|p| p.id == me)
    }

    pub fn is_my_turn(&self) -> bool {
        self.started && self.my_index() == Some(self.current_player)
    }

    pub fn can_roll(&self) -> bool {
        self.is_my_turn()
    }

    /// The host is always the first seat; it may start once two players
    /// are present.
    pub fn can_start(&self) -> bool {
        !self.started && self.players.len() >= 2 && self.my_index() == Some(0)
    }

    pub fn current_player_name(&self) -> Option<&str> {
        self.players
            .get(self.current_player)
            .map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: u64, name: &str) -> PlayerSummary {
        PlayerSummary {
            id: PlayerId(id),
            name: name.into(),
            is_bot: false,
        }
    }

    fn in_lobby(me: u64) -> ClientState {
        let mut state = ClientState::default();
        state.apply(&ServerEvent::RoomJoined {
            room_id: RoomCode::from("ABC123"),
            player_id: PlayerId(me),
            players: vec![summary(1, "Alice"), summary(2, "Bob")],
        });
        state
    }

    #[test]
    fn test_apply_room_created_resets_previous_game() {
        let mut state = in_lobby(1);
        state.started = true;
        state.last_roll = Some(4);

        state.apply(&ServerEvent::RoomCreated {
            room_id: RoomCode::from("NEW000"),
            player_id: PlayerId(1),
            players: vec![summary(1, "Alice")],
        });

        assert_eq!(state.room_id, Some(RoomCode::from("NEW000")));
        assert!(!state.started);
        assert_eq!(state.last_roll, None);
        assert_eq!(state.players.len(), 1);
    }

    #[test]
    fn test_is_my_turn_follows_dice_rolled() {
        let mut state = in_lobby(2);
        assert!(!state.is_my_turn(), "nobody's turn before start");

        state.apply(&ServerEvent::GameStarted {
            current_player: 0,
            players: state.players.clone(),
        });
        assert!(!state.can_roll());
        assert_eq!(state.current_player_name(), Some("Alice"));

        state.apply(&ServerEvent::DiceRolled {
            value: 2,
            player_id: PlayerId(1),
            player_name: "Alice".into(),
            current_player: 1,
        });
        assert!(state.can_roll());
        assert_eq!(state.last_roll, Some(2));
    }

    #[test]
    fn test_can_start_only_for_first_seat_with_two_players() {
        assert!(in_lobby(1).can_start());
        assert!(!in_lobby(2).can_start());

        let mut alone = ClientState::default();
        alone.apply(&ServerEvent::RoomCreated {
            room_id: RoomCode::from("ABC123"),
            player_id: PlayerId(1),
            players: vec![summary(1, "Alice")],
        });
        assert!(!alone.can_start());
    }

    #[test]
    fn test_apply_player_left_updates_turn_index() {
        let mut state = in_lobby(2);
        state.apply(&ServerEvent::GameStarted {
            current_player: 1,
            players: state.players.clone(),
        });

        state.apply(&ServerEvent::PlayerLeft {
            players: vec![summary(2, "Bob")],
            player_name: "Alice".into(),
            current_player: Some(0),
        });

        assert_eq!(state.my_index(), Some(0));
        assert!(state.is_my_turn());
    }

    #[test]
    fn test_reset_clears_room() {
        let mut state = in_lobby(1);
        state.reset();
        assert!(!state.in_room());
        assert_eq!(state, ClientState::default());
    }
}
