//! A single room: ordered roster, host and turn state.
//!
//! A `Room` is plain data owned by the [`RoomRegistry`](crate::RoomRegistry).
//! Each player carries the sending half of its connection's outbound
//! channel, so broadcasting is a loop of non-blocking `send`s.

use ludo_protocol::{PlayerId, PlayerSummary, Recipient, RoomCode, ServerEvent};
use tokio::sync::mpsc;

/// Channel sender for delivering events to one connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// A member of a room.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub(crate) sender: PlayerSender,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, sender: PlayerSender) -> Self {
        Self {
            id,
            name: name.into(),
            sender,
        }
    }

    /// The roster entry clients see.
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            is_bot: false,
        }
    }
}

/// One live room.
///
/// Invariants kept by the registry:
/// - `players` is in join order, which is also the turn order
/// - `current_player < players.len()` whenever the room is started
/// - `host` is always a member
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    players: Vec<Player>,
    host: PlayerId,
    started: bool,
    current_player: usize,
}

impl Room {
    /// Creates a room whose only member (and host) is `creator`.
    pub(crate) fn new(code: RoomCode, creator: Player) -> Self {
        Self {
            code,
            host: creator.id,
            players: vec![creator],
            started: false,
            current_player: 0,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn host(&self) -> PlayerId {
        self.host
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Index into `players` of whoever holds the turn.
    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.position(player_id).is_some()
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    fn position(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    /// The roster as sent on the wire.
    pub fn roster(&self) -> Vec<PlayerSummary> {
        self.players.iter().map(Player::summary).collect()
    }

    /// Sends `event` to every member selected by `recipient`.
    ///
    /// A member whose connection is already gone is skipped silently; its
    /// disconnect will remove it shortly.
    pub fn broadcast(&self, recipient: Recipient, event: &ServerEvent) {
        for player in self.players.iter().filter(|p| recipient.includes(p.id)) {
            let _ = player.sender.send(event.clone());
        }
    }

    pub(crate) fn push(&mut self, player: Player) {
        self.players.push(player);
    }

    pub(crate) fn start(&mut self) {
        self.started = true;
        self.current_player = 0;
    }

    pub(crate) fn set_current_player(&mut self, index: usize) {
        self.current_player = index;
    }

    /// Removes a member and repairs host and turn index.
    ///
    /// If the removed player was before the turn holder, the index shifts
    /// down so the same player keeps the turn. If the turn holder itself
    /// left, the turn passes to whoever now sits at that index, wrapping
    /// to the front.
    pub(crate) fn remove(&mut self, player_id: PlayerId) -> Option<Player> {
        let index = self.position(player_id)?;
        let removed = self.players.remove(index);

        if index < self.current_player {
            self.current_player -= 1;
        }
        if self.current_player >= self.players.len() {
            self.current_player = 0;
        }

        if self.host == player_id {
            if let Some(first) = self.players.first() {
                self.host = first.id;
            }
        }

        Some(removed)
    }
}
