//! Offline session: a one-room simulation with a bot opponent.
//!
//! Requests are answered immediately from an in-memory outbox. The bot is
//! driven lazily from [`next_event`](GameSession::next_event): when it is
//! the bot's move, `next_event` sleeps for the configured pause, rolls
//! for the bot and returns the roll. Nothing runs in the background.

use std::collections::VecDeque;

use ludo_protocol::{ClientEvent, PieceId, PlayerId, PlayerSummary, RoomCode, ServerEvent};
use ludo_room::{Dice, RandomDice, RoomConfig, RoomError, TurnRule, generate_code};
use rand::Rng;

use crate::{BotTiming, ClientError, GameSession};

/// The human player's id in an offline room.
pub const LOCAL_PLAYER: PlayerId = PlayerId(1);

/// The bot's id in an offline room.
pub const BOT_PLAYER: PlayerId = PlayerId(2);

/// Names the bot picks from when it sits down.
pub const BOT_NAMES: [&str; 4] = ["Robot Player", "AI Challenger", "Bot Buddy", "Computer"];

#[derive(Debug)]
struct LocalRoom {
    code: RoomCode,
    players: Vec<PlayerSummary>,
    started: bool,
    current_player: usize,
    bot_seated: bool,
    /// The bot's last roll was a six and it rolls again.
    bot_rerolls: bool,
}

impl LocalRoom {
    fn holder(&self) -> Option<&PlayerSummary> {
        self.players.get(self.current_player)
    }

    fn bot_holds_turn(&self) -> bool {
        self.started && self.holder().is_some_and(|p| p.is_bot)
    }
}

/// The offline stand-in for the relay.
pub struct LocalSession {
    timing: BotTiming,
    rule: TurnRule,
    dice: Box<dyn Dice>,
    room: Option<LocalRoom>,
    outbox: VecDeque<ServerEvent>,
}

impl LocalSession {
    /// A simulation rolling a fair die.
    pub fn new(timing: BotTiming) -> Self {
        Self::with_dice(timing, RandomDice)
    }

    /// A simulation rolling `dice`, for both the human and the bot.
    pub fn with_dice(timing: BotTiming, dice: impl Dice + 'static) -> Self {
        Self {
            timing,
            rule: TurnRule::from(&RoomConfig::default()),
            dice: Box::new(dice),
            room: None,
            outbox: VecDeque::new(),
        }
    }

    fn reject(&mut self, message: impl ToString) {
        self.outbox.push_back(ServerEvent::Error {
            message: message.to_string(),
        });
    }

    fn create(&mut self, player_name: String) {
        let code = generate_code(RoomConfig::default().code_len);
        let players = vec![PlayerSummary {
            id: LOCAL_PLAYER,
            name: player_name,
            is_bot: false,
        }];
        tracing::info!(room_id = %code, "offline room created");

        self.outbox.clear();
        self.outbox.push_back(ServerEvent::RoomCreated {
            room_id: code.clone(),
            player_id: LOCAL_PLAYER,
            players: players.clone(),
        });
        self.room = Some(LocalRoom {
            code,
            players,
            started: false,
            current_player: 0,
            bot_seated: false,
            bot_rerolls: false,
        });
    }

    fn start(&mut self, code: &RoomCode) {
        let Some(room) = self.room.as_mut().filter(|r| r.code == *code) else {
            return self.reject(RoomError::NotFound(code.clone()));
        };
        if room.started {
            return self.reject(RoomError::AlreadyStarted);
        }
        if room.players.len() < 2 {
            return self.reject(RoomError::NotEnoughPlayers(2));
        }

        room.started = true;
        room.current_player = 0;
        let event = ServerEvent::GameStarted {
            current_player: 0,
            players: room.players.clone(),
        };
        self.outbox.push_back(event);
    }

    fn roll(&mut self, code: &RoomCode) {
        let Some(room) = self.room.as_mut().filter(|r| r.code == *code) else {
            return self.reject(RoomError::NotFound(code.clone()));
        };
        let player_name = match room.holder() {
            Some(holder) if room.started && holder.id == LOCAL_PLAYER => holder.name.clone(),
            _ => return self.reject(RoomError::NotYourTurn),
        };

        let value = self.dice.roll();
        room.current_player = self.rule.next(room.current_player, room.players.len(), value);
        room.bot_rerolls = false;
        let event = ServerEvent::DiceRolled {
            value,
            player_id: LOCAL_PLAYER,
            player_name,
            current_player: room.current_player,
        };
        self.outbox.push_back(event);
    }

    /// Moves go to the other players only, and the bot ignores them, so
    /// nothing is queued for the mover.
    fn move_piece(&mut self, code: &RoomCode, piece_id: PieceId) {
        if self.room.as_ref().is_none_or(|r| r.code != *code) {
            return self.reject(RoomError::NotFound(code.clone()));
        }
        tracing::debug!(%piece_id, "offline move");
    }

    /// Seats the bot after the join pause.
    async fn seat_bot(&mut self) -> Option<ServerEvent> {
        tokio::time::sleep(self.timing.join).await;

        let name = BOT_NAMES[rand::rng().random_range(0..BOT_NAMES.len())];
        let room = self.room.as_mut()?;
        room.players.push(PlayerSummary {
            id: BOT_PLAYER,
            name: name.to_owned(),
            is_bot: true,
        });
        room.bot_seated = true;
        tracing::debug!(room_id = %room.code, bot = name, "bot joined offline room");

        Some(ServerEvent::PlayerJoined {
            players: room.players.clone(),
            player_name: name.to_owned(),
        })
    }

    /// Plays one bot roll after the appropriate pause.
    async fn bot_turn(&mut self) -> Option<ServerEvent> {
        let rerolls = self.room.as_ref().is_some_and(|r| r.bot_rerolls);
        let pause = if rerolls {
            self.timing.settle + self.timing.reroll
        } else {
            self.timing.think
        };
        tokio::time::sleep(pause).await;

        let value = self.dice.roll();
        let room = self.room.as_mut()?;
        let holder = room.holder()?.clone();
        room.current_player = self.rule.next(room.current_player, room.players.len(), value);
        room.bot_rerolls = room.bot_holds_turn();
        tracing::debug!(bot = %holder.name, value, "bot rolled");

        Some(ServerEvent::DiceRolled {
            value,
            player_id: holder.id,
            player_name: holder.name,
            current_player: room.current_player,
        })
    }
}

impl std::fmt::Debug for LocalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSession")
            .field("timing", &self.timing)
            .field("room", &self.room)
            .field("queued", &self.outbox.len())
            .finish_non_exhaustive()
    }
}

impl GameSession for LocalSession {
    fn is_online(&self) -> bool {
        false
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError> {
        match event {
            ClientEvent::CreateRoom { player_name } => self.create(player_name),
            ClientEvent::JoinRoom { .. } => self.reject(ClientError::Offline),
            ClientEvent::StartGame { room_id, .. } => self.start(&room_id),
            ClientEvent::RollDice { room_id, .. } => self.roll(&room_id),
            ClientEvent::MovePiece {
                room_id, piece_id, ..
            } => self.move_piece(&room_id, piece_id),
            ClientEvent::LeaveRoom { .. } => {
                self.room = None;
                self.outbox.clear();
            }
        }
        Ok(())
    }

    /// Queued answers first, then the bot. With nothing to do this waits
    /// forever, like a quiet relay.
    async fn next_event(&mut self) -> Option<ServerEvent> {
        if let Some(event) = self.outbox.pop_front() {
            return Some(event);
        }

        let (seat_bot, bot_turn) = match &self.room {
            Some(room) => (!room.bot_seated, room.bot_holds_turn()),
            None => (false, false),
        };
        if seat_bot {
            return self.seat_bot().await;
        }
        if bot_turn {
            return self.bot_turn().await;
        }
        std::future::pending().await
    }
}
