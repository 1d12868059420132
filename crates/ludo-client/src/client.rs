//! The client facade.

use std::collections::VecDeque;

use ludo_protocol::{ClientEvent, PieceId, RoomCode, ServerEvent};
use tokio::time::{Instant, timeout, timeout_at};

use crate::{
    ClientConfig, ClientError, ClientState, GameSession, LocalSession, RemoteSession, Session,
};

/// A player's handle on a game, online or offline.
///
/// Request methods send one event and wait for the answer, folding every
/// event they see into [`state`](Self::state). Events that arrive while a
/// request is waiting (another player joining, say) are kept and handed
/// out by [`next_event`](Self::next_event) afterwards.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    session: Session,
    state: ClientState,
    backlog: VecDeque<ServerEvent>,
}

impl Client {
    /// Connects to the relay at `config.url`, retrying up to
    /// `reconnect_attempts` times. If every attempt fails the client
    /// starts in offline mode instead of returning an error.
    pub async fn connect(config: ClientConfig) -> Self {
        let attempts = config.reconnect_attempts + 1;
        for attempt in 1..=attempts {
            let outcome = timeout(config.connect_timeout, RemoteSession::connect(&config.url)).await;
            match outcome {
                Ok(Ok(session)) => return Self::with_session(config, Session::Remote(session)),
                Ok(Err(e)) => {
                    tracing::warn!(attempt, url = %config.url, error = %e, "connect failed");
                }
                Err(_) => {
                    tracing::warn!(attempt, url = %config.url, "connect timed out");
                }
            }
            if attempt < attempts {
                tokio::time::sleep(config.reconnect_delay).await;
            }
        }

        tracing::info!("relay unreachable, using offline mode");
        Self::offline(config)
    }

    /// A client that only ever plays against the local bot.
    pub fn offline(config: ClientConfig) -> Self {
        let session = Session::Local(LocalSession::new(config.bot));
        Self::with_session(config, session)
    }

    /// A client over an already built session.
    pub fn with_session(config: ClientConfig, session: Session) -> Self {
        Self {
            config,
            session,
            state: ClientState::default(),
            backlog: VecDeque::new(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.session.is_online()
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Creates a room and returns its code.
    ///
    /// Online, a relay that does not answer within the request timeout (or
    /// whose connection drops) is abandoned: the client switches to
    /// offline mode and creates the room there.
    pub async fn create_room(&mut self, player_name: &str) -> Result<RoomCode, ClientError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(ClientError::EmptyName);
        }
        let event = ClientEvent::CreateRoom {
            player_name: player_name.to_owned(),
        };

        match self.request(event.clone(), created_room).await {
            Err(ClientError::Timeout(_) | ClientError::Closed | ClientError::WebSocket(_))
                if self.is_online() =>
            {
                tracing::warn!("relay did not create the room, creating it offline");
                self.go_offline();
                self.request(event, created_room).await
            }
            result => result,
        }
    }

    /// Joins the room `room_code`.
    ///
    /// There is no offline fallback: offline it fails with
    /// [`ClientError::Offline`], online a silent relay gives
    /// [`ClientError::Timeout`].
    pub async fn join_room(&mut self, player_name: &str, room_code: &str) -> Result<(), ClientError> {
        let player_name = player_name.trim();
        let room_code = room_code.trim();
        if player_name.is_empty() || room_code.is_empty() {
            return Err(ClientError::MissingRoomCode);
        }
        if !self.is_online() {
            return Err(ClientError::Offline);
        }

        let event = ClientEvent::JoinRoom {
            room_id: RoomCode::from(room_code),
            player_name: player_name.to_owned(),
        };
        self.request(event, |e| matches!(e, ServerEvent::RoomJoined { .. }).then_some(()))
            .await
    }

    /// Asks to start the game; resolves once `gameStarted` arrives.
    pub async fn start_game(&mut self) -> Result<(), ClientError> {
        let room_id = self.room_id()?;
        let event = ClientEvent::StartGame {
            room_id,
            player_id: self.state.player_id,
        };
        self.request(event, |e| matches!(e, ServerEvent::GameStarted { .. }).then_some(()))
            .await
    }

    /// Rolls, if it is our turn, and returns the value.
    pub async fn roll_dice(&mut self) -> Result<u8, ClientError> {
        let room_id = self.room_id()?;
        if !self.state.can_roll() {
            return Err(ClientError::NotYourTurn);
        }

        let me = self.state.player_id;
        let event = ClientEvent::RollDice {
            room_id,
            player_id: me,
        };
        self.request(event, |e| match e {
            ServerEvent::DiceRolled {
                value, player_id, ..
            } if Some(*player_id) == me => Some(*value),
            _ => None,
        })
        .await
    }

    /// Reports a click on piece `piece_id` of seat `seat`.
    ///
    /// Only allowed on our turn and for our own seat. The move is sent
    /// without waiting; other players see it as `pieceMoved`.
    pub async fn move_piece(&mut self, seat: usize, piece_id: PieceId) -> Result<(), ClientError> {
        let room_id = self.room_id()?;
        if !self.state.can_roll() {
            return Err(ClientError::NotYourTurn);
        }
        if self.state.my_index() != Some(seat) {
            return Err(ClientError::NotYourPiece);
        }

        self.session
            .send(ClientEvent::MovePiece {
                room_id,
                player_id: self.state.player_id,
                piece_id,
            })
            .await
    }

    /// Leaves the current room. The local state is cleared even if the
    /// relay can no longer be told.
    pub async fn leave_room(&mut self) -> Result<(), ClientError> {
        let room_id = self.room_id()?;
        let event = ClientEvent::LeaveRoom {
            room_id,
            player_id: self.state.player_id,
        };
        let sent = self.session.send(event).await;
        self.state.reset();
        self.backlog.clear();
        sent
    }

    /// The next event, already applied to [`state`](Self::state).
    ///
    /// Returns `None` once the session is closed.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        if let Some(event) = self.backlog.pop_front() {
            return Some(event);
        }
        let event = self.session.next_event().await?;
        self.state.apply(&event);
        Some(event)
    }

    fn room_id(&self) -> Result<RoomCode, ClientError> {
        self.state.room_id.clone().ok_or(ClientError::NoRoom)
    }

    fn go_offline(&mut self) {
        self.session = Session::Local(LocalSession::new(self.config.bot));
        self.state.reset();
        self.backlog.clear();
    }

    /// Sends `event`, then reads events until `answer` picks one out or
    /// the relay reports an error.
    async fn request<T>(
        &mut self,
        event: ClientEvent,
        answer: impl Fn(&ServerEvent) -> Option<T>,
    ) -> Result<T, ClientError> {
        let name = event.name();
        self.session.send(event).await?;

        let limit = self.config.request_timeout;
        let deadline = Instant::now() + limit;
        loop {
            let event = match timeout_at(deadline, self.session.next_event()).await {
                Ok(Some(event)) => event,
                Ok(None) => return Err(ClientError::Closed),
                Err(_) => {
                    tracing::debug!(request = name, ?limit, "request timed out");
                    return Err(ClientError::Timeout(limit));
                }
            };
            self.state.apply(&event);

            if let ServerEvent::Error { message } = &event {
                return Err(ClientError::Rejected(message.clone()));
            }
            if let Some(value) = answer(&event) {
                return Ok(value);
            }
            self.backlog.push_back(event);
        }
    }
}

fn created_room(event: &ServerEvent) -> Option<RoomCode> {
    match event {
        ServerEvent::RoomCreated { room_id, .. } => Some(room_id.clone()),
        _ => None,
    }
}
