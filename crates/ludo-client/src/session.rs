//! The session strategy: online or offline, same interface.

use ludo_protocol::{ClientEvent, ServerEvent};

use crate::{ClientError, LocalSession, RemoteSession};

/// A source and sink of protocol events.
///
/// Implemented by the WebSocket session and the offline simulation, so
/// the [`Client`](crate::Client) does not care which one it talks to.
pub trait GameSession {
    /// `true` when events go to a real relay.
    fn is_online(&self) -> bool;

    /// Sends one request.
    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError>;

    /// Waits for the next event. Returns `None` once the session is over.
    ///
    /// Must be cancel-safe: the client races it against timeouts.
    async fn next_event(&mut self) -> Option<ServerEvent>;
}

/// Either kind of session.
#[derive(Debug)]
pub enum Session {
    Remote(RemoteSession),
    Local(LocalSession),
}

impl GameSession for Session {
    fn is_online(&self) -> bool {
        match self {
            Self::Remote(s) => s.is_online(),
            Self::Local(s) => s.is_online(),
        }
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError> {
        match self {
            Self::Remote(s) => s.send(event).await,
            Self::Local(s) => s.send(event).await,
        }
    }

    async fn next_event(&mut self) -> Option<ServerEvent> {
        match self {
            Self::Remote(s) => s.next_event().await,
            Self::Local(s) => s.next_event().await,
        }
    }
}
