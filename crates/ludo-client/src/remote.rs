//! Online session: JSON text frames over a WebSocket.

use futures_util::{SinkExt, StreamExt};
use ludo_protocol::{ClientEvent, Codec, JsonCodec, ServerEvent};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::{ClientError, GameSession};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A WebSocket connection to the relay.
pub struct RemoteSession {
    ws: WsStream,
    codec: JsonCodec,
}

impl RemoteSession {
    /// Opens the WebSocket at `url`.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (ws, _response) = connect_async(url).await?;
        tracing::info!(url, "connected to relay");
        Ok(Self {
            ws,
            codec: JsonCodec,
        })
    }
}

impl std::fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSession").finish_non_exhaustive()
    }
}

impl GameSession for RemoteSession {
    fn is_online(&self) -> bool {
        true
    }

    async fn send(&mut self, event: ClientEvent) -> Result<(), ClientError> {
        let text = self.codec.encode(&event)?;
        self.ws.send(Message::text(text)).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<ServerEvent> {
        loop {
            let msg = match self.ws.next().await? {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!(error = %e, "relay connection failed");
                    return None;
                }
            };

            let decoded = match msg {
                Message::Text(text) => self.codec.decode(text.as_bytes()),
                Message::Binary(data) => self.codec.decode(&data),
                Message::Close(_) => return None,
                _ => continue,
            };
            match decoded {
                Ok(event) => return Some(event),
                Err(e) => tracing::debug!(error = %e, "ignoring undecodable frame"),
            }
        }
    }
}
