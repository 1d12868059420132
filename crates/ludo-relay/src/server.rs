//! `RelayServer` builder and server loop.
//!
//! This is the entry point for running the relay. It ties together the
//! layers: transport → protocol → room registry, plus the HTTP probes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use ludo_protocol::JsonCodec;
use ludo_room::{Dice, RandomDice, RoomConfig, RoomRegistry};
use ludo_transport::{Transport, WebSocketTransport};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::{ConfigError, RelayError, ServerConfig, status};

/// Shared server state passed to each connection handler task and to the
/// HTTP probes.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Every
/// registry operation holds the one `Mutex` from validation through its
/// broadcasts, so operations never interleave.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomRegistry>,
    /// Open WebSocket connections, for `/health`.
    pub(crate) connections: AtomicUsize,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting the relay.
///
/// # Example
///
/// ```rust,ignore
/// let server = RelayServer::builder()
///     .bind("127.0.0.1:0")
///     .room_config(RoomConfig {
///         extra_roll_on_six: false,
///         ..Default::default()
///     })
///     .build()
///     .await?;
/// ```
pub struct RelayServerBuilder {
    bind_addr: String,
    status_addr: Option<String>,
    room_config: RoomConfig,
    dice: Box<dyn Dice>,
}

impl RelayServerBuilder {
    /// Creates a new builder with default settings: WebSocket on
    /// `127.0.0.1:3001`, no status listener, a fair die.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            status_addr: None,
            room_config: RoomConfig::default(),
            dice: Box::new(RandomDice),
        }
    }

    /// Takes both listen addresses from a [`ServerConfig`].
    pub fn config(self, config: &ServerConfig) -> Self {
        self.bind(&config.ws_addr()).status_bind(&config.status_addr())
    }

    /// Sets the address for the WebSocket listener.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Enables the HTTP probe listener on `addr`.
    pub fn status_bind(mut self, addr: &str) -> Self {
        self.status_addr = Some(addr.to_string());
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Replaces the die. Tests pass a `ScriptedDice`.
    pub fn dice(mut self, dice: impl Dice + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Validates the room config and binds the listeners.
    ///
    /// # Errors
    /// Fails with [`ConfigError::Room`] for unusable room limits, or if
    /// either address cannot be bound.
    pub async fn build(self) -> Result<RelayServer, RelayError> {
        self.room_config.validate().map_err(ConfigError::from)?;

        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let status = match &self.status_addr {
            Some(addr) => Some(TcpListener::bind(addr).await?),
            None => None,
        };

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::with_dice(
                self.room_config,
                self.dice,
            )),
            connections: AtomicUsize::new(0),
            codec: JsonCodec,
        });

        Ok(RelayServer {
            transport,
            status,
            state,
        })
    }
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RelayServer {
    transport: WebSocketTransport,
    status: Option<TcpListener>,
    state: Arc<ServerState>,
}

impl RelayServer {
    /// Creates a new builder.
    pub fn builder() -> RelayServerBuilder {
        RelayServerBuilder::new()
    }

    /// Returns the address the WebSocket listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns the address of the HTTP probe listener, if enabled.
    pub fn status_addr(&self) -> Option<SocketAddr> {
        self.status.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Runs the server.
    ///
    /// Spawns the HTTP probes, then accepts WebSocket connections and
    /// spawns a handler task for each. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), RelayError> {
        let ws_addr = self.local_addr().ok();
        match self.status.take() {
            Some(listener) => {
                // The WebSocket listener only speaks the upgrade, so the
                // probes need a port of their own.
                tracing::info!(
                    addr = ?listener.local_addr().ok(),
                    "HTTP probes (/ and /health) on a separate port from \
                     the WebSocket listener"
                );
                let app = status::router(Arc::clone(&self.state));
                tokio::spawn(async move {
                    if let Err(e) = axum::serve(listener, app).await {
                        tracing::error!(error = %e, "status listener stopped");
                    }
                });
            }
            None => {
                tracing::info!("no status listener, / and /health are off");
            }
        }

        tracing::info!(addr = ?ws_addr, "ludo relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
