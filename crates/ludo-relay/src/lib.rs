//! # Ludo Relay
//!
//! A thin WebSocket relay for browser Ludo games.
//!
//! The relay keeps rooms in memory, decides whose turn it is when dice
//! are rolled, and forwards moves between players. It never looks at the
//! board: move legality, piece positions and winning are the clients'
//! business.
//!
//! ## Layers
//!
//! ```text
//! ludo-transport (WebSocket frames)
//!   → ludo-protocol (ClientEvent / ServerEvent JSON)
//!     → ludo-room (RoomRegistry: rooms, turns, broadcasts)
//! ```
//!
//! A second listener serves two plain HTTP probes (`/` and `/health`).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ludo_relay::prelude::*;
//!
//! # async fn run() -> Result<(), RelayError> {
//! let server = RelayServer::builder()
//!     .bind("0.0.0.0:3001")
//!     .status_bind("0.0.0.0:3002")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;
mod status;

pub use config::ServerConfig;
pub use error::{ConfigError, RelayError};
pub use server::{RelayServer, RelayServerBuilder};

/// Everything needed to embed the relay or drive it from tests.
pub mod prelude {
    pub use crate::{ConfigError, RelayError, RelayServer, RelayServerBuilder, ServerConfig};
    pub use ludo_protocol::{
        ClientEvent, Codec, JsonCodec, PieceId, PlayerId, PlayerSummary, RoomCode, ServerEvent,
    };
    pub use ludo_room::{
        Dice, RandomDice, RoomConfig, RoomConfigError, RoomError, ScriptedDice,
    };
}
