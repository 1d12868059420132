//! Client library for the Ludo relay.
//!
//! [`Client`] is what an application drives: it validates input, sends
//! requests, waits for the relay's answer and keeps a [`ClientState`] in
//! sync with every event it sees.
//!
//! Underneath, a [`Session`] is either a [`RemoteSession`] (a WebSocket to
//! the relay) or a [`LocalSession`], an offline simulation that seats a
//! bot opponent and plays its turns. The client falls back to the local
//! session when the relay cannot be reached or does not answer a
//! `createRoom` in time.
//!
//! # Key types
//!
//! - [`Client`]: the facade
//! - [`ClientState`]: reducer over [`ServerEvent`](ludo_protocol::ServerEvent)
//! - [`GameSession`]: the online/offline strategy trait
//! - [`ClientConfig`] / [`BotTiming`]: timeouts, retries, bot pacing

#![allow(async_fn_in_trait)]

mod client;
mod config;
mod error;
mod local;
mod remote;
mod session;
mod state;

pub use client::Client;
pub use config::{BotTiming, ClientConfig};
pub use error::ClientError;
pub use local::{BOT_NAMES, BOT_PLAYER, LOCAL_PLAYER, LocalSession};
pub use remote::RemoteSession;
pub use session::{GameSession, Session};
pub use state::ClientState;
