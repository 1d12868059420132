//! Wire protocol for the Ludo relay.
//!
//! This crate defines what clients and the relay say to each other:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`PlayerSummary`], the
//!   [`PlayerId`] and [`RoomCode`] identities): the events that travel in
//!   WebSocket text frames.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events are turned
//!   into frame text and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! Every frame is one JSON object of the form
//! `{"event": "<name>", "data": { ... }}` with camelCase field names.
//!
//! ```text
//! Transport (frames) → Protocol (ClientEvent / ServerEvent) → Room registry
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientEvent, PieceId, PlayerId, PlayerSummary, Recipient, RoomCode, ServerEvent};
