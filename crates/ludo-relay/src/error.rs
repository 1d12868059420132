//! Unified error type for the relay.

use ludo_protocol::ProtocolError;
use ludo_room::RoomConfigError;
use ludo_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Bad configuration from the environment or the builder.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP status listener failed.
    #[error("status listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from reading [`ServerConfig`](crate::ServerConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A port variable is not a valid `u16`.
    #[error("invalid {var}: {value:?} is not a port number")]
    InvalidPort { var: &'static str, value: String },

    /// `PORT` is 65535 and `STATUS_PORT` was left to default to `PORT + 1`.
    #[error("STATUS_PORT must be set explicitly when PORT is {0}")]
    NoStatusPort(u16),

    /// The room limits handed to the builder are unusable.
    #[error("invalid room config: {0}")]
    Room(#[from] RoomConfigError),
}
