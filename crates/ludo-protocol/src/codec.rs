//! Codec trait and implementations for serializing/deserializing events.
//!
//! A "codec" (coder/decoder) converts between Rust types and frame
//! contents. Neither the relay nor the client cares HOW events are
//! serialized; they only need something that implements [`Codec`].
//!
//! Browser clients read events from WebSocket text frames, so encoding
//! produces a `String`. Decoding accepts raw bytes because the transport
//! hands over text and binary frames alike.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to frame text and decode frames back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → the codec lives in shared server state and is used
///   from every connection task.
/// - `'static` → it owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into frame text.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes frame bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type, and `ProtocolError::InvalidMessage` for an
    /// empty frame.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use ludo_protocol::{Codec, JsonCodec, ServerEvent};
///
/// let codec = JsonCodec;
/// let text = codec
///     .encode(&ServerEvent::Error { message: "Room not found".into() })
///     .unwrap();
/// assert_eq!(text, r#"{"event":"error","data":{"message":"Room not found"}}"#);
///
/// let decoded: ServerEvent = codec.decode(text.as_bytes()).unwrap();
/// assert_eq!(decoded, ServerEvent::Error { message: "Room not found".into() });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        if data.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty frame".into()));
        }
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
