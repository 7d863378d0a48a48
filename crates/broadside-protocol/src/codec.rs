//! Codec trait and the default JSON implementation.
//!
//! The server never serializes events directly — it goes through a
//! [`Codec`] so the wire format can be swapped (e.g. for a binary codec)
//! without touching the gateway or the engine.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts between event types and raw bytes.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// Human-readable, inspectable in browser dev tools, and what the original
/// clients already speak. Behind the `json` feature (on by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientEvent, RoomId, ServerEvent, ConnectionId};

    #[test]
    fn test_json_codec_round_trips_client_event() {
        let codec = JsonCodec;
        let ev = ClientEvent::CreateRoom {
            room_id: RoomId::new("R1"),
            name: "Alice".into(),
        };

        let bytes = codec.encode(&ev).unwrap();
        let decoded: ClientEvent = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, ev);
    }

    #[test]
    fn test_json_codec_round_trips_server_event() {
        let codec = JsonCodec;
        let ev = ServerEvent::GameOver {
            winner: ConnectionId::new("c-1"),
        };

        let bytes = codec.encode(&ev).unwrap();
        let decoded: ServerEvent = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, ev);
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_error() {
        let codec = JsonCodec;
        let result: Result<ClientEvent, _> = codec.decode(b"not json");
        assert!(result.is_err());
    }
}
