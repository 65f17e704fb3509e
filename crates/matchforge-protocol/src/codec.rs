//! Codec trait and implementations for serializing/deserializing records.
//!
//! The store doesn't care HOW a [`MatchSession`](crate::MatchSession) is
//! turned into bytes; it just needs something that implements [`Codec`].
//! Swapping JSON for a binary format later touches nothing else.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync`: a codec lives inside the store task, which Tokio may
///   move between worker threads.
/// - `'static`: it owns everything it needs and borrows nothing from the
///   caller, so it can be held for the lifetime of that task.
///
/// The methods are generic over `T` rather than fixed to
/// [`MatchSession`](crate::MatchSession), so the same codec also handles
/// events or any other serde type.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON is what browser clients and most change-feed transports speak,
/// and a session record encoded this way can be inspected by eye.
///
/// ## Example
///
/// ```rust
/// use matchforge_protocol::{Codec, JsonCodec, MatchFormat, Step};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&(Step::Ban, MatchFormat::Md3)).unwrap();
/// assert_eq!(bytes, br#"["ban","md3"]"#);
///
/// let decoded: (Step, MatchFormat) = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, (Step::Ban, MatchFormat::Md3));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{MatchSession, RoomId, TeamFormat, MatchFormat};

    #[test]
    fn test_json_codec_session_survives_round_trip() {
        let codec = JsonCodec;
        let session = MatchSession::empty(
            RoomId::new("ABC234"),
            TeamFormat::FiveVFive,
            MatchFormat::Md1,
            "Team A",
            "Team B",
            ["mirage", "inferno"],
        );

        let bytes = codec.encode(&session).unwrap();
        let decoded: MatchSession = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, session);
    }

    #[test]
    fn test_json_codec_decode_garbage_fails() {
        let codec = JsonCodec;
        let result: Result<MatchSession, _> = codec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_unknown_step_fails() {
        let codec = JsonCodec;
        let result: Result<crate::Step, _> = codec.decode(br#""lobby""#);
        assert!(result.is_err());
    }
}
