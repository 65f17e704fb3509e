//! Error types for the protocol layer.
//!
//! Each crate in Matchforge defines its own error enum. When you see a
//! `ProtocolError`, the problem is in the shape of the data (bytes that
//! don't decode, a format name nobody knows), not in draft rules or the
//! store.

/// Errors that can occur in the protocol layer.
///
/// `thiserror` generates the `std::error::Error` impl; each `#[error]`
/// attribute is the message printed in logs.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a record into bytes).
    ///
    /// The inner `serde_json::Error` is kept as is, so callers only ever
    /// match on `ProtocolError` whichever codec produced it.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a record).
    ///
    /// Common causes: malformed JSON, a missing field, or an enum value
    /// written by a newer client.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A team or match format name that isn't one of the known values.
    ///
    /// Unlike the two above, this comes from parsing a name (an admin
    /// form, a config file), not from the codec.
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}
