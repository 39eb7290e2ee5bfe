//! Error types for the protocol layer.
//!
//! Each crate in the relay defines its own error enum. When you see a
//! `ProtocolError` you know the bytes themselves were bad, not the socket
//! that carried them or the room that would have fanned them out.

use crate::MAX_BODY_LEN;

/// Errors that can occur while framing or unframing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The 4-byte header is not a decimal length in `0..=MAX_BODY_LEN`.
    ///
    /// The string carries a printable rendering of the offending header
    /// so it can go straight into a log line.
    #[error("invalid frame header: {0}")]
    HeaderDecode(String),

    /// A payload is longer than a frame can carry.
    ///
    /// Only produced by the strict constructors; [`encode`](crate::encode)
    /// and [`Message::new`](crate::Message::new) truncate instead.
    #[error("payload of {0} bytes exceeds maximum body of {max}", max = MAX_BODY_LEN)]
    Oversize(usize),

    /// Fewer bytes follow the header than it declares.
    #[error("truncated frame: header declares {expected} bytes, {actual} present")]
    Truncated { expected: usize, actual: usize },

    /// More bytes follow the body than the header declares.
    #[error("frame has {0} trailing bytes after the body")]
    TrailingBytes(usize),
}
