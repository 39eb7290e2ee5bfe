//! Unified error type for the relay.

use relay_protocol::ProtocolError;
use relay_room::RoomError;
use relay_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A transport-level error (accept, connect, read, write).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A framing error (bad header, truncated frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl RelayError {
    /// Returns `true` if the error only means the peer hung up.
    pub fn is_peer_closed(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Transport(_)));
        assert!(relay_err.to_string().contains("gone"));
        assert!(relay_err.is_peer_closed());
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::HeaderDecode("\"abcd\"".into());
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Protocol(_)));
        assert!(!relay_err.is_peer_closed());
    }

    #[test]
    fn test_from_room_error() {
        let relay_err: RelayError = RoomError::RoomFull(100).into();
        assert!(matches!(relay_err, RelayError::Room(_)));
    }
}
