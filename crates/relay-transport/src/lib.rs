//! Transport layer for the relay.
//!
//! Provides [`TcpTransport`], which binds a listener and hands out raw
//! streams tagged with a process-unique [`ConnectionId`], and
//! [`connect`] for the client side. Framing lives one layer up, in
//! `relay-protocol`; this crate only moves bytes.

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{connect, Accepted, TcpTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }

    #[test]
    fn test_eof_maps_to_connection_closed() {
        let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert!(TransportError::from_read(eof).is_closed());

        let reset = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        let err = TransportError::from_read(reset);
        assert!(matches!(err, TransportError::ReceiveFailed(_)));
        assert!(!err.is_closed());
    }
}
