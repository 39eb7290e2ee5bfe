//! The capability a room needs from its members.

use relay_protocol::Message;
use relay_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::RoomError;

/// Something a room can fan messages out to.
///
/// `deliver` must only enqueue. It is called from inside the room's
/// fan-out loop, so any waiting here would stall every other member.
pub trait Participant: Send + 'static {
    /// The identity used as this member's key in the room.
    fn id(&self) -> ConnectionId;

    /// Hands a broadcast message to this participant.
    ///
    /// # Errors
    /// Returns [`RoomError::Disconnected`] if the participant can no
    /// longer accept messages.
    fn deliver(&self, message: Message) -> Result<(), RoomError>;
}

/// Receiving end of a peer's outbound queue, drained by its writer.
pub type OutboundQueue = mpsc::UnboundedReceiver<Message>;

/// The room-side handle of a connection: its id and the sending end of
/// its outbound queue.
///
/// The queue is unbounded. The room never waits on a peer; a peer that
/// reads slowly accumulates its backlog here and nowhere else.
#[derive(Debug, Clone)]
pub struct Peer {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<Message>,
}

impl Peer {
    /// Creates a peer together with the queue its writer drains.
    pub fn channel(id: ConnectionId) -> (Self, OutboundQueue) {
        let (outbound, queue) = mpsc::unbounded_channel();
        (Self { id, outbound }, queue)
    }

    /// Returns `true` once the queue's receiver has been dropped.
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

impl Participant for Peer {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn deliver(&self, message: Message) -> Result<(), RoomError> {
        self.outbound
            .send(message)
            .map_err(|_| RoomError::Disconnected(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_deliver_enqueues_in_order() {
        let (peer, mut queue) = Peer::channel(ConnectionId::new(1));
        peer.deliver(Message::new("first")).unwrap();
        peer.deliver(Message::new("second")).unwrap();

        assert_eq!(queue.try_recv().unwrap().body(), b"first");
        assert_eq!(queue.try_recv().unwrap().body(), b"second");
        assert!(queue.try_recv().is_err());
    }

    #[test]
    fn test_peer_deliver_after_queue_dropped_fails() {
        let (peer, queue) = Peer::channel(ConnectionId::new(2));
        drop(queue);

        assert!(peer.is_closed());
        let err = peer.deliver(Message::new("lost")).unwrap_err();
        assert_eq!(err, RoomError::Disconnected(ConnectionId::new(2)));
    }
}
