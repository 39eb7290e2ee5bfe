//! Error types for the room layer.

use relay_transport::ConnectionId;

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room already holds its maximum number of participants.
    #[error("room is full ({0} participants)")]
    RoomFull(usize),

    /// The room's command channel is closed; the room task has stopped.
    #[error("room is unavailable")]
    Unavailable,

    /// The participant's outbound queue is closed. Its connection is gone.
    #[error("participant {0} is disconnected")]
    Disconnected(ConnectionId),
}
