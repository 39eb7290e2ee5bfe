//! Room actor: a Tokio task that owns the [`Room`] and applies commands
//! to it one at a time.
//!
//! Connections never touch the membership set directly. They send a
//! [`RoomCommand`] through a bounded mpsc channel and the actor applies
//! it. That single consumer is the relay's event loop for shared state:
//! no locks, and every join, leave and broadcast happens in one total
//! order.

use relay_protocol::Message;
use relay_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{Participant, Peer, Room, RoomConfig, RoomError, RoomInfo};

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the response on it.
pub(crate) enum RoomCommand<P> {
    /// Add a participant.
    Join {
        participant: P,
        reply: oneshot::Sender<Result<bool, RoomError>>,
    },

    /// Remove a participant.
    Leave {
        id: ConnectionId,
        reply: oneshot::Sender<bool>,
    },

    /// Fan a message out to everyone but the sender.
    Broadcast {
        sender: ConnectionId,
        message: Message,
    },

    /// Request a metadata snapshot.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Stop the actor. Every participant handle is dropped with it.
    Shutdown,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone: it is an `mpsc::Sender` wrapper. Every connection
/// holds one.
pub struct RoomHandle<P = Peer> {
    sender: mpsc::Sender<RoomCommand<P>>,
}

impl<P> Clone for RoomHandle<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P: Participant> RoomHandle<P> {
    /// Adds a participant. Returns `Ok(false)` if it was already a member.
    pub async fn join(&self, participant: P) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                participant,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Removes a participant. Returns whether it was a member.
    pub async fn leave(&self, id: ConnectionId) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave { id, reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Queues a broadcast (fire-and-forget).
    ///
    /// Returns once the command is in the room's channel. Commands from
    /// one caller are applied in the order they were sent, so a
    /// connection's messages reach every peer's queue in order.
    pub async fn broadcast(
        &self,
        sender: ConnectionId,
        message: Message,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Broadcast { sender, message })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Requests the current room info.
    ///
    /// The reply is produced after every command sent before it has been
    /// applied, so awaiting it also acts as a barrier.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor<P> {
    room: Room<P>,
    receiver: mpsc::Receiver<RoomCommand<P>>,
}

impl<P: Participant> RoomActor<P> {
    /// Runs the actor loop, processing commands until shutdown or until
    /// every handle is dropped.
    async fn run(mut self) {
        tracing::info!("room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { participant, reply } => {
                    let _ = reply.send(self.room.join(participant));
                }
                RoomCommand::Leave { id, reply } => {
                    let _ = reply.send(self.room.leave(id));
                }
                RoomCommand::Broadcast { sender, message } => {
                    self.room.broadcast(sender, &message);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.room.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(members = self.room.len(), "room shutting down");
                    break;
                }
            }
        }

        tracing::info!("room actor stopped");
    }
}

/// Spawns a room actor task and returns a handle to communicate with it.
///
/// `config.command_buffer` bounds the command channel: when it is full,
/// callers wait.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_room<P: Participant>(config: RoomConfig) -> RoomHandle<P> {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let actor = RoomActor {
        room: Room::new(config),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { sender: tx }
}
