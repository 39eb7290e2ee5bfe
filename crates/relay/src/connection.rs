//! Per-connection state machine.
//!
//! Every accepted stream becomes one [`Connection`], which runs two
//! pipelines over it inside a single task:
//!
//! ```text
//!              ┌──────────────── read pipeline ────────────────┐
//! stream ──▶   AwaitingHeader ──▶ AwaitingBody ──▶ Dispatching ──┐
//!                    ▲                                          │ room.broadcast
//!                    └──────────────────────────────────────────┘
//!
//! room ──▶ outbound queue ──▶ write pipeline ──▶ stream   (one write at a time)
//! ```
//!
//! Whichever pipeline stops first (peer hung up, bad header, I/O error)
//! takes the other one down with it. The connection then leaves the room
//! and anything still queued for it is dropped unsent.

use relay_protocol::{decode_header, Message, HEADER_LEN};
use relay_room::{OutboundQueue, Peer, RoomHandle};
use relay_transport::ConnectionId;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::framed::{read_body, read_header, write_message};
use crate::RelayError;

/// Where the read pipeline is between two suspension points.
///
/// There is no explicit `Closed` variant: closing is leaving the loop,
/// which drops the state along with its buffers.
enum ReadState {
    /// Waiting for exactly [`HEADER_LEN`] bytes.
    AwaitingHeader,
    /// Header decoded; waiting for exactly `body_len` bytes.
    AwaitingBody {
        header: [u8; HEADER_LEN],
        body_len: usize,
    },
    /// A full message is assembled and goes to the room next.
    Dispatching(Message),
}

/// One live peer bound to a room.
pub struct Connection<S> {
    id: ConnectionId,
    stream: S,
    room: RoomHandle,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Binds a freshly accepted stream to a room. Nothing happens until
    /// [`start`](Self::start).
    pub fn new(id: ConnectionId, stream: S, room: RoomHandle) -> Self {
        Self { id, stream, room }
    }

    /// Joins the room and runs both pipelines until the connection
    /// closes.
    ///
    /// Returns `Ok(())` when the peer hangs up between frames or the room
    /// drops this connection. Any other ending is returned as an error;
    /// either way the connection has left the room by the time this
    /// returns.
    pub async fn start(self) -> Result<(), RelayError> {
        let Self { id, stream, room } = self;

        let (peer, queue) = Peer::channel(id);
        if let Err(e) = room.join(peer).await {
            tracing::warn!(%id, error = %e, "join refused, closing connection");
            return Err(e.into());
        }

        let (reader, writer) = tokio::io::split(stream);
        let outcome = tokio::select! {
            result = read_pipeline(id, reader, &room) => result,
            result = write_pipeline(id, writer, queue) => result,
        };

        if let Err(e) = room.leave(id).await {
            tracing::debug!(%id, error = %e, "leave after close failed");
        }
        report_close(id, &outcome);
        outcome
    }
}

/// Reads frames and hands each decoded message to the room.
async fn read_pipeline<R>(
    id: ConnectionId,
    mut reader: R,
    room: &RoomHandle,
) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut state = ReadState::AwaitingHeader;
    loop {
        state = match state {
            ReadState::AwaitingHeader => {
                let Some(header) = read_header(&mut reader).await? else {
                    return Ok(());
                };
                let body_len = decode_header(&header)?;
                ReadState::AwaitingBody { header, body_len }
            }
            ReadState::AwaitingBody { header, body_len } => {
                let message = read_body(&mut reader, header, body_len).await?;
                ReadState::Dispatching(message)
            }
            ReadState::Dispatching(message) => {
                tracing::trace!(%id, bytes = message.body_len(), "dispatching");
                room.broadcast(id, message).await?;
                ReadState::AwaitingHeader
            }
        };
    }
}

/// Drains the outbound queue, one frame in flight at a time.
///
/// Ends with `Ok(())` when the queue's sender is gone, which means the
/// room no longer holds this connection.
async fn write_pipeline<W>(
    id: ConnectionId,
    mut writer: W,
    mut queue: OutboundQueue,
) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = queue.recv().await {
        write_message(&mut writer, &message).await?;
        tracing::trace!(%id, bytes = message.body_len(), "delivered");
    }
    tracing::debug!(%id, "outbound queue closed by room");
    Ok(())
}

fn report_close(id: ConnectionId, outcome: &Result<(), RelayError>) {
    match outcome {
        Ok(()) => tracing::info!(%id, "connection closed"),
        Err(e) if e.is_peer_closed() => {
            tracing::info!(%id, reason = %e, "connection closed by peer");
        }
        Err(RelayError::Protocol(e)) => {
            tracing::warn!(%id, error = %e, "closing connection on bad frame");
        }
        Err(e) => tracing::warn!(%id, error = %e, "connection failed"),
    }
}
