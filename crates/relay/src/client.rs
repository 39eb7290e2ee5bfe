//! Framed client for talking to a relay server.
//!
//! The client owns its socket through two background tasks: a reader
//! that decodes incoming frames into a channel, and a writer that drains
//! an outbound channel one frame at a time. Nothing else touches the
//! socket. Code running elsewhere, including on a plain OS thread such
//! as a blocking terminal reader, sends through a [`ClientSender`].

use relay_protocol::Message;
use relay_transport::TransportError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::framed::{read_message, write_message};
use crate::RelayError;

/// Cloneable handle that posts messages onto the client's writer task.
///
/// Sending never blocks and never touches the socket, so it is safe to
/// call from any thread.
#[derive(Debug, Clone)]
pub struct ClientSender {
    outbound: mpsc::UnboundedSender<Message>,
}

impl ClientSender {
    /// Queues a payload, truncated to the maximum body length.
    pub fn send(&self, payload: impl AsRef<[u8]>) -> Result<(), RelayError> {
        self.send_message(Message::new(payload))
    }

    /// Queues an already built message.
    pub fn send_message(&self, message: Message) -> Result<(), RelayError> {
        self.outbound.send(message).map_err(|_| {
            RelayError::from(TransportError::ConnectionClosed(
                "client writer stopped".into(),
            ))
        })
    }
}

/// A connected relay client.
pub struct RelayClient {
    sender: ClientSender,
    inbound: mpsc::UnboundedReceiver<Message>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RelayClient {
    /// Connects to a relay server at `addr` (e.g. `"127.0.0.1:9000"`).
    pub async fn connect(addr: &str) -> Result<Self, RelayError> {
        let stream = relay_transport::connect(addr).await?;
        Ok(Self::from_stream(stream))
    }

    /// Wraps an already connected stream.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (mut read_half, mut write_half) = tokio::io::split(stream);
        let (inbound_tx, inbound) = mpsc::unbounded_channel();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        let reader = tokio::spawn(async move {
            loop {
                match read_message(&mut read_half).await {
                    Ok(Some(message)) => {
                        if inbound_tx.send(message).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("server closed the connection");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "receive failed");
                        break;
                    }
                }
            }
        });

        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                if let Err(e) = write_message(&mut write_half, &message).await {
                    tracing::warn!(error = %e, "send failed");
                    break;
                }
            }
        });

        Self {
            sender: ClientSender { outbound },
            inbound,
            reader,
            writer,
        }
    }

    /// Returns a handle for sending from other tasks or threads.
    pub fn sender(&self) -> ClientSender {
        self.sender.clone()
    }

    /// Queues a payload for sending. See [`ClientSender::send`].
    pub fn send(&self, payload: impl AsRef<[u8]>) -> Result<(), RelayError> {
        self.sender.send(payload)
    }

    /// Waits for the next message relayed from another peer.
    ///
    /// Returns `None` once the server has closed the connection and
    /// every message received before that has been returned.
    pub async fn recv(&mut self) -> Option<Message> {
        self.inbound.recv().await
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        // Senders handed out may outlive the client; the socket must not.
        self.reader.abort();
        self.writer.abort();
    }
}
