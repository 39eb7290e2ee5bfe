//! `RelayServer` builder and accept loop.
//!
//! This is the entry point for running a relay. It ties the layers
//! together: transport → connection → room.

use std::future::Future;
use std::net::SocketAddr;

use relay_room::{spawn_room, RoomConfig, RoomHandle};
use relay_transport::{Accepted, TcpTransport};

use crate::connection::Connection;
use crate::RelayError;

/// Builder for configuring and starting a relay server.
///
/// # Example
///
/// ```rust,no_run
/// use relay::RelayServer;
///
/// # async fn run() -> Result<(), relay::RelayError> {
/// let server = RelayServer::builder()
///     .bind("0.0.0.0:9000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct RelayServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl RelayServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and starts the room actor.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn build(self) -> Result<RelayServer, RelayError> {
        let transport = TcpTransport::bind(self.bind_addr.as_str()).await?;
        let room = spawn_room(self.room_config);
        Ok(RelayServer { transport, room })
    }
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RelayServer {
    transport: TcpTransport,
    room: RoomHandle,
}

impl RelayServer {
    /// Creates a new builder.
    pub fn builder() -> RelayServerBuilder {
        RelayServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the shared room.
    pub fn room(&self) -> RoomHandle {
        self.room.clone()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), RelayError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs the accept loop until `shutdown` resolves.
    ///
    /// Each accepted stream gets its own task running a [`Connection`].
    /// A failed accept is logged and the loop carries on; no single
    /// connection can stop it. On shutdown the room actor is stopped,
    /// which closes every connection's outbound queue.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), RelayError>
    where
        F: Future<Output = ()> + Send,
    {
        tracing::info!("relay server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("relay server shutting down");
                    break;
                }
                accepted = self.transport.accept() => {
                    match accepted {
                        Ok(Accepted { id, peer_addr, stream }) => {
                            tracing::info!(%id, %peer_addr, "peer connected");
                            let connection =
                                Connection::new(id, stream, self.room.clone());
                            tokio::spawn(async move {
                                // The connection logs its own outcome.
                                let _ = connection.start().await;
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "accept failed");
                        }
                    }
                }
            }
        }

        if let Err(e) = self.room.shutdown().await {
            tracing::debug!(error = %e, "room already stopped");
        }
        Ok(())
    }
}
