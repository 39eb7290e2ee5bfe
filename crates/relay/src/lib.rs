//! # Relay
//!
//! A connection-oriented broadcast relay. The server accepts any number
//! of TCP peers, frames each inbound byte stream into messages, and fans
//! every message out to all other peers, preserving the order in which
//! each peer sent them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relay::prelude::*;
//!
//! # async fn demo() -> Result<(), RelayError> {
//! let server = RelayServer::builder().bind("127.0.0.1:9000").build().await?;
//! tokio::spawn(server.run());
//!
//! let alice = RelayClient::connect("127.0.0.1:9000").await?;
//! let mut bob = RelayClient::connect("127.0.0.1:9000").await?;
//! alice.send("hello")?;
//! let msg = bob.recv().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! relay-transport (TCP streams) → relay-protocol (frames) → relay-room (fan-out)
//!                         ╰──────── relay::Connection ────────╯
//! ```

mod client;
mod connection;
mod error;
mod framed;
mod server;

pub use client::{ClientSender, RelayClient};
pub use connection::Connection;
pub use error::RelayError;
pub use server::{RelayServer, RelayServerBuilder};

/// The types most users need, in one import.
pub mod prelude {
    pub use crate::{
        ClientSender, Connection, RelayClient, RelayError, RelayServer,
        RelayServerBuilder,
    };
    pub use relay_protocol::{Message, ProtocolError, MAX_BODY_LEN};
    pub use relay_room::{RoomConfig, RoomError, RoomHandle};
    pub use relay_transport::{ConnectionId, TransportError};
}
