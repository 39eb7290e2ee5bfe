//! Room membership and broadcast fan-out for the relay.
//!
//! A room is a registry of participants and nothing more: it keeps no
//! history and no queue of its own. A broadcast pushes the message onto
//! each recipient's own outbound queue and returns. A slow peer can only
//! ever grow its own queue; it never stalls the sender or anyone else.
//!
//! # Key types
//!
//! - [`Participant`] — the capability a room needs from a member
//! - [`Peer`] — the one participant implementation, an outbound queue
//! - [`Room`] — the membership set and synchronous fan-out loop
//! - [`RoomHandle`] — send commands to a room running as a Tokio task
//! - [`RoomConfig`] — capacity and channel sizing

mod config;
mod error;
mod handle;
mod participant;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use handle::{spawn_room, RoomHandle};
pub use participant::{OutboundQueue, Participant, Peer};
pub use room::{Room, RoomInfo};
