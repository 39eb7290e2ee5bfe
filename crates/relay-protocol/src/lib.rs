//! Wire protocol for the relay.
//!
//! This crate defines the framing that clients and the server speak:
//!
//! - **Types** ([`Message`], [`Frame`]) — a bounded payload and its
//!   on-the-wire form.
//! - **Codec** ([`encode`], [`decode_header`], [`extract_body`],
//!   [`decode`]) — how payloads are turned into frames and back.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while framing.
//!
//! # Wire format
//!
//! ```text
//! ┌──────────────────────┬─────────────────────────────┐
//! │ 4 bytes: "0005"      │ body: b"hello"              │
//! │ ASCII decimal length │ exactly `length` bytes      │
//! └──────────────────────┴─────────────────────────────┘
//! ```
//!
//! A frame never exceeds [`MAX_FRAME_LEN`] bytes, so a body never exceeds
//! [`MAX_BODY_LEN`].
//!
//! The protocol layer knows nothing about sockets or rooms. It only turns
//! bytes into messages and messages into bytes.

mod codec;
mod error;
mod types;

pub use codec::{decode, decode_header, encode, extract_body};
pub use error::ProtocolError;
pub use types::{Frame, Message};

/// Length of the fixed-width decimal header in bytes.
pub const HEADER_LEN: usize = 4;

/// Upper bound on a whole frame, header included.
pub const MAX_FRAME_LEN: usize = 512;

/// Upper bound on a message body.
pub const MAX_BODY_LEN: usize = MAX_FRAME_LEN - HEADER_LEN;
