//! Core protocol types: the payload a user sends and the frame that
//! carries it.
//!
//! Both types share one `Bytes` buffer holding the complete encoded
//! frame. A `Message` is fanned out to many peers, so cloning it must be
//! cheap: cloning `Bytes` bumps a reference count instead of copying the
//! payload.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::codec::{decode_header, encode};
use crate::{ProtocolError, HEADER_LEN, MAX_BODY_LEN};

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A complete wire frame: 4-byte decimal header followed by the body.
///
/// Invariant: the header always equals the number of body bytes that
/// follow it, and that number never exceeds [`MAX_BODY_LEN`]. The only
/// ways to get a `Frame` are [`encode`](crate::encode), which builds a
/// correct one, and `TryFrom<Bytes>`, which checks an untrusted one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wraps bytes the caller has already laid out as a valid frame.
    pub(crate) fn from_validated(bytes: Bytes) -> Self {
        debug_assert!(bytes.len() >= HEADER_LEN);
        Self { bytes }
    }

    /// The 4 header bytes, e.g. `*b"0005"`.
    pub fn header(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&self.bytes[..HEADER_LEN]);
        header
    }

    /// The body bytes following the header.
    pub fn body(&self) -> &[u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// The whole frame, ready to be written to a stream.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total frame length, header included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Frames always carry a header, so this is never true. Provided to
    /// pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<Bytes> for Frame {
    type Error = ProtocolError;

    /// Validates an untrusted buffer that must hold exactly one frame.
    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        let Some((header, rest)) = bytes.split_first_chunk::<HEADER_LEN>()
        else {
            return Err(ProtocolError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        };

        let body_len = decode_header(header)?;
        if rest.len() < body_len {
            return Err(ProtocolError::Truncated {
                expected: body_len,
                actual: rest.len(),
            });
        }
        if rest.len() > body_len {
            return Err(ProtocolError::TrailingBytes(rest.len() - body_len));
        }

        Ok(Self::from_validated(bytes))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame(\"{}\")", self.bytes.escape_ascii())
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// An immutable payload of at most [`MAX_BODY_LEN`] bytes.
///
/// Messages are values: once built they are only cloned and queued,
/// never mutated. The encoded frame is computed once, up front, so the
/// write path can hand [`Message::frame`] straight to the socket.
///
/// ```rust
/// use relay_protocol::Message;
///
/// let msg = Message::new("hello");
/// assert_eq!(msg.body(), b"hello");
/// assert_eq!(msg.frame().as_bytes(), b"0005hello");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Message {
    frame: Frame,
}

impl Message {
    /// Builds a message, silently truncating the payload to
    /// [`MAX_BODY_LEN`] bytes.
    pub fn new(payload: impl AsRef<[u8]>) -> Self {
        Self {
            frame: encode(payload.as_ref()),
        }
    }

    /// Builds a message, rejecting payloads longer than
    /// [`MAX_BODY_LEN`] instead of truncating them.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Oversize`] if the payload does not fit.
    pub fn try_new(payload: impl AsRef<[u8]>) -> Result<Self, ProtocolError> {
        let payload = payload.as_ref();
        if payload.len() > MAX_BODY_LEN {
            return Err(ProtocolError::Oversize(payload.len()));
        }
        Ok(Self::new(payload))
    }

    /// The payload bytes.
    pub fn body(&self) -> &[u8] {
        self.frame.body()
    }

    /// Number of payload bytes. Always `<= MAX_BODY_LEN`.
    pub fn body_len(&self) -> usize {
        self.frame.body().len()
    }

    /// The payload as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.body())
    }

    /// The encoded wire frame for this message.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Consumes the message, returning its wire frame.
    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        Self { frame }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("body_len", &self.body_len())
            .field("body", &self.body().escape_ascii().to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_new_builds_frame_once() {
        let msg = Message::new("hello");
        assert_eq!(msg.body(), b"hello");
        assert_eq!(msg.body_len(), 5);
        assert_eq!(msg.frame().header(), *b"0005");
        assert_eq!(msg.frame().as_bytes(), b"0005hello");
    }

    #[test]
    fn test_message_new_truncates_oversize_payload() {
        let msg = Message::new(vec![b'x'; 600]);
        assert_eq!(msg.body_len(), MAX_BODY_LEN);
        assert_eq!(msg.frame().header(), *b"0508");
    }

    #[test]
    fn test_message_try_new_rejects_oversize_payload() {
        let err = Message::try_new(vec![b'x'; MAX_BODY_LEN + 1]).unwrap_err();
        assert_eq!(err, ProtocolError::Oversize(MAX_BODY_LEN + 1));
    }

    #[test]
    fn test_message_try_new_accepts_max_body() {
        let msg = Message::try_new(vec![b'x'; MAX_BODY_LEN]).unwrap();
        assert_eq!(msg.body_len(), MAX_BODY_LEN);
    }

    #[test]
    fn test_message_clone_shares_buffer() {
        let msg = Message::new("shared");
        let copy = msg.clone();
        assert_eq!(msg, copy);
        assert_eq!(msg.body().as_ptr(), copy.body().as_ptr());
    }

    #[test]
    fn test_message_text_is_lossy() {
        let msg = Message::new([b'h', b'i', 0xff]);
        assert_eq!(msg.text(), "hi\u{fffd}");
    }

    #[test]
    fn test_frame_try_from_accepts_exact_frame() {
        let frame = Frame::try_from(Bytes::from_static(b"0003abc")).unwrap();
        assert_eq!(frame.body(), b"abc");
        assert_eq!(frame.len(), 7);
    }

    #[test]
    fn test_frame_try_from_rejects_short_header() {
        let err = Frame::try_from(Bytes::from_static(b"00")).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Truncated {
                expected: HEADER_LEN,
                actual: 2
            }
        );
    }

    #[test]
    fn test_frame_try_from_rejects_trailing_bytes() {
        let err = Frame::try_from(Bytes::from_static(b"0001abc")).unwrap_err();
        assert_eq!(err, ProtocolError::TrailingBytes(2));
    }

    #[test]
    fn test_frame_debug_escapes_bytes() {
        let frame = Message::new([b'a', b'\n']).into_frame();
        assert_eq!(format!("{frame:?}"), "Frame(\"0002a\\n\")");
    }
}
