//! Encoding and decoding of length-prefixed frames.
//!
//! The header is four ASCII decimal digits, zero-padded: a 5-byte body
//! gets the header `"0005"`. Decimal digits keep frames readable in a
//! packet capture. The price is a hard ceiling of [`MAX_BODY_LEN`] bytes
//! per body.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Frame, Message, ProtocolError, HEADER_LEN, MAX_BODY_LEN};

/// Encodes a payload into a frame.
///
/// Payloads longer than [`MAX_BODY_LEN`] are truncated to exactly
/// `MAX_BODY_LEN` bytes. Truncation is deterministic and silent; callers
/// that would rather reject oversize input use
/// [`Message::try_new`](crate::Message::try_new).
pub fn encode(payload: &[u8]) -> Frame {
    let body = &payload[..payload.len().min(MAX_BODY_LEN)];

    let mut buf = BytesMut::with_capacity(HEADER_LEN + body.len());
    buf.put_slice(&encode_header(body.len()));
    buf.put_slice(body);
    Frame::from_validated(buf.freeze())
}

/// Parses a 4-byte header into the body length it announces.
///
/// # Errors
/// Returns [`ProtocolError::HeaderDecode`] if any byte is not an ASCII
/// digit or if the value exceeds [`MAX_BODY_LEN`].
pub fn decode_header(header: &[u8; HEADER_LEN]) -> Result<usize, ProtocolError> {
    let mut len = 0usize;
    for &byte in header {
        if !byte.is_ascii_digit() {
            return Err(ProtocolError::HeaderDecode(format!(
                "\"{}\" is not a decimal length",
                header.escape_ascii()
            )));
        }
        len = len * 10 + usize::from(byte - b'0');
    }

    if len > MAX_BODY_LEN {
        return Err(ProtocolError::HeaderDecode(format!(
            "length {len} exceeds maximum body of {MAX_BODY_LEN}"
        )));
    }
    Ok(len)
}

/// Returns exactly the body bytes announced by the frame's header.
///
/// Bytes after the body are ignored here; [`decode`] is the strict
/// variant that rejects them.
///
/// # Errors
/// Fails if the header is invalid or fewer bytes follow it than it
/// declares.
pub fn extract_body(frame: &[u8]) -> Result<&[u8], ProtocolError> {
    let Some((header, rest)) = frame.split_first_chunk::<HEADER_LEN>() else {
        return Err(ProtocolError::Truncated {
            expected: HEADER_LEN,
            actual: frame.len(),
        });
    };

    let body_len = decode_header(header)?;
    rest.get(..body_len).ok_or(ProtocolError::Truncated {
        expected: body_len,
        actual: rest.len(),
    })
}

/// Decodes a buffer holding exactly one frame into a [`Message`].
///
/// # Errors
/// Fails if the header is invalid, the body is short, or bytes trail
/// the body.
pub fn decode(frame: &[u8]) -> Result<Message, ProtocolError> {
    let frame = Frame::try_from(Bytes::copy_from_slice(frame))?;
    Ok(Message::from(frame))
}

/// Zero-padded ASCII decimal rendering of `len`. Callers guarantee
/// `len <= MAX_BODY_LEN`, which always fits in four digits.
pub(crate) fn encode_header(len: usize) -> [u8; HEADER_LEN] {
    let mut header = [b'0'; HEADER_LEN];
    let mut rest = len;
    for slot in header.iter_mut().rev() {
        // `rest % 10` is always < 10, so the cast cannot truncate.
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_hello_matches_wire_format() {
        let frame = encode(b"hello");
        assert_eq!(frame.as_bytes(), b"0005hello");
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = encode(b"");
        assert_eq!(frame.as_bytes(), b"0000");
        assert_eq!(decode_header(&frame.header()).unwrap(), 0);
    }

    #[test]
    fn test_round_trip_every_valid_length() {
        for len in 0..=MAX_BODY_LEN {
            let body: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let frame = encode(&body);

            assert_eq!(decode_header(&frame.header()).unwrap(), len);
            assert_eq!(decode(frame.as_bytes()).unwrap().body(), &body[..]);
        }
    }

    #[test]
    fn test_encode_truncates_600_bytes_to_508() {
        let payload = vec![b'a'; 600];
        let frame = encode(&payload);

        assert_eq!(frame.body().len(), 508);
        assert_eq!(frame.len(), 512);
        assert_eq!(decode_header(&frame.header()).unwrap(), 508);
        assert_eq!(frame.body(), &payload[..508]);
    }

    #[test]
    fn test_decode_header_rejects_non_digits() {
        let err = decode_header(b"abcd").unwrap_err();
        assert!(matches!(err, ProtocolError::HeaderDecode(_)));
        assert!(err.to_string().contains("abcd"));
    }

    #[test]
    fn test_decode_header_rejects_length_over_max() {
        let err = decode_header(b"9999").unwrap_err();
        assert!(matches!(err, ProtocolError::HeaderDecode(_)));
    }

    #[test]
    fn test_decode_header_boundary() {
        assert_eq!(decode_header(b"0508").unwrap(), 508);
        assert!(decode_header(b"0509").is_err());
    }

    #[test]
    fn test_decode_header_rejects_padding_spaces() {
        // Only zero padding is valid; " 12" is not a header.
        assert!(decode_header(b"  12").is_err());
        assert!(decode_header(b"+012").is_err());
    }

    #[test]
    fn test_extract_body_ignores_trailing_bytes() {
        let body = extract_body(b"0003abcdef").unwrap();
        assert_eq!(body, b"abc");
    }

    #[test]
    fn test_extract_body_rejects_short_body() {
        let err = extract_body(b"0010abc").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::Truncated {
                expected: 10,
                actual: 3
            }
        );
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let err = decode(b"0001ab").unwrap_err();
        assert_eq!(err, ProtocolError::TrailingBytes(1));
    }

    #[test]
    fn test_encode_header_pads_with_zeros() {
        assert_eq!(encode_header(0), *b"0000");
        assert_eq!(encode_header(7), *b"0007");
        assert_eq!(encode_header(42), *b"0042");
        assert_eq!(encode_header(508), *b"0508");
    }
}
