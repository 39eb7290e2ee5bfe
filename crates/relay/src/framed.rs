//! Reading and writing whole frames on a byte stream.
//!
//! These are the two suspension points of a connection: waiting for
//! exactly N bytes to arrive, and waiting for a frame to be written.

use bytes::{BufMut, BytesMut};
use relay_protocol::{decode_header, Frame, Message, HEADER_LEN};
use relay_transport::TransportError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::RelayError;

/// Reads exactly one header.
///
/// Returns `Ok(None)` if the stream ends before any header byte: a peer
/// hanging up between frames is a clean close. Ending part-way through
/// the header is an error.
pub(crate) async fn read_header<R>(
    reader: &mut R,
) -> Result<Option<[u8; HEADER_LEN]>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader
            .read(&mut header[filled..])
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(TransportError::ConnectionClosed(format!(
                "stream ended after {filled} of {HEADER_LEN} header bytes"
            )));
        }
        filled += n;
    }
    Ok(Some(header))
}

/// Reads exactly `body_len` body bytes and assembles the message.
///
/// The header is copied in front of the body so the resulting message
/// keeps its wire frame without re-encoding it for fan-out.
pub(crate) async fn read_body<R>(
    reader: &mut R,
    header: [u8; HEADER_LEN],
    body_len: usize,
) -> Result<Message, RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(HEADER_LEN + body_len);
    buf.put_slice(&header);
    buf.resize(HEADER_LEN + body_len, 0);
    reader
        .read_exact(&mut buf[HEADER_LEN..])
        .await
        .map_err(TransportError::from_read)?;

    let frame = Frame::try_from(buf.freeze())?;
    Ok(Message::from(frame))
}

/// Reads one complete frame. `Ok(None)` on a clean close.
pub(crate) async fn read_message<R>(reader: &mut R) -> Result<Option<Message>, RelayError>
where
    R: AsyncRead + Unpin,
{
    let Some(header) = read_header(reader).await? else {
        return Ok(None);
    };
    let body_len = decode_header(&header)?;
    read_body(reader, header, body_len).await.map(Some)
}

/// Writes one complete frame and flushes it.
pub(crate) async fn write_message<W>(
    writer: &mut W,
    message: &Message,
) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(message.frame().as_bytes())
        .await
        .map_err(TransportError::SendFailed)?;
    writer.flush().await.map_err(TransportError::SendFailed)
}
