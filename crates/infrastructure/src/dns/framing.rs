//! Stream framing for DNS messages
//!
//! Every message on a stream transport is preceded by its length as a
//! 2-byte big-endian integer.

use ferrous_relay_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const MAX_MESSAGE_SIZE: usize = 65535;

/// Read one length-prefixed frame body.
///
/// A clean end of stream before the first prefix byte is
/// [`DomainError::ConnectionClosed`]; an end of stream anywhere inside a
/// frame is [`DomainError::MalformedFrame`].
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, DomainError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 2];

    let n = reader.read(&mut len_buf[..1]).await?;
    if n == 0 {
        return Err(DomainError::ConnectionClosed);
    }
    reader
        .read_exact(&mut len_buf[1..])
        .await
        .map_err(|e| truncated(e, "length prefix"))?;

    let frame_len = u16::from_be_bytes(len_buf) as usize;
    if frame_len == 0 {
        return Err(DomainError::MalformedFrame("zero-length frame".to_string()));
    }

    let mut body = vec![0u8; frame_len];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| truncated(e, "message body"))?;

    Ok(body)
}

/// Write `bytes` as a single frame and flush.
pub async fn write_frame<W>(writer: &mut W, bytes: &[u8]) -> Result<(), DomainError>
where
    W: AsyncWrite + Unpin,
{
    if bytes.len() > MAX_MESSAGE_SIZE {
        return Err(DomainError::MessageTooLarge(bytes.len()));
    }

    let length_bytes = (bytes.len() as u16).to_be_bytes();
    writer.write_all(&length_bytes).await?;
    writer.write_all(bytes).await?;
    writer.flush().await?;

    Ok(())
}

/// Read one frame and decode it as a DNS message.
pub async fn read_message<R>(reader: &mut R) -> Result<Message, DomainError>
where
    R: AsyncRead + Unpin,
{
    let body = read_frame(reader).await?;
    Message::from_vec(&body).map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))
}

pub fn encode_message(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);

    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::InvalidDnsMessage(format!("Failed to encode: {}", e)))?;

    Ok(buf)
}

/// Encode and write `message`; returns the bytes written including the prefix.
pub async fn write_message<W>(writer: &mut W, message: &Message) -> Result<usize, DomainError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode_message(message)?;
    write_frame(writer, &bytes).await?;
    Ok(bytes.len() + 2)
}

fn truncated(e: io::Error, part: &str) -> DomainError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        DomainError::MalformedFrame(format!("truncated {}", part))
    } else {
        DomainError::IoError(e.to_string())
    }
}
