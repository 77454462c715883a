//! Deadline-bounded read and write loops over a byte stream.

use crate::error::ClientError;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{timeout_at, Instant};

/// Writes all of `buf`, resending the remaining suffix after partial writes.
///
/// A zero-length write means the peer is gone and fails with
/// [`io::ErrorKind::WriteZero`].
pub async fn write_full<W>(writer: &mut W, buf: &[u8], deadline: Instant) -> Result<usize, ClientError>
where
    W: AsyncWrite + Unpin,
{
    timeout_at(deadline, async {
        let mut written = 0;
        while written < buf.len() {
            match writer.write(&buf[written..]).await {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "socket connection broken",
                    ));
                }
                Ok(n) => {
                    written += n;
                    tracing::trace!("wrote {} bytes ({}/{})", n, written, buf.len());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        writer.flush().await?;
        Ok(written)
    })
    .await
    .map_err(|_| ClientError::Timeout)?
    .map_err(ClientError::Io)
}

/// Largest up-front allocation for a read; the buffer grows past it only as
/// bytes arrive.
const READ_CHUNK: usize = 64 * 1024;

/// Reads up to `len` bytes, accumulating partial reads.
///
/// Returns early with a shorter buffer if the peer closes the stream; the
/// caller decides whether a short buffer is an error.
pub async fn read_full<R>(reader: &mut R, len: usize, deadline: Instant) -> Result<Vec<u8>, ClientError>
where
    R: AsyncRead + Unpin,
{
    timeout_at(deadline, async {
        let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
        while buf.len() < len {
            let remaining = (len - buf.len()) as u64;
            match (&mut *reader).take(remaining).read_buf(&mut buf).await {
                Ok(0) => {
                    tracing::debug!("peer closed after {} of {} bytes", buf.len(), len);
                    break;
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(buf)
    })
    .await
    .map_err(|_| ClientError::Timeout)?
    .map_err(ClientError::Io)
}
