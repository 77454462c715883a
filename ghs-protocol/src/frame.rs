//! Binary frame format.
//!
//! Frame layout (8 bytes header + payload):
//!
//! ```text
//! +-------------+---------------+
//! | payload_len | version_magic |
//! |   4 bytes   |    4 bytes    |
//! +-------------+---------------+
//! | payload (JSON-RPC + NUL)    |
//! | payload_len bytes           |
//! +-----------------------------+
//! ```
//!
//! Both header fields are big-endian.

use crate::error::ProtocolError;
use bytes::{BufMut, Bytes, BytesMut};

/// Magic number identifying the header generation the mainframe speaks.
pub const VERSION_MAGIC: u32 = 1_195_638_785;

/// Size of the fixed frame header in bytes (4+4 = 8).
pub const FRAME_HEADER_SIZE: usize = 8;

/// A parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Number of payload bytes that follow the header.
    pub payload_len: u32,
    /// Protocol generation marker.
    pub version_magic: u32,
}

impl FrameHeader {
    pub fn new(payload_len: u32) -> Self {
        Self {
            payload_len,
            version_magic: VERSION_MAGIC,
        }
    }

    /// Encodes the header into its 8-byte wire form.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut out = [0u8; FRAME_HEADER_SIZE];
        out[0..4].copy_from_slice(&self.payload_len.to_be_bytes());
        out[4..8].copy_from_slice(&self.version_magic.to_be_bytes());
        out
    }
}

/// Decodes and validates a frame header.
///
/// Only the first [`FRAME_HEADER_SIZE`] bytes are inspected. Fails if fewer
/// bytes are supplied or if the magic does not match [`VERSION_MAGIC`].
pub fn decode_header(buf: &[u8]) -> Result<FrameHeader, ProtocolError> {
    if buf.len() < FRAME_HEADER_SIZE {
        return Err(ProtocolError::ShortHeader {
            received: buf.len(),
        });
    }

    let payload_len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let version_magic = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);

    if version_magic != VERSION_MAGIC {
        return Err(ProtocolError::VersionMismatch {
            expected: VERSION_MAGIC,
            actual: version_magic,
        });
    }

    Ok(FrameHeader {
        payload_len,
        version_magic,
    })
}

/// A complete frame: header plus NUL-terminated JSON payload.
#[derive(Debug, Clone)]
pub struct Frame {
    pub payload: Bytes,
}

impl Frame {
    /// Creates a frame from a raw payload (terminator already included).
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    /// Creates a frame from a JSON-serializable value, appending the NUL
    /// terminator.
    pub fn from_json<T: serde::Serialize>(value: &T) -> Result<Self, ProtocolError> {
        let mut payload = serde_json::to_vec(value)?;
        payload.push(0);
        Ok(Self::new(Bytes::from(payload)))
    }

    pub fn header(&self) -> Result<FrameHeader, ProtocolError> {
        let len = u32::try_from(self.payload.len()).map_err(|_| ProtocolError::FrameTooLarge {
            size: self.payload.len() as u64,
            max: u64::from(u32::MAX),
        })?;
        Ok(FrameHeader::new(len))
    }

    /// Encodes the frame into bytes.
    pub fn encode(&self) -> Result<BytesMut, ProtocolError> {
        let header = self.header()?;
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        buf.put_u32(header.payload_len);
        buf.put_u32(header.version_magic);
        buf.put_slice(&self.payload);
        Ok(buf)
    }
}
