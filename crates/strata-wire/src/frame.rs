//! Frame encoding and decoding.
//!
//! A frame is a fixed-size header followed by a variable-size payload. The
//! header carries a checksum over the payload; frames failing validation are
//! rejected before any payload decoding happens.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use crc32fast::Hasher;

use crate::error::{WireError, WireResult};

/// Protocol magic bytes: "STRA" in big-endian.
pub const MAGIC: u32 = 0x5354_5241;

/// Current protocol version.
pub const PROTOCOL_VERSION: u16 = 1;

/// Frame header size in bytes (magic + version + length + checksum).
pub const FRAME_HEADER_SIZE: usize = 14;

/// Maximum payload size (1 MiB). Schema-metadata messages are small; a
/// larger frame indicates a corrupt stream or a misbehaving peer.
pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

/// Frame header containing metadata about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol magic bytes.
    pub magic: u32,
    /// Protocol version.
    pub version: u16,
    /// Payload length in bytes.
    pub length: u32,
    /// CRC32 checksum of the payload.
    pub checksum: u32,
}

impl FrameHeader {
    /// Creates a header for the given payload.
    pub fn new(payload: &[u8]) -> Self {
        Self {
            magic: MAGIC,
            version: PROTOCOL_VERSION,
            length: payload.len() as u32,
            checksum: checksum_of(payload),
        }
    }

    /// Encodes the header into `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.magic);
        buf.put_u16(self.version);
        buf.put_u32(self.length);
        buf.put_u32(self.checksum);
    }

    /// Decodes a header, returning `None` when fewer than
    /// [`FRAME_HEADER_SIZE`] bytes are available.
    pub fn decode(buf: &mut impl Buf) -> Option<Self> {
        if buf.remaining() < FRAME_HEADER_SIZE {
            return None;
        }

        Some(Self {
            magic: buf.get_u32(),
            version: buf.get_u16(),
            length: buf.get_u32(),
            checksum: buf.get_u32(),
        })
    }

    /// Validates magic, version and payload bounds.
    pub fn validate(&self) -> WireResult<()> {
        if self.magic != MAGIC {
            return Err(WireError::InvalidMagic(self.magic));
        }
        if self.version != PROTOCOL_VERSION {
            return Err(WireError::UnsupportedVersion(self.version));
        }
        if self.length > MAX_PAYLOAD_SIZE {
            return Err(WireError::PayloadTooLarge {
                size: self.length,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(())
    }
}

/// A complete frame with header and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header.
    pub header: FrameHeader,
    /// Payload bytes.
    pub payload: Bytes,
}

impl Frame {
    /// Creates a frame wrapping the payload.
    pub fn new(payload: Bytes) -> Self {
        let header = FrameHeader::new(&payload);
        Self { header, payload }
    }

    /// Encodes the frame into `buf`.
    pub fn encode(&self, buf: &mut BytesMut) {
        self.header.encode(buf);
        buf.put_slice(&self.payload);
    }

    /// Encodes the frame into a freshly allocated buffer.
    pub fn encode_to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + self.payload.len());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Attempts to decode a frame from `buf`.
    ///
    /// Returns `Ok(Some(frame))` when a complete, valid frame was consumed
    /// from the buffer, `Ok(None)` when more bytes are needed, and `Err`
    /// when the stream is corrupt.
    pub fn decode(buf: &mut BytesMut) -> WireResult<Option<Self>> {
        if buf.len() < FRAME_HEADER_SIZE {
            return Ok(None);
        }

        // Peek at the header without consuming, in case the payload has not
        // fully arrived yet.
        let header = {
            let mut peek = buf.as_ref();
            FrameHeader::decode(&mut peek).expect("checked length above")
        };
        header.validate()?;

        let total_size = FRAME_HEADER_SIZE + header.length as usize;
        if buf.len() < total_size {
            return Ok(None);
        }

        buf.advance(FRAME_HEADER_SIZE);
        let payload = buf.split_to(header.length as usize).freeze();

        let actual = checksum_of(&payload);
        if actual != header.checksum {
            return Err(WireError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        Ok(Some(Self { header, payload }))
    }
}

/// CRC32 checksum of `data`.
fn checksum_of(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
