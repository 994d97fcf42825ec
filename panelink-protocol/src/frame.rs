//! Frame encoding and decoding for the panel link.
//!
//! Frame format:
//! - HEADER1 (1 byte): 0x55
//! - HEADER2 (1 byte): 0xBB
//! - LENGTH (2 bytes): payload length, little endian
//! - PAYLOAD (LENGTH bytes)
//! - CRC (2 bytes): CRC-16 over header, length and payload, little endian
//!
//! The decoder is a pure check over an accumulating buffer. It keeps no
//! parse state besides the bytes themselves, so any error simply empties
//! the buffer and the next byte starts a fresh frame.

use alloc::vec::Vec;

use crate::crc::crc16;

/// First frame synchronization byte
pub const HEADER1: u8 = 0x55;

/// Second frame synchronization byte
pub const HEADER2: u8 = 0xBB;

/// Header bytes plus the length field
pub const HEADER_LEN: usize = 4;

/// Trailing CRC bytes
pub const CRC_LEN: usize = 2;

/// Bytes a frame adds around its payload
pub const FRAME_OVERHEAD: usize = HEADER_LEN + CRC_LEN;

/// Initial receive buffer capacity; larger frames grow the buffer
pub const PAYLOAD_RESERVE: usize = 1024;

/// Largest payload the 16-bit length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Errors that can occur during frame decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// A header byte did not match the expected sync value
    InvalidHeader { position: u8, byte: u8 },
    /// CRC carried in the frame does not match its contents
    InvalidChecksum { received: u16, calculated: u16 },
    /// Payload exceeds the 16-bit length field
    PayloadTooLarge,
}

/// Result of checking a buffer that starts at a frame boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// The buffer is a valid prefix of a frame
    NeedMore,
    /// A full frame validated
    Complete {
        /// Payload bytes inside the envelope
        payload: &'a [u8],
        /// Number of buffer bytes the frame occupies
        consumed: usize,
    },
}

/// Validate `buf` as a (possibly partial) frame
///
/// Returns `NeedMore` while the buffer is shorter than the frame it
/// announces, `Complete` once header and CRC check out, and an error as
/// soon as a header byte or the CRC is wrong.
pub fn decode(buf: &[u8]) -> Result<Decoded<'_>, FrameError> {
    for (position, expected) in [HEADER1, HEADER2].into_iter().enumerate() {
        match buf.get(position) {
            None => return Ok(Decoded::NeedMore),
            Some(&byte) if byte != expected => {
                return Err(FrameError::InvalidHeader {
                    position: position as u8,
                    byte,
                });
            }
            Some(_) => {}
        }
    }

    if buf.len() < HEADER_LEN {
        return Ok(Decoded::NeedMore);
    }

    let length = u16::from_le_bytes([buf[2], buf[3]]) as usize;
    let body_end = HEADER_LEN + length;
    let frame_len = body_end + CRC_LEN;
    if buf.len() < frame_len {
        return Ok(Decoded::NeedMore);
    }

    let received = u16::from_le_bytes([buf[body_end], buf[body_end + 1]]);
    let calculated = crc16(&buf[..body_end]);
    if received != calculated {
        return Err(FrameError::InvalidChecksum {
            received,
            calculated,
        });
    }

    Ok(Decoded::Complete {
        payload: &buf[HEADER_LEN..body_end],
        consumed: frame_len,
    })
}

/// Append the frame for `payload` to `out`
///
/// Returns the number of bytes written.
pub fn encode_into(payload: &[u8], out: &mut Vec<u8>) -> Result<usize, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge);
    }

    let start = out.len();
    out.reserve(payload.len() + FRAME_OVERHEAD);
    out.push(HEADER1);
    out.push(HEADER2);
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(payload);

    let crc = crc16(&out[start..]);
    out.extend_from_slice(&crc.to_le_bytes());

    Ok(out.len() - start)
}

/// Encode `payload` into a freshly allocated frame
pub fn encode(payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    let mut out = Vec::with_capacity(payload.len() + FRAME_OVERHEAD);
    encode_into(payload, &mut out)?;
    Ok(out)
}

/// Incremental frame decoder fed from the UART
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder with the default receive reservation
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(PAYLOAD_RESERVE),
        }
    }

    /// Drop any partial frame
    ///
    /// Capacity grown by an oversized frame is released back to the
    /// default reservation.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.buffer.shrink_to(PAYLOAD_RESERVE);
    }

    /// Number of bytes waiting in the buffer
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(payload))` when a complete valid frame is decoded,
    /// `Ok(None)` when more bytes are needed, or `Err` after discarding the
    /// buffer on a framing error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Vec<u8>>, FrameError> {
        self.buffer.push(byte);
        self.poll()
    }

    /// Append bytes without decoding them
    ///
    /// Call [`poll`](Self::poll) until it returns `Ok(None)` to drain every
    /// frame already sitting in the buffer.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Try to take one frame from the front of the buffer
    pub fn poll(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        match decode(&self.buffer) {
            Ok(Decoded::NeedMore) => Ok(None),
            Ok(Decoded::Complete { payload, consumed }) => {
                let payload = payload.to_vec();
                self.buffer.drain(..consumed);
                Ok(Some(payload))
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Feed bytes one at a time, yielding every frame or error they produce
    pub fn feed_bytes<'a>(&'a mut self, bytes: &'a [u8]) -> Frames<'a> {
        Frames {
            decoder: self,
            bytes: bytes.iter(),
        }
    }
}

/// Iterator returned by [`FrameDecoder::feed_bytes`]
pub struct Frames<'a> {
    decoder: &'a mut FrameDecoder,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Frames<'_> {
    type Item = Result<Vec<u8>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.decoder.feed(byte) {
                Ok(Some(payload)) => return Some(Ok(payload)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
