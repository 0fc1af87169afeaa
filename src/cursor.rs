//! Sequential byte cursor used by both the decoder and the encoder.
//!
//! A [`ByteCursor`] holds one buffer and a single offset. When decoding, the
//! buffer is a frozen [`Bytes`] and the offset points at the next unconsumed
//! byte; raw reads hand out slices of that same buffer. When encoding, the
//! buffer is a growable [`BytesMut`] and the offset always equals its length.
//! The cursor knows nothing about archive structure.
//!
//! Primitives:
//! - little-endian `u32`
//! - NUL-terminated strings
//! - fixed-length strings and raw byte runs

use std::fmt::Write as _;
use std::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{PboError, Result};

/// Digest function applied to the finished buffer, e.g. SHA-1.
pub type DigestFn<'a> = &'a dyn Fn(&[u8]) -> Vec<u8>;

#[derive(Debug, Clone)]
enum Storage {
    /// Input being decoded; shared with every payload read from it.
    Frozen(Bytes),
    /// Output being encoded.
    Growable(BytesMut),
}

impl Default for Storage {
    fn default() -> Self {
        Self::Growable(BytesMut::new())
    }
}

impl Storage {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::Frozen(data) => data,
            Self::Growable(buf) => buf,
        }
    }

    /// Switch to a growable buffer, copying frozen input once.
    fn growable(&mut self) -> &mut BytesMut {
        if let Self::Frozen(data) = self {
            *self = Self::Growable(BytesMut::from(&data[..]));
        }
        match self {
            Self::Growable(buf) => buf,
            Self::Frozen(_) => unreachable!("frozen storage converted above"),
        }
    }
}

/// Append/advance-only view over a binary buffer.
#[derive(Debug, Clone, Default)]
pub struct ByteCursor {
    storage: Storage,
    offset: usize,
}

impl ByteCursor {
    /// Empty cursor for encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor positioned at the start of `data`, for decoding. Raw reads
    /// return slices of `data` without copying.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            storage: Storage::Frozen(data.into()),
            offset: 0,
        }
    }

    /// Cursor over a copy of `data`, for decoding.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(data))
    }

    /// Current position in the buffer.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.storage.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.as_slice().is_empty()
    }

    /// Number of bytes left after the offset.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.offset)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_slice()
    }

    /// Consume exactly `count` bytes or fail without moving.
    #[inline]
    fn advance(&mut self, count: usize) -> Result<Range<usize>> {
        let have = self.remaining();
        if count > have {
            return Err(PboError::OutOfBounds {
                offset: self.offset,
                needed: count,
                have,
            });
        }
        let start = self.offset;
        self.offset += count;
        Ok(start..start + count)
    }

    fn append(&mut self, data: &[u8]) {
        let buf = self.storage.growable();
        buf.put_slice(data);
        self.offset = buf.len();
    }

    /// Append a `u32` in little-endian order.
    pub fn write_u32(&mut self, value: u32) {
        self.append(&value.to_le_bytes());
    }

    /// Read a `u32` in little-endian order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let range = self.advance(4)?;
        let bytes = &self.as_bytes()[range];
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Append the UTF-8 bytes of `value`, followed by a NUL when
    /// `null_terminate` is set.
    pub fn write_string(&mut self, value: &str, null_terminate: bool) {
        self.append(value.as_bytes());
        if null_terminate {
            self.append(&[0]);
        }
    }

    /// Read up to the next NUL byte (exclusive) or the end of the buffer.
    ///
    /// The terminator is consumed. An unterminated tail is returned as-is and
    /// leaves the cursor at the end of the buffer.
    pub fn read_string(&mut self) -> Result<String> {
        let rest = self.as_bytes().get(self.offset..).unwrap_or_default();
        let (len, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (nul, nul + 1),
            None => (rest.len(), rest.len()),
        };
        let text = String::from_utf8(rest[..len].to_vec())?;
        self.offset += consumed;
        Ok(text)
    }

    /// Same as [`write_string`](Self::write_string); used for fixed-width
    /// fields such as the 4-byte header method.
    pub fn write_fixed_string(&mut self, value: &str, null_terminate: bool) {
        self.write_string(value, null_terminate);
    }

    /// Read exactly `length` bytes as UTF-8 text, with no terminator scan.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String> {
        let range = self.advance(length)?;
        Ok(String::from_utf8(self.as_bytes()[range].to_vec())?)
    }

    /// Append a raw byte run.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.append(data);
    }

    /// Read exactly `length` raw bytes. Decoding cursors return a slice of
    /// the input buffer.
    pub fn read_bytes(&mut self, length: usize) -> Result<Bytes> {
        let range = self.advance(length)?;
        Ok(match &self.storage {
            Storage::Frozen(data) => data.slice(range),
            Storage::Growable(buf) => Bytes::copy_from_slice(&buf[range]),
        })
    }

    /// Skip ahead by `length` bytes.
    pub fn skip(&mut self, length: usize) -> Result<()> {
        self.advance(length).map(|_| ())
    }

    /// Finish encoding.
    ///
    /// When `digest` is given, it is computed over everything written so far
    /// and appended after a single `0x00` byte. The buffer is then frozen.
    pub fn finalize(mut self, digest: Option<DigestFn<'_>>) -> Bytes {
        if let Some(digest) = digest {
            let hash = digest(self.as_bytes());
            let buf = self.storage.growable();
            buf.reserve(hash.len() + 1);
            buf.put_u8(0);
            buf.put_slice(&hash);
        }
        match self.storage {
            Storage::Frozen(data) => data,
            Storage::Growable(buf) => buf.freeze(),
        }
    }

    /// Render the whole buffer as space-separated lowercase hex pairs.
    pub fn to_hex(&self) -> String {
        let bytes = self.as_bytes();
        let mut out = String::with_capacity(bytes.len() * 3);
        for (i, byte) in bytes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}
