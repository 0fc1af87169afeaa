//! Header entry parser.
//!
//! The header entry is the first record of every PBO. In well-formed
//! archives its filename is empty and its method is `"sreV"`, but both are
//! read and written verbatim.
//!
//! Layout: NUL-terminated filename, 4-byte method, then `u32` original size,
//! reserved, timestamp and data size.

use crate::cursor::ByteCursor;
use crate::error::{PboError, Result};
use crate::formats::{HEADER_METHOD, METHOD_LEN};

/// First record of the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// Usually empty.
    pub filename: String,
    /// Four-byte method code, usually `"sreV"`.
    pub method: String,
    pub original_size: u32,
    /// Stored verbatim; normally zero.
    pub reserved: u32,
    pub timestamp: u32,
    pub data_size: u32,
}

impl Default for HeaderEntry {
    fn default() -> Self {
        Self {
            filename: String::new(),
            method: HEADER_METHOD.to_string(),
            original_size: 0,
            reserved: 0,
            timestamp: 0,
            data_size: 0,
        }
    }
}

impl HeaderEntry {
    /// Encode the six header fields in wire order.
    pub fn write(&self, cursor: &mut ByteCursor) -> Result<()> {
        if self.filename.contains('\0') {
            return Err(PboError::InvalidEntry(format!(
                "header filename {:?} contains NUL",
                self.filename
            )));
        }
        if self.method.len() != METHOD_LEN {
            return Err(PboError::InvalidEntry(format!(
                "header method {:?} must be {} bytes, got {}",
                self.method,
                METHOD_LEN,
                self.method.len()
            )));
        }

        cursor.write_string(&self.filename, true);
        cursor.write_fixed_string(&self.method, false);
        cursor.write_u32(self.original_size);
        cursor.write_u32(self.reserved);
        cursor.write_u32(self.timestamp);
        cursor.write_u32(self.data_size);
        Ok(())
    }
}

/// Parser for the leading [`HeaderEntry`].
pub struct HeaderEntryParser;

impl HeaderEntryParser {
    /// Smallest possible header entry (empty filename).
    pub const MIN_SIZE: usize = 1 + METHOD_LEN + 4 * 4;

    pub fn parse(cursor: &mut ByteCursor) -> Result<HeaderEntry> {
        let filename = cursor.read_string()?;
        let method = cursor.read_fixed_string(METHOD_LEN)?;
        let original_size = cursor.read_u32()?;
        let reserved = cursor.read_u32()?;
        let timestamp = cursor.read_u32()?;
        let data_size = cursor.read_u32()?;

        log::trace!("header entry {filename:?} method {method:?}");

        Ok(HeaderEntry {
            filename,
            method,
            original_size,
            reserved,
            timestamp,
            data_size,
        })
    }
}
