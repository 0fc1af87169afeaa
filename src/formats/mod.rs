//! PBO wire constants and packing method codes.
//!
//! Packing codes are four ASCII bytes read as a little-endian `u32`, so
//! `"sreV"` on disk is `0x56657273` ("Vers") in memory.

/// Packing code of the version pseudo-entry in the file table.
pub const VERS_SIGNATURE: u32 = 0x5665_7273;

/// Header method as it appears on the wire (`VERS_SIGNATURE` in byte order).
pub const HEADER_METHOD: &str = "sreV";

/// Width of the header `method` field in bytes.
pub const METHOD_LEN: usize = 4;

/// Size of a file-table record with an empty name: one NUL plus five `u32`s.
pub const MIN_RECORD_SIZE: usize = 1 + 5 * 4;

/// Known per-file packing methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PackingMethod {
    /// Stored as-is; original size equals stored size.
    Uncompressed = 0x0000_0000,
    /// "Cprs": LZSS compressed payload.
    Compressed = 0x4370_7273,
    /// "Encr": encrypted payload.
    Encrypted = 0x456e_6372,
    /// "Vers": version pseudo-entry carrying product strings.
    Version = VERS_SIGNATURE,
}

impl PackingMethod {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for PackingMethod {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x0000_0000 => Ok(Self::Uncompressed),
            0x4370_7273 => Ok(Self::Compressed),
            0x456e_6372 => Ok(Self::Encrypted),
            VERS_SIGNATURE => Ok(Self::Version),
            other => Err(other),
        }
    }
}

impl From<PackingMethod> for u32 {
    fn from(method: PackingMethod) -> Self {
        method.code()
    }
}
