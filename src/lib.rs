//! PBO archive codec.
//!
//! Decodes and encodes PBO archives held entirely in memory: a header entry,
//! product extension strings, a file table, the concatenated payloads and an
//! optional trailing digest.
//!
//! Payloads are treated as opaque bytes. Compressed entries keep their
//! packing code and stored bytes; nothing here decompresses, extracts to disk
//! or verifies the digest.
//!
//! ## Features
//! - `sha1` - SHA-1 digest helper for the archive trailer
//!
//! ## Example
//!
//! ```rust
//! use pbo_stream::{Archive, FileEntry};
//!
//! let mut archive = Archive::new();
//! archive.extensions = vec!["prefix".into(), "my_addon".into()];
//! archive.files.push(FileEntry::new("config.cpp", &b"class CfgPatches {};"[..]));
//!
//! let buffer = pbo_stream::write(&archive, None)?;
//! let decoded = pbo_stream::parse(&buffer)?;
//! assert_eq!(decoded.files[0].name, "config.cpp");
//! # Ok::<(), pbo_stream::PboError>(())
//! ```

pub mod archive;
#[cfg(feature = "sha1")]
pub mod checksum;
pub mod cursor;
pub mod error;
pub mod formats;
pub mod parsing;

pub use archive::{Archive, ArchiveCodec, ParseOptions};
pub use cursor::{ByteCursor, DigestFn};
pub use error::{PboError, Result};
pub use formats::{PackingMethod, VERS_SIGNATURE};
pub use parsing::{FileEntry, HeaderEntry, TableRecord};

#[cfg(feature = "sha1")]
pub use checksum::sha1_digest;

/// Decode `buffer` with default [`ParseOptions`].
pub fn parse(buffer: &[u8]) -> Result<Archive> {
    ArchiveCodec::new().parse(buffer)
}

/// Encode `archive`, appending `0x00` and the output of `digest` if given.
pub fn write(archive: &Archive, digest: Option<DigestFn<'_>>) -> Result<bytes::Bytes> {
    ArchiveCodec::new().write(archive, digest)
}
