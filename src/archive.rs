//! Whole-archive decode and encode.
//!
//! An archive buffer is laid out as:
//!
//! 1. one [`HeaderEntry`]
//! 2. extension strings, closed by an empty string
//! 3. the file table, closed by a terminator record
//! 4. payloads in table order
//! 5. optionally `0x00` followed by a content digest

use bytes::Bytes;

use crate::cursor::{ByteCursor, DigestFn};
use crate::error::Result;
use crate::parsing::{
    write_extensions, write_file_table, ExtensionsParser, FileEntry, FileTableParser,
    HeaderEntry, HeaderEntryParser,
};

/// Options for decoding.
#[derive(Default)]
pub struct ParseOptions {
    /// Filter function: return true to include a file. Receives the file
    /// name and its index in the table.
    pub filter: Option<Box<dyn Fn(&str, usize) -> bool + Send + Sync>>,
    /// Maximum number of file entries to accept. `None` leaves the table
    /// walk bounded only by the size of the buffer.
    pub max_entries: Option<usize>,
}

/// A decoded PBO archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Leading header entry.
    pub header: HeaderEntry,
    /// Flat extension strings, usually alternating key and value.
    pub extensions: Vec<String>,
    /// Files in table order, with their payloads.
    pub files: Vec<FileEntry>,
    /// Digest bytes found after the trailer marker. Filled by decoding only;
    /// encoding computes its own.
    pub checksum: Option<Bytes>,
}

impl Archive {
    /// Empty archive with the conventional product header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extensions read as `(key, value)` pairs. A dangling key gets an empty
    /// value.
    pub fn extension_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extensions
            .chunks(2)
            .map(|pair| (pair[0].as_str(), pair.get(1).map_or("", String::as_str)))
    }

    /// First file named `name`.
    pub fn file(&self, name: &str) -> Option<&FileEntry> {
        self.files.iter().find(|entry| entry.name == name)
    }
}

/// Decoder/encoder for whole archives.
#[derive(Default)]
pub struct ArchiveCodec {
    options: ParseOptions,
}

impl ArchiveCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Decode a complete archive buffer.
    pub fn parse(&self, buffer: &[u8]) -> Result<Archive> {
        self.parse_bytes(Bytes::copy_from_slice(buffer))
    }

    /// Decode a complete archive held in `buffer`. File payloads are slices
    /// of `buffer`, not copies.
    pub fn parse_bytes(&self, buffer: Bytes) -> Result<Archive> {
        let mut cursor = ByteCursor::from_bytes(buffer);

        let header = HeaderEntryParser::parse(&mut cursor)?;
        let extensions = ExtensionsParser::parse(&mut cursor)?;
        let files = FileTableParser::parse(&mut cursor, &self.options)?;
        let checksum = Self::read_trailer(&mut cursor)?;

        log::debug!(
            "parsed archive: {} extensions, {} files, {} bytes",
            extensions.len(),
            files.len(),
            cursor.len()
        );

        Ok(Archive {
            header,
            extensions,
            files,
            checksum,
        })
    }

    /// `0x00` marker then digest bytes, if anything follows the payloads.
    fn read_trailer(cursor: &mut ByteCursor) -> Result<Option<Bytes>> {
        if cursor.remaining() == 0 {
            return Ok(None);
        }
        let marker = cursor.read_bytes(1)?;
        if marker[0] != 0 {
            log::debug!(
                "ignoring {} trailing bytes without digest marker",
                cursor.remaining() + 1
            );
            return Ok(None);
        }
        cursor.read_bytes(cursor.remaining()).map(Some)
    }

    /// Encode `archive` into a new buffer.
    ///
    /// When `digest` is given, it is computed over the encoded content and
    /// appended after a `0x00` byte. `archive.checksum` is not written.
    pub fn write(&self, archive: &Archive, digest: Option<DigestFn<'_>>) -> Result<Bytes> {
        let mut cursor = ByteCursor::new();

        archive.header.write(&mut cursor)?;
        write_extensions(&archive.extensions, &mut cursor)?;
        write_file_table(&archive.files, &mut cursor)?;

        log::debug!(
            "wrote archive: {} files, {} bytes before trailer",
            archive.files.len(),
            cursor.len()
        );

        Ok(cursor.finalize(digest))
    }
}
