//! File table parser.
//!
//! The file table is a sequence of fixed-shape records:
//!
//! ```text
//! name: NUL-terminated string
//! packing, original_size, reserved, timestamp, size: u32 LE
//! ```
//!
//! Two records are special:
//! - `packing == "Vers"` is a version block. It is followed by a list of
//!   strings closed by an empty string, owns no payload and never becomes a
//!   [`FileEntry`].
//! - an empty name with any other packing ends the table.
//!
//! Payloads follow the table, concatenated in record order, each `size`
//! bytes long.

use bytes::Bytes;

use crate::archive::ParseOptions;
use crate::cursor::ByteCursor;
use crate::error::{PboError, Result};
use crate::formats::{PackingMethod, MIN_RECORD_SIZE, VERS_SIGNATURE};
use crate::parsing::extensions::ExtensionsParser;

/// One file stored in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path inside the archive, usually with `\` separators.
    pub name: String,
    /// Raw packing code; see [`PackingMethod`].
    pub packing: u32,
    /// Unpacked size. Equal to `size` for uncompressed entries.
    pub original_size: u32,
    pub timestamp: u32,
    /// Stored size of `data` in the archive.
    pub size: u32,
    /// Stored payload, compressed or not. Never decompressed here.
    pub data: Bytes,
}

impl FileEntry {
    /// Uncompressed entry holding `data`.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let size = u32::try_from(data.len()).unwrap_or(u32::MAX);
        Self {
            name: name.into(),
            packing: PackingMethod::Uncompressed.code(),
            original_size: size,
            timestamp: 0,
            size,
            data,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Known packing method, or `None` for an unrecognized code.
    pub fn packing_method(&self) -> Option<PackingMethod> {
        PackingMethod::try_from(self.packing).ok()
    }

    pub fn is_compressed(&self) -> bool {
        self.packing != PackingMethod::Uncompressed.code()
    }
}

/// A decoded file-table record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRecord {
    /// A real file; its `data` is still empty.
    Regular(FileEntry),
    /// Version pseudo-entry and the strings it carries.
    VersionBlock(Vec<String>),
    /// End of the table.
    Terminator,
}

/// Parser for the file table and the payloads that follow it.
pub struct FileTableParser;

impl FileTableParser {
    /// Decode the record at the cursor.
    pub fn next_record(cursor: &mut ByteCursor) -> Result<TableRecord> {
        let name = cursor.read_string()?;
        let packing = cursor.read_u32()?;
        let mut original_size = cursor.read_u32()?;
        let _reserved = cursor.read_u32()?;
        let timestamp = cursor.read_u32()?;
        let size = cursor.read_u32()?;

        if packing == VERS_SIGNATURE {
            return ExtensionsParser::parse(cursor).map(TableRecord::VersionBlock);
        }
        if name.is_empty() {
            return Ok(TableRecord::Terminator);
        }
        if packing == PackingMethod::Uncompressed.code() {
            original_size = size;
        }

        Ok(TableRecord::Regular(FileEntry {
            name,
            packing,
            original_size,
            timestamp,
            size,
            data: Bytes::new(),
        }))
    }

    /// Walk the table up to its terminator, then read every payload.
    ///
    /// Every record takes at least [`MIN_RECORD_SIZE`] bytes, so the walk is
    /// bounded by the bytes left in the buffer: once fewer remain and no
    /// terminator was seen, the table is malformed. `options.max_entries`
    /// optionally caps the number of file entries below that.
    ///
    /// Files rejected by `options.filter` have their payload skipped and are
    /// left out of the result.
    pub fn parse(cursor: &mut ByteCursor, options: &ParseOptions) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        loop {
            if cursor.remaining() < MIN_RECORD_SIZE {
                return Err(PboError::MalformedTable(format!(
                    "no terminating record before offset {} ({} entries read)",
                    cursor.len(),
                    entries.len()
                )));
            }

            match Self::next_record(cursor)? {
                TableRecord::Regular(entry) => {
                    if let Some(max) = options.max_entries {
                        if entries.len() >= max {
                            return Err(PboError::MalformedTable(format!(
                                "more than {max} file entries"
                            )));
                        }
                    }
                    log::trace!(
                        "file entry {:?} packing {:#010x} size {}",
                        entry.name,
                        entry.packing,
                        entry.size
                    );
                    entries.push(entry);
                }
                TableRecord::VersionBlock(strings) => {
                    log::debug!("skipping version block with {} strings", strings.len());
                }
                TableRecord::Terminator => break,
            }
        }

        let mut files = Vec::with_capacity(entries.len());
        for (index, mut entry) in entries.into_iter().enumerate() {
            let size = entry.size as usize;
            let selected = options
                .filter
                .as_ref()
                .is_none_or(|filter| filter(&entry.name, index));

            if selected {
                entry.data = cursor.read_bytes(size)?;
                files.push(entry);
            } else {
                log::debug!("filtered out {:?}", entry.name);
                cursor.skip(size)?;
            }
        }

        Ok(files)
    }
}

/// Write the table records, the terminator record, then every payload.
pub fn write_file_table(files: &[FileEntry], cursor: &mut ByteCursor) -> Result<()> {
    for entry in files {
        validate_entry(entry)?;
    }

    for entry in files {
        let original_size = if entry.packing == PackingMethod::Uncompressed.code() {
            entry.size
        } else {
            entry.original_size
        };

        cursor.write_string(&entry.name, true);
        cursor.write_u32(entry.packing);
        cursor.write_u32(original_size);
        cursor.write_u32(0);
        cursor.write_u32(entry.timestamp);
        cursor.write_u32(entry.size);
        log::trace!("wrote record {:?}", entry.name);
    }

    // terminator: empty name, every field zero
    cursor.write_string("", true);
    for _ in 0..5 {
        cursor.write_u32(0);
    }

    for entry in files {
        cursor.write_bytes(&entry.data);
    }
    Ok(())
}

fn validate_entry(entry: &FileEntry) -> Result<()> {
    if entry.name.is_empty() {
        return Err(PboError::InvalidEntry(
            "file name is empty and would end the table".to_string(),
        ));
    }
    if entry.name.contains('\0') {
        return Err(PboError::InvalidEntry(format!(
            "file name {:?} contains NUL",
            entry.name
        )));
    }
    if entry.packing == VERS_SIGNATURE {
        return Err(PboError::InvalidEntry(format!(
            "file {:?} uses the version block packing code",
            entry.name
        )));
    }
    if entry.data.len() != entry.size as usize {
        return Err(PboError::InvalidEntry(format!(
            "file {:?} declares size {} but holds {} bytes",
            entry.name,
            entry.size,
            entry.data.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(buf: &mut Vec<u8>, name: &str, fields: [u32; 5]) {
        buf.extend_from_slice(name.as_bytes());
        buf.push(0);
        for field in fields {
            buf.extend_from_slice(&field.to_le_bytes());
        }
    }

    fn terminator(buf: &mut Vec<u8>) {
        record(buf, "", [0; 5]);
    }

    #[test]
    fn test_uncompressed_original_size_normalized() {
        let mut buf = Vec::new();
        record(&mut buf, "big.bin", [0, 999, 0, 0, 100]);
        let mut cursor = ByteCursor::from_slice(&buf);

        let TableRecord::Regular(entry) = FileTableParser::next_record(&mut cursor).unwrap() else {
            panic!("expected a regular record");
        };
        assert_eq!(entry.size, 100);
        assert_eq!(entry.original_size, 100);
    }

    #[test]
    fn test_compressed_original_size_kept() {
        let mut buf = Vec::new();
        record(&mut buf, "c.sqf", [0x4370_7273, 999, 0, 0, 100]);
        let mut cursor = ByteCursor::from_slice(&buf);

        let TableRecord::Regular(entry) = FileTableParser::next_record(&mut cursor).unwrap() else {
            panic!("expected a regular record");
        };
        assert_eq!(entry.original_size, 999);
        assert_eq!(entry.packing_method(), Some(PackingMethod::Compressed));
        assert!(entry.is_compressed());
    }

    #[test]
    fn test_version_block_is_skipped() {
        let mut buf = Vec::new();
        record(&mut buf, "", [VERS_SIGNATURE, 0, 0, 0, 0]);
        buf.extend_from_slice(b"prefix\0addon\0\0");
        record(&mut buf, "a.txt", [0, 0, 0, 7, 2]);
        record(&mut buf, "b.txt", [0, 0, 0, 8, 3]);
        terminator(&mut buf);
        buf.extend_from_slice(b"hiyou");

        let mut cursor = ByteCursor::from_slice(&buf);
        let files = FileTableParser::parse(&mut cursor, &ParseOptions::default()).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[0].timestamp, 7);
        assert_eq!(&files[0].data[..], b"hi");
        assert_eq!(&files[1].data[..], b"you");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_version_block_record() {
        let mut buf = Vec::new();
        record(&mut buf, "", [VERS_SIGNATURE, 0, 0, 0, 0]);
        buf.extend_from_slice(b"product\0arma\0\0");
        let mut cursor = ByteCursor::from_slice(&buf);
        assert_eq!(
            FileTableParser::next_record(&mut cursor).unwrap(),
            TableRecord::VersionBlock(vec!["product".to_string(), "arma".to_string()])
        );
    }

    #[test]
    fn test_empty_name_with_packing_terminates() {
        let mut buf = Vec::new();
        record(&mut buf, "", [0x4370_7273, 1, 2, 3, 4]);
        let mut cursor = ByteCursor::from_slice(&buf);
        assert_eq!(
            FileTableParser::next_record(&mut cursor).unwrap(),
            TableRecord::Terminator
        );
    }

    #[test]
    fn test_missing_terminator() {
        let mut buf = Vec::new();
        record(&mut buf, "a.txt", [0, 0, 0, 0, 0]);
        let mut cursor = ByteCursor::from_slice(&buf);
        assert!(matches!(
            FileTableParser::parse(&mut cursor, &ParseOptions::default()),
            Err(PboError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_entry_limit() {
        let mut buf = Vec::new();
        for i in 0..4 {
            record(&mut buf, &format!("f{i}"), [0; 5]);
        }
        terminator(&mut buf);
        let options = ParseOptions {
            max_entries: Some(3),
            ..ParseOptions::default()
        };
        let mut cursor = ByteCursor::from_slice(&buf);
        assert!(matches!(
            FileTableParser::parse(&mut cursor, &options),
            Err(PboError::MalformedTable(_))
        ));
    }

    #[test]
    fn test_entry_limit_exactly_reached() {
        let mut buf = Vec::new();
        record(&mut buf, "", [VERS_SIGNATURE, 0, 0, 0, 0]);
        buf.extend_from_slice(b"prefix\0addon\0\0");
        record(&mut buf, "a.txt", [0, 0, 0, 0, 1]);
        record(&mut buf, "b.txt", [0, 0, 0, 0, 1]);
        terminator(&mut buf);
        buf.extend_from_slice(b"ab");

        let options = ParseOptions {
            max_entries: Some(2),
            ..ParseOptions::default()
        };
        let mut cursor = ByteCursor::from_slice(&buf);
        let files = FileTableParser::parse(&mut cursor, &options).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(&files[1].data[..], b"b");
    }

    #[test]
    fn test_large_table_without_limit() {
        let count = 70_000;
        let mut buf = Vec::new();
        for i in 0..count {
            record(&mut buf, &format!("f{i}"), [0; 5]);
        }
        terminator(&mut buf);

        let mut cursor = ByteCursor::from_slice(&buf);
        let files = FileTableParser::parse(&mut cursor, &ParseOptions::default()).unwrap();
        assert_eq!(files.len(), count);
    }

    #[test]
    fn test_truncated_payload() {
        let mut buf = Vec::new();
        record(&mut buf, "a.txt", [0, 0, 0, 0, 10]);
        terminator(&mut buf);
        buf.extend_from_slice(b"short");
        let mut cursor = ByteCursor::from_slice(&buf);
        assert!(matches!(
            FileTableParser::parse(&mut cursor, &ParseOptions::default()),
            Err(PboError::OutOfBounds { needed: 10, have: 5, .. })
        ));
    }

    #[test]
    fn test_filter_skips_payload() {
        let mut buf = Vec::new();
        record(&mut buf, "skip.bin", [0, 0, 0, 0, 3]);
        record(&mut buf, "keep.txt", [0, 0, 0, 0, 2]);
        terminator(&mut buf);
        buf.extend_from_slice(b"xyzok");

        let options = ParseOptions {
            filter: Some(Box::new(|name: &str, _index: usize| name.ends_with(".txt"))),
            ..ParseOptions::default()
        };
        let mut cursor = ByteCursor::from_slice(&buf);
        let files = FileTableParser::parse(&mut cursor, &options).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "keep.txt");
        assert_eq!(&files[0].data[..], b"ok");
    }

    #[test]
    fn test_write_table_layout() {
        let files = vec![FileEntry::new("a", &b"xy"[..]).with_timestamp(5)];
        let mut cursor = ByteCursor::new();
        write_file_table(&files, &mut cursor).unwrap();

        let mut expected = Vec::new();
        record(&mut expected, "a", [0, 2, 0, 5, 2]);
        terminator(&mut expected);
        expected.extend_from_slice(b"xy");
        assert_eq!(cursor.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_write_normalizes_uncompressed_original_size() {
        let mut entry = FileEntry::new("a", &b"abc"[..]);
        entry.original_size = 42;
        let mut cursor = ByteCursor::new();
        write_file_table(&[entry], &mut cursor).unwrap();

        let mut reader = ByteCursor::from_slice(cursor.as_bytes());
        let TableRecord::Regular(entry) = FileTableParser::next_record(&mut reader).unwrap() else {
            panic!("expected a regular record");
        };
        assert_eq!(entry.original_size, 3);
    }

    #[test]
    fn test_write_rejects_bad_entries() {
        let mut cursor = ByteCursor::new();
        let empty_name = FileEntry::new("", &b"x"[..]);
        assert!(write_file_table(&[empty_name], &mut cursor).is_err());

        let mut size_mismatch = FileEntry::new("a", &b"abc"[..]);
        size_mismatch.size = 2;
        assert!(write_file_table(&[size_mismatch], &mut cursor).is_err());

        let mut vers = FileEntry::new("v", &b""[..]);
        vers.packing = VERS_SIGNATURE;
        assert!(write_file_table(&[vers], &mut cursor).is_err());

        // validation happens before anything is written
        assert!(cursor.is_empty());
    }
}
