//! Product extension strings.
//!
//! After the header entry comes a flat list of NUL-terminated strings
//! (conventionally alternating keys and values, e.g. `prefix`, `my_addon`),
//! closed by one empty string.

use crate::cursor::ByteCursor;
use crate::error::{PboError, Result};

/// Parser for the extension string list that follows the header entry.
pub struct ExtensionsParser;

impl ExtensionsParser {
    /// Read one item. `None` is the end-of-list marker.
    pub fn next_item(cursor: &mut ByteCursor) -> Result<Option<String>> {
        let value = cursor.read_string()?;
        Ok((!value.is_empty()).then_some(value))
    }

    /// Read every item up to, but not including, the end marker.
    pub fn parse(cursor: &mut ByteCursor) -> Result<Vec<String>> {
        let mut extensions = Vec::new();
        while let Some(value) = Self::next_item(cursor)? {
            log::trace!("extension {value:?}");
            extensions.push(value);
        }
        Ok(extensions)
    }
}

/// Write `extensions` followed by the end-of-list marker.
///
/// An empty string inside the list would read back as the end marker, so it
/// is rejected instead of silently truncating the list.
pub fn write_extensions(extensions: &[String], cursor: &mut ByteCursor) -> Result<()> {
    for (index, value) in extensions.iter().enumerate() {
        if value.is_empty() {
            return Err(PboError::InvalidEntry(format!(
                "extension {index} is empty"
            )));
        }
        if value.contains('\0') {
            return Err(PboError::InvalidEntry(format!(
                "extension {index} ({value:?}) contains NUL"
            )));
        }
        cursor.write_string(value, true);
    }
    cursor.write_string("", true);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_first_empty_string() {
        let mut cursor = ByteCursor::from_slice(b"prefix\0x\\addon\0\0after\0");
        let extensions = ExtensionsParser::parse(&mut cursor).unwrap();
        assert_eq!(extensions, vec!["prefix", "x\\addon"]);
        // the sentinel is consumed, nothing past it
        assert_eq!(cursor.read_string().unwrap(), "after");
    }

    #[test]
    fn test_empty_list() {
        let mut cursor = ByteCursor::from_slice(&[0x00, 0x41]);
        assert!(ExtensionsParser::parse(&mut cursor).unwrap().is_empty());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_unterminated_list_ends_at_buffer_end() {
        let mut cursor = ByteCursor::from_slice(b"key\0value");
        let extensions = ExtensionsParser::parse(&mut cursor).unwrap();
        assert_eq!(extensions, vec!["key", "value"]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_write_appends_end_marker() {
        let mut cursor = ByteCursor::new();
        write_extensions(&["prefix".to_string(), "a".to_string()], &mut cursor).unwrap();
        assert_eq!(cursor.as_bytes(), b"prefix\0a\0\0");
    }

    #[test]
    fn test_write_rejects_empty_item() {
        let items = vec!["prefix".to_string(), String::new(), "b".to_string()];
        assert!(matches!(
            write_extensions(&items, &mut ByteCursor::new()),
            Err(PboError::InvalidEntry(_))
        ));
    }
}
