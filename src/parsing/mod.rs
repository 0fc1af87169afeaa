//! PBO record parsing and encoding modules.

pub mod extensions;
pub mod file_table;
pub mod header_entry;

pub use extensions::{write_extensions, ExtensionsParser};
pub use file_table::{write_file_table, FileEntry, FileTableParser, TableRecord};
pub use header_entry::{HeaderEntry, HeaderEntryParser};
