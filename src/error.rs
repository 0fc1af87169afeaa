//! Error types for PBO decoding and encoding.
//!
//! This module provides the [`PboError`] type which covers every failure that
//! can occur while walking or producing an archive buffer.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Layout | [`OutOfBounds`], [`MalformedTable`] | Buffer is truncated or the file table never ends |
//! | Text | [`Encoding`] | A name or string field is not valid UTF-8 |
//! | Encoding | [`InvalidEntry`] | An in-memory archive cannot be represented on the wire |
//!
//! Any of these means "not a valid archive": no partially decoded result is
//! ever returned alongside an error.
//!
//! ## Example
//!
//! ```rust
//! use pbo_stream::PboError;
//!
//! match pbo_stream::parse(&[0x00, 0x73]) {
//!     Ok(archive) => println!("{} files", archive.files.len()),
//!     Err(PboError::OutOfBounds { offset, .. }) => eprintln!("truncated at {offset}"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```
//!
//! [`OutOfBounds`]: PboError::OutOfBounds
//! [`MalformedTable`]: PboError::MalformedTable
//! [`Encoding`]: PboError::Encoding
//! [`InvalidEntry`]: PboError::InvalidEntry

use std::string::FromUtf8Error;

use thiserror::Error;

/// Error type for PBO operations.
#[derive(Debug, Error)]
pub enum PboError {
    /// A read needed more bytes than the buffer holds.
    #[error("read past end of buffer at offset {offset}: need {needed} bytes, have {have}")]
    OutOfBounds {
        /// Cursor offset where the read started.
        offset: usize,
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the buffer.
        have: usize,
    },

    /// The file table never reached a terminating record, or exceeded the
    /// configured entry limit.
    #[error("malformed file table: {0}")]
    MalformedTable(String),

    /// Bytes could not be decoded as UTF-8 text.
    #[error("invalid UTF-8 text: {0}")]
    Encoding(#[from] FromUtf8Error),

    /// An archive value cannot be encoded without corrupting the layout,
    /// e.g. an empty file name that would read back as the table terminator.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

pub type Result<T> = std::result::Result<T, PboError>;
