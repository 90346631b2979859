//! Binary buffer utilities for state-vector archives.
//!
//! The archive format stores every multi-byte value in the byte order of the
//! machine that wrote it, so both [`Reader`] and [`Writer`] work in native
//! byte order. Unlike a plain slice cursor, every read is bounds-checked and
//! reports how far it got when the input runs out.
//!
//! # Example
//!
//! ```
//! use statevec_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.i32(3);
//! writer.f64(0.25);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.i32().unwrap(), 3);
//! assert_eq!(reader.f64().unwrap(), 0.25);
//! assert!(reader.i32().is_err());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Cursor position at which the read started.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => write!(
                f,
                "end of buffer at byte {offset}: needed {needed} bytes, {available} available"
            ),
        }
    }
}

impl std::error::Error for BufferError {}
