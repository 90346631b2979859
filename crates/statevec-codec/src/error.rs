//! Codec error type.

use statevec_buffers::BufferError;
use thiserror::Error;

/// Error type for every decode and encode operation.
///
/// Each variant carries enough context to locate the problem in the input
/// without re-running anything.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("rank {rank} not supported (expected 1..={max})")]
    UnsupportedRank { rank: i64, max: usize },
    #[error("stream truncated at byte {offset}: needed {needed} bytes, {available} available")]
    TruncatedStream {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("text input truncated: expected {expected} numeric tokens, found {found}")]
    TruncatedInput { expected: usize, found: usize },
    #[error("malformed text token {token:?} at byte {offset}")]
    MalformedText { offset: usize, token: String },
    #[error("invalid extent {extent} on axis {axis}")]
    InvalidExtent { axis: usize, extent: i64 },
    #[error("buffer holds {actual} elements but shape requires {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("element count of shape {extents:?} overflows")]
    Overflow { extents: Vec<usize> },
    #[error("cannot allocate buffer for {elements} elements")]
    Allocation { elements: usize },
    #[error("malformed header {line:?}: {reason}")]
    MalformedHeader { line: String, reason: &'static str },
    #[error("malformed value {token:?} in data row on line {line}")]
    MalformedRow { line: usize, token: String },
    #[error("block starting on line {line} has no closing ` ]`")]
    UnterminatedBlock { line: usize },
    #[error("block on line {line} comes before any data row, so it has no time")]
    MissingTimestamp { line: usize },
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<BufferError> for CodecError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => CodecError::TruncatedStream {
                offset,
                needed,
                available,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
