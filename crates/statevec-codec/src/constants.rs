//! Wire-format constants.

/// Highest rank accepted by default.
///
/// The archive format itself has no ceiling; this matches the largest rank
/// the simulation engine has ever been built for. Override it through
/// [`CodecOptions::max_rank`](crate::CodecOptions::max_rank).
pub const MAX_RANK: usize = 11;

/// Step-size hint written by [`encode_binary`](crate::encode_binary), which
/// has no real hint to record.
pub const STEP_HINT_SENTINEL: f64 = 1.0;

/// Bytes taken by the rank field and by each extent.
pub const INT_SIZE: usize = 4;

/// Bytes taken by the time and step-hint fields.
pub const SCALAR_SIZE: usize = 8;

/// Bytes per complex element: real then imaginary double.
pub const ELEMENT_SIZE: usize = 2 * SCALAR_SIZE;

/// Extension selecting the binary state-vector format.
pub const BINARY_EXTENSION: &str = "svbin";
