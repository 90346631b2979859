//! Auto-growing binary buffer writer.

use std::collections::TryReserveError;

/// Writes native-endian binary data into a growing byte vector.
///
/// [`Writer::flush`] hands out everything written since the previous flush
/// and starts a fresh window.
#[derive(Debug, Default, Clone)]
pub struct Writer {
    /// Bytes written since the last flush.
    pub uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards any unflushed bytes.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Reserves room for `additional` more bytes without aborting on failure.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.uint8.try_reserve(additional)
    }

    /// Returns the written bytes and starts a new window.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_ne_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.uint8.extend_from_slice(&val.to_ne_bytes());
    }
}
