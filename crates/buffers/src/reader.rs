//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// A bounds-checked reader over a byte slice.
///
/// The reader keeps a cursor `x` and an exclusive `end`. Reads never panic:
/// a read that would cross `end` fails with [`BufferError::EndOfBuffer`] and
/// leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use statevec_buffers::Reader;
///
/// let data = 7i32.to_ne_bytes();
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.i32().unwrap(), 7);
/// assert_eq!(reader.size(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.x == self.end
    }

    /// Fails unless at least `needed` bytes remain.
    pub fn ensure(&self, needed: usize) -> Result<(), BufferError> {
        let available = self.size();
        if needed > available {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed,
                available,
            });
        }
        Ok(())
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.ensure(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(bytes)
    }

    /// Reads a signed 32-bit integer (native byte order).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.take::<4>().map(i32::from_ne_bytes)
    }

    /// Reads a 64-bit floating point number (native byte order).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.take::<8>().map(f64::from_ne_bytes)
    }
}
