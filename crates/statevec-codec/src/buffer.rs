//! Owned contiguous complex-double storage.

use num_complex::Complex64;

use crate::error::{CodecError, Result};

/// `len()` complex numbers stored as adjacent `(re, im)` doubles.
///
/// The buffer always owns its memory; decoders copy out of their input
/// rather than borrowing from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexBuffer {
    values: Vec<f64>,
}

impl ComplexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `elements` complex values.
    ///
    /// Fails with [`CodecError::Allocation`] instead of aborting when the
    /// allocator refuses.
    pub fn with_capacity(elements: usize) -> Result<Self> {
        let doubles = elements
            .checked_mul(2)
            .ok_or(CodecError::Allocation { elements })?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(doubles)
            .map_err(|_| CodecError::Allocation { elements })?;
        Ok(Self { values })
    }

    pub fn from_complex(values: &[Complex64]) -> Self {
        let mut out = Vec::with_capacity(values.len() * 2);
        for c in values {
            out.push(c.re);
            out.push(c.im);
        }
        Self { values: out }
    }

    /// Number of complex elements.
    pub fn len(&self) -> usize {
        self.values.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn push(&mut self, value: Complex64) {
        self.values.push(value.re);
        self.values.push(value.im);
    }

    pub fn get(&self, index: usize) -> Option<Complex64> {
        let re = *self.values.get(2 * index)?;
        let im = *self.values.get(2 * index + 1)?;
        Some(Complex64::new(re, im))
    }

    /// Interleaved doubles, `2 * len()` of them.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Complex64> + '_ {
        self.values
            .chunks_exact(2)
            .map(|pair| Complex64::new(pair[0], pair[1]))
    }

    pub fn to_complex_vec(&self) -> Vec<Complex64> {
        self.iter().collect()
    }
}

impl FromIterator<Complex64> for ComplexBuffer {
    fn from_iter<I: IntoIterator<Item = Complex64>>(iter: I) -> Self {
        let mut buffer = ComplexBuffer::new();
        for value in iter {
            buffer.push(value);
        }
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_real_and_imaginary() {
        let buffer =
            ComplexBuffer::from_complex(&[Complex64::new(1.5, -2.0), Complex64::new(0.0, 3.25)]);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.as_slice(), &[1.5, -2.0, 0.0, 3.25]);
        assert_eq!(buffer.get(1), Some(Complex64::new(0.0, 3.25)));
        assert_eq!(buffer.get(2), None);
    }

    #[test]
    fn huge_capacity_reports_allocation_error() {
        assert!(matches!(
            ComplexBuffer::with_capacity(usize::MAX),
            Err(CodecError::Allocation { .. })
        ));
    }
}
