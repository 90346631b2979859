//! Host-array seam.
//!
//! The codec only needs to read an array's extents and its elements in
//! row-major order, and to build a new owned array from decoded data.

use std::borrow::Cow;

use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use num_complex::Complex64;

use crate::error::{CodecError, Result};
use crate::{ComplexBuffer, Shape, Snapshot};

/// Anything that can be encoded as a complex snapshot array.
pub trait ComplexArray {
    /// Per-axis extents, axis 0 first.
    fn extents(&self) -> Vec<usize>;

    /// Elements in row-major order; borrowed when already laid out that way.
    fn to_contiguous(&self) -> Cow<'_, [Complex64]>;
}

impl<S, D> ComplexArray for ArrayBase<S, D>
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    fn extents(&self) -> Vec<usize> {
        self.shape().to_vec()
    }

    fn to_contiguous(&self) -> Cow<'_, [Complex64]> {
        match self.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.iter().copied().collect()),
        }
    }
}

impl ComplexArray for Snapshot {
    fn extents(&self) -> Vec<usize> {
        self.shape.extents().to_vec()
    }

    fn to_contiguous(&self) -> Cow<'_, [Complex64]> {
        Cow::Owned(self.buffer.to_complex_vec())
    }
}

/// Builds an owned array; never aliases `buffer`.
pub fn into_array(shape: &Shape, buffer: &ComplexBuffer) -> Result<ArrayD<Complex64>> {
    let expected = shape.element_count()?;
    ArrayD::from_shape_vec(shape.to_ix_dyn(), buffer.to_complex_vec()).map_err(|_| {
        CodecError::ShapeMismatch {
            expected,
            actual: buffer.len(),
        }
    })
}
