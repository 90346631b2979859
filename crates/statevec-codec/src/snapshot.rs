//! The decoded unit: array, shape, time and step hint.

use ndarray::ArrayD;
use num_complex::Complex64;

use crate::array::{into_array, ComplexArray};
use crate::error::{CodecError, Result};
use crate::{BinaryDecoder, BinaryEncoder, CodecOptions, ComplexBuffer, Shape};

/// One simulation snapshot.
///
/// Every decode produces a fresh snapshot that owns its buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub shape: Shape,
    pub buffer: ComplexBuffer,
    /// Simulation time.
    pub time: f64,
    /// Suggested next time step.
    pub step_hint: f64,
}

impl Snapshot {
    pub fn new(shape: Shape, buffer: ComplexBuffer, time: f64, step_hint: f64) -> Result<Self> {
        let expected = shape.element_count()?;
        if buffer.len() != expected {
            return Err(CodecError::ShapeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            shape,
            buffer,
            time,
            step_hint,
        })
    }

    /// Copies a host array into a new snapshot.
    pub fn from_array<A: ComplexArray + ?Sized>(array: &A, time: f64, step_hint: f64) -> Result<Self> {
        let shape = Shape::new(array.extents());
        let buffer = ComplexBuffer::from_complex(&array.to_contiguous());
        Self::new(shape, buffer, time, step_hint)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        BinaryDecoder::new().decode(data)
    }

    /// Encodes with this snapshot's own step hint.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&CodecOptions::default())
    }

    pub fn encode_with(&self, options: &CodecOptions) -> Result<Vec<u8>> {
        BinaryEncoder::with_options(*options).encode(
            &self.shape,
            &self.buffer,
            self.time,
            self.step_hint,
        )
    }

    /// Owned n-dimensional copy of the data.
    pub fn to_array(&self) -> Result<ArrayD<Complex64>> {
        into_array(&self.shape, &self.buffer)
    }

    pub fn into_parts(self) -> (Shape, ComplexBuffer, f64, f64) {
        (self.shape, self.buffer, self.time, self.step_hint)
    }
}
