//! Binary state-vector encoder.

use num_complex::Complex64;
use statevec_buffers::Writer;
use tracing::debug;

use crate::constants::{ELEMENT_SIZE, INT_SIZE, SCALAR_SIZE};
use crate::error::{CodecError, Result};
use crate::rank::Rank;
use crate::{CodecOptions, ComplexArray, ComplexBuffer, Shape};

/// Binary state-vector encoder.
///
/// Output is built in the internal [`Writer`] and only handed out once the
/// whole snapshot has been encoded.
#[derive(Debug, Default)]
pub struct BinaryEncoder {
    pub writer: Writer,
    options: CodecOptions,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            writer: Writer::new(),
            options,
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encodes a snapshot with an explicit step hint.
    pub fn encode(
        &mut self,
        shape: &Shape,
        buffer: &ComplexBuffer,
        time: f64,
        step_hint: f64,
    ) -> Result<Vec<u8>> {
        self.encode_values(shape, buffer.iter(), time, step_hint)
    }

    /// Encodes a snapshot using the configured step-hint sentinel.
    pub fn encode_with_sentinel(
        &mut self,
        shape: &Shape,
        buffer: &ComplexBuffer,
        time: f64,
    ) -> Result<Vec<u8>> {
        let step_hint = self.options.step_hint_sentinel;
        self.encode(shape, buffer, time, step_hint)
    }

    /// Encodes a host array.
    pub fn encode_array<A>(&mut self, array: &A, time: f64, step_hint: f64) -> Result<Vec<u8>>
    where
        A: ComplexArray + ?Sized,
    {
        let shape = Shape::new(array.extents());
        let values = array.to_contiguous();
        self.encode_values(&shape, values.iter().copied(), time, step_hint)
    }

    /// Encodes row-major `values` for `shape`.
    pub fn encode_values<I>(
        &mut self,
        shape: &Shape,
        values: I,
        time: f64,
        step_hint: f64,
    ) -> Result<Vec<u8>>
    where
        I: ExactSizeIterator<Item = Complex64>,
    {
        self.options.validate()?;
        self.writer.reset();
        let header = self.shape_header(shape)?;
        let elements = shape.element_count()?;
        if values.len() != elements {
            return Err(CodecError::ShapeMismatch {
                expected: elements,
                actual: values.len(),
            });
        }
        let size = ELEMENT_SIZE
            .checked_mul(elements)
            .and_then(|payload| payload.checked_add(INT_SIZE * (1 + shape.rank()) + 2 * SCALAR_SIZE))
            .ok_or(CodecError::Allocation { elements })?;
        self.writer
            .ensure_capacity(size)
            .map_err(|_| CodecError::Allocation { elements })?;
        self.put_shape(&header);
        self.write_payload(values);
        self.write_trailer(time, step_hint);
        debug!(
            rank = shape.rank(),
            %shape,
            elements,
            bytes = self.writer.len(),
            "encoded binary snapshot"
        );
        Ok(self.writer.flush())
    }

    /// Writes the rank and the per-axis extents.
    ///
    /// Everything is validated before the first byte is written.
    pub fn write_shape(&mut self, shape: &Shape) -> Result<()> {
        let header = self.shape_header(shape)?;
        self.put_shape(&header);
        Ok(())
    }

    /// Validated `[rank, extent, ...]` integers for `shape`.
    fn shape_header(&self, shape: &Shape) -> Result<Vec<i32>> {
        let rank = Rank::of_extents(shape.extents(), self.options.max_rank)?;
        let mut header = Vec::with_capacity(1 + rank.get());
        header.push(
            i32::try_from(rank.get()).map_err(|_| CodecError::UnsupportedRank {
                rank: i64::try_from(rank.get()).unwrap_or(i64::MAX),
                max: self.options.max_rank,
            })?,
        );
        for (axis, &extent) in shape.extents().iter().enumerate() {
            header.push(i32::try_from(extent).map_err(|_| CodecError::InvalidExtent {
                axis,
                extent: i64::try_from(extent).unwrap_or(i64::MAX),
            })?);
        }
        Ok(header)
    }

    fn put_shape(&mut self, header: &[i32]) {
        for &value in header {
            self.writer.i32(value);
        }
    }

    /// Writes complex values as `(re, im)` double pairs in iteration order.
    pub fn write_payload<I>(&mut self, values: I)
    where
        I: Iterator<Item = Complex64>,
    {
        for value in values {
            self.writer.f64(value.re);
            self.writer.f64(value.im);
        }
    }

    /// Writes the time and step-hint scalars.
    pub fn write_trailer(&mut self, time: f64, step_hint: f64) {
        self.writer.f64(time);
        self.writer.f64(step_hint);
    }
}
