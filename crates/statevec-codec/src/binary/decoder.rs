//! Binary state-vector decoder.

use num_complex::Complex64;
use statevec_buffers::Reader;
use tracing::{debug, trace};

use crate::constants::{ELEMENT_SIZE, INT_SIZE};
use crate::error::{CodecError, Result};
use crate::rank::dispatch;
use crate::{CodecOptions, ComplexBuffer, Shape, Snapshot};

/// Binary state-vector decoder.
///
/// The typed `read_*` methods decode one section of the layout each and can
/// be driven individually; [`BinaryDecoder::decode`] runs them in order.
#[derive(Debug, Clone, Default)]
pub struct BinaryDecoder {
    options: CodecOptions,
}

impl BinaryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decodes a complete snapshot.
    pub fn decode(&self, data: &[u8]) -> Result<Snapshot> {
        self.decode_with_consumed(data).map(|(snapshot, _)| snapshot)
    }

    /// Decodes a complete snapshot and reports how many bytes it took.
    ///
    /// Bytes after the step hint are left alone.
    pub fn decode_with_consumed(&self, data: &[u8]) -> Result<(Snapshot, usize)> {
        self.options.validate()?;
        let mut reader = Reader::new(data);
        let shape = self.read_shape(&mut reader)?;
        let elements = shape.element_count()?;
        let buffer = self.read_payload(&mut reader, elements)?;
        let (time, step_hint) = self.read_trailer(&mut reader)?;
        debug!(
            rank = shape.rank(),
            %shape,
            elements,
            consumed = reader.x,
            trailing = reader.size(),
            "decoded binary snapshot"
        );
        let snapshot = Snapshot {
            shape,
            buffer,
            time,
            step_hint,
        };
        Ok((snapshot, reader.x))
    }

    /// Reads the rank and the per-axis extents.
    ///
    /// All extents must be present before the extent list is allocated.
    pub fn read_shape(&self, reader: &mut Reader<'_>) -> Result<Shape> {
        let rank = reader.i32()?;
        trace!(rank, "read rank");
        dispatch(i64::from(rank), self.options.max_rank, |rank| {
            let needed = rank
                .get()
                .checked_mul(INT_SIZE)
                .ok_or(CodecError::TruncatedStream {
                    offset: reader.x,
                    needed: usize::MAX,
                    available: reader.size(),
                })?;
            reader.ensure(needed)?;
            let mut extents = Vec::with_capacity(rank.get());
            for axis in 0..rank.get() {
                let extent = reader.i32()?;
                let extent = usize::try_from(extent).map_err(|_| CodecError::InvalidExtent {
                    axis,
                    extent: i64::from(extent),
                })?;
                extents.push(extent);
            }
            Ok(Shape::new(extents))
        })
    }

    /// Reads `elements` complex values into a freshly allocated buffer.
    ///
    /// The whole payload must be present before anything is allocated, so a
    /// corrupt extent cannot trigger a huge allocation on a short stream.
    pub fn read_payload(&self, reader: &mut Reader<'_>, elements: usize) -> Result<ComplexBuffer> {
        let needed = elements
            .checked_mul(ELEMENT_SIZE)
            .ok_or(CodecError::TruncatedStream {
                offset: reader.x,
                needed: usize::MAX,
                available: reader.size(),
            })?;
        reader.ensure(needed)?;
        let mut buffer = ComplexBuffer::with_capacity(elements)?;
        for _ in 0..elements {
            let re = reader.f64()?;
            let im = reader.f64()?;
            buffer.push(Complex64::new(re, im));
        }
        trace!(elements, bytes = needed, "read payload");
        Ok(buffer)
    }

    /// Reads the time and step-hint scalars.
    pub fn read_trailer(&self, reader: &mut Reader<'_>) -> Result<(f64, f64)> {
        let time = reader.f64()?;
        let step_hint = reader.f64()?;
        Ok((time, step_hint))
    }
}
