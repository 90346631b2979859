//! Codecs for complex state-vector snapshots of any rank.
//!
//! A snapshot is a dense array of complex doubles together with the
//! simulation time it was taken at and a suggested next time step. Two
//! formats are supported:
//!
//! - the binary archive ([`binary`]): rank, extents, row-major payload, time
//!   and step hint, all in native byte order;
//! - the text tuple stream `(re,im)(re,im)...` ([`text`]), decode only, and
//!   the Blitz ASCII array layout built on it.
//!
//! On top of these sit state-vector files ([`statevector`]) and trajectory
//! output files with embedded state vectors ([`trajectory`]).
//!
//! Rank is read from the data. Every rank from 1 up to
//! [`CodecOptions::max_rank`] goes through the same code path.
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use statevec_codec::{decode_binary, encode_binary, ComplexBuffer, Shape};
//!
//! let shape = Shape::new(vec![2, 1]);
//! let buffer = ComplexBuffer::from_complex(&[Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)]);
//!
//! let mut archive = Vec::new();
//! encode_binary(&mut archive, &shape, &buffer, 0.5).unwrap();
//!
//! let snapshot = decode_binary(&archive).unwrap();
//! assert_eq!(snapshot.shape, shape);
//! assert_eq!(snapshot.buffer, buffer);
//! assert_eq!(snapshot.time, 0.5);
//! ```

mod array;
mod buffer;
mod constants;
mod error;
mod options;
mod rank;
mod shape;
mod snapshot;

pub mod binary;
pub mod statevector;
pub mod text;
pub mod trajectory;

use std::io::Write;

pub use array::{into_array, ComplexArray};
pub use binary::{BinaryDecoder, BinaryEncoder};
pub use buffer::ComplexBuffer;
pub use constants::{MAX_RANK, STEP_HINT_SENTINEL};
pub use error::{CodecError, Result};
pub use options::CodecOptions;
pub use rank::{dispatch, Rank};
pub use shape::Shape;
pub use snapshot::Snapshot;
pub use statevector::{load_statevector, save_statevector, write_statevector_binary};
pub use text::{BlitzArray, TextTokenizer};
pub use trajectory::{load_trajectory, split_trajectory, Trajectory};

pub use num_complex;

/// Decodes `length` complex values from a `(re,im)(re,im)...` string.
pub fn decode_text(data: &[u8], length: usize) -> Result<ComplexBuffer> {
    text::decode_tuples(data, 0, length)
}

/// Decodes a binary snapshot.
pub fn decode_binary(data: &[u8]) -> Result<Snapshot> {
    decode_binary_with(data, &CodecOptions::default())
}

/// Decodes a binary snapshot under `options`.
pub fn decode_binary_with(data: &[u8], options: &CodecOptions) -> Result<Snapshot> {
    BinaryDecoder::with_options(*options).decode(data)
}

/// Encodes a binary snapshot into `sink`, writing the sentinel step hint.
///
/// Nothing reaches `sink` unless the whole snapshot encodes.
pub fn encode_binary<W: Write + ?Sized>(
    sink: &mut W,
    shape: &Shape,
    buffer: &ComplexBuffer,
    time: f64,
) -> Result<()> {
    encode_binary_with(sink, shape, buffer, time, &CodecOptions::default())
}

/// [`encode_binary`] under `options`, including their step-hint sentinel.
pub fn encode_binary_with<W: Write + ?Sized>(
    sink: &mut W,
    shape: &Shape,
    buffer: &ComplexBuffer,
    time: f64,
    options: &CodecOptions,
) -> Result<()> {
    let bytes = BinaryEncoder::with_options(*options).encode_with_sentinel(shape, buffer, time)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

/// Encodes a binary snapshot with an explicit step hint.
pub fn encode_binary_to_vec(
    shape: &Shape,
    buffer: &ComplexBuffer,
    time: f64,
    step_hint: f64,
) -> Result<Vec<u8>> {
    BinaryEncoder::new().encode(shape, buffer, time, step_hint)
}

/// Encodes a host array into `sink`, writing the sentinel step hint.
pub fn encode_array<W, A>(sink: &mut W, array: &A, time: f64) -> Result<()>
where
    W: Write + ?Sized,
    A: ComplexArray + ?Sized,
{
    let options = CodecOptions::default();
    let bytes = BinaryEncoder::with_options(options).encode_array(
        array,
        time,
        options.step_hint_sentinel,
    )?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}
