//! Binary state-vector archive.
//!
//! ```text
//! +-----------+---------------------+------------------------+----------+---------------+
//! | rank (i32)| extent (i32) x rank | (re f64, im f64) x N   | time f64 | step hint f64 |
//! +-----------+---------------------+------------------------+----------+---------------+
//! ```
//!
//! `N` is the product of the extents and elements are stored row-major.
//! All fields use the writer's native byte order.

mod decoder;
mod encoder;

pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;
