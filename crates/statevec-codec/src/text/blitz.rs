//! Blitz ASCII array layout.
//!
//! ```text
//! (0,1) x (0,2)
//! [ (1,2) (3,4) (5,6)
//!   (7,8) (9,10) (11,12) ]
//! ```
//!
//! The first line lists each axis as an inclusive `(lo,hi)` index range; the
//! rest is the row-major tuple stream.

use std::fmt;
use std::fmt::Write as _;

use num_complex::Complex64;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::rank::Rank;
use crate::text::decode_tuples;
use crate::{CodecOptions, ComplexBuffer, Shape};

/// An array in Blitz ASCII form, with its per-axis index ranges.
///
/// Bounds are checked on construction, so rendering never has to do
/// arithmetic on them.
#[derive(Debug, Clone, PartialEq)]
pub struct BlitzArray {
    lower_bounds: Vec<i64>,
    upper_bounds: Vec<i64>,
    shape: Shape,
    buffer: ComplexBuffer,
}

impl BlitzArray {
    /// Zero-based array over `shape`.
    pub fn new(shape: Shape, buffer: ComplexBuffer) -> Result<Self> {
        let lower_bounds = vec![0; shape.rank()];
        Self::with_lower_bounds(shape, buffer, lower_bounds)
    }

    /// Array over `shape` whose axis `i` starts at `lower_bounds[i]`.
    pub fn with_lower_bounds(
        shape: Shape,
        buffer: ComplexBuffer,
        lower_bounds: Vec<i64>,
    ) -> Result<Self> {
        if lower_bounds.len() != shape.rank() {
            return Err(CodecError::ShapeMismatch {
                expected: shape.rank(),
                actual: lower_bounds.len(),
            });
        }
        let expected = shape.element_count()?;
        if buffer.len() != expected {
            return Err(CodecError::ShapeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        let mut upper_bounds = Vec::with_capacity(shape.rank());
        for (axis, (&lo, &extent)) in lower_bounds.iter().zip(shape.extents()).enumerate() {
            let invalid = || CodecError::InvalidExtent {
                axis,
                extent: i64::try_from(extent).unwrap_or(i64::MAX),
            };
            let last = i64::try_from(extent).map_err(|_| invalid())? - 1;
            upper_bounds.push(lo.checked_add(last).ok_or_else(invalid)?);
        }
        Ok(Self {
            lower_bounds,
            upper_bounds,
            shape,
            buffer,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &CodecOptions::default())
    }

    pub fn parse_with(text: &str, options: &CodecOptions) -> Result<Self> {
        options.validate()?;
        let body = text.trim_start();
        let skipped = text.len() - body.len();
        let (header, _) = body
            .split_once('\n')
            .ok_or_else(|| CodecError::MalformedHeader {
                line: body.to_owned(),
                reason: "missing data section",
            })?;
        let ranges = parse_header(header, options)?;
        let elements = ranges.shape.element_count()?;
        let data_start = skipped + header.len() + 1;
        let buffer = decode_tuples(text.as_bytes(), data_start, elements)?;
        debug!(rank = ranges.shape.rank(), shape = %ranges.shape, elements, "parsed blitz array");
        Ok(Self {
            lower_bounds: ranges.lower_bounds,
            upper_bounds: ranges.upper_bounds,
            shape: ranges.shape,
            buffer,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn buffer(&self) -> &ComplexBuffer {
        &self.buffer
    }

    pub fn into_parts(self) -> (Shape, ComplexBuffer) {
        (self.shape, self.buffer)
    }

    /// Inclusive lower index of every axis.
    pub fn lower_bounds(&self) -> &[i64] {
        &self.lower_bounds
    }

    /// Inclusive upper index of every axis.
    pub fn upper_bounds(&self) -> &[i64] {
        &self.upper_bounds
    }

    pub fn header(&self) -> String {
        let ranges: Vec<String> = self
            .lower_bounds
            .iter()
            .zip(&self.upper_bounds)
            .map(|(lo, hi)| format!("({lo},{hi})"))
            .collect();
        ranges.join(" x ")
    }

    /// Renders the array; rank-1 data sits on one line, higher ranks get one
    /// line per row of the last axis.
    pub fn to_ascii(&self) -> String {
        let mut out = self.header();
        out.push_str(" \n[ ");
        let values = self.buffer.to_complex_vec();
        let row_len = match self.shape.extents().last() {
            Some(&last) if self.shape.rank() > 1 && last > 0 => last,
            _ => values.len().max(1),
        };
        for (i, row) in values.chunks(row_len).enumerate() {
            if i > 0 {
                out.push_str(" \n  ");
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    out.push(' ');
                }
                push_tuple(&mut out, *value);
            }
        }
        out.push_str(" ]\n");
        out
    }
}

impl fmt::Display for BlitzArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

fn push_tuple(out: &mut String, value: Complex64) {
    // Writing into a String cannot fail.
    let _ = write!(out, "({:?},{:?})", value.re, value.im);
}

/// Index ranges read from a Blitz header line.
#[derive(Debug)]
pub(crate) struct HeaderRanges {
    pub lower_bounds: Vec<i64>,
    pub upper_bounds: Vec<i64>,
    pub shape: Shape,
}

/// Parses `(lo,hi) x (lo,hi) ...`.
pub(crate) fn parse_header(line: &str, options: &CodecOptions) -> Result<HeaderRanges> {
    let malformed = |reason| CodecError::MalformedHeader {
        line: line.to_owned(),
        reason,
    };
    let mut lower_bounds = Vec::new();
    let mut upper_bounds = Vec::new();
    let mut extents = Vec::new();
    for range in line.trim().split('x') {
        let inner = range
            .trim()
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| malformed("axis range must look like (lo,hi)"))?;
        let (lo, hi) = inner
            .split_once(',')
            .ok_or_else(|| malformed("axis range must look like (lo,hi)"))?;
        let lo: i64 = lo
            .trim()
            .parse()
            .map_err(|_| malformed("lower bound is not an integer"))?;
        let hi: i64 = hi
            .trim()
            .parse()
            .map_err(|_| malformed("upper bound is not an integer"))?;
        let extent = hi
            .checked_sub(lo)
            .and_then(|d| d.checked_add(1))
            .and_then(|e| usize::try_from(e).ok())
            .ok_or_else(|| malformed("upper bound below lower bound"))?;
        lower_bounds.push(lo);
        upper_bounds.push(hi);
        extents.push(extent);
    }
    Rank::of_extents(&extents, options.max_rank)?;
    Ok(HeaderRanges {
        lower_bounds,
        upper_bounds,
        shape: Shape::new(extents),
    })
}
