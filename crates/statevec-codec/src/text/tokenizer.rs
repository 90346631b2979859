//! Tuple-stream tokenizer.
//!
//! Input is a run of `(<re>,<im>)` tuples. Whitespace and the `[` that opens
//! a Blitz data block may sit between tuples, and a `]` ends the block;
//! anything else there is an error. Text after the last requested tuple is
//! ignored.

use num_complex::Complex64;
use tracing::trace;

use crate::error::{CodecError, Result};
use crate::ComplexBuffer;

const OPEN: u8 = b'(';
const SEPARATOR: u8 = b',';
const CLOSE: u8 = b')';

/// Pulls complex tuples out of a byte string.
#[derive(Debug, Clone)]
pub struct TextTokenizer<'a> {
    data: &'a [u8],
    x: usize,
    tokens: usize,
    expected: usize,
}

impl<'a> TextTokenizer<'a> {
    /// Tokenizer expecting `length` tuples, starting at byte 0.
    pub fn new(data: &'a [u8], length: usize) -> Self {
        Self::at(data, 0, length)
    }

    /// Tokenizer starting at byte `x`; error offsets stay relative to `data`.
    pub fn at(data: &'a [u8], x: usize, length: usize) -> Self {
        Self {
            data,
            x: x.min(data.len()),
            tokens: 0,
            expected: length.saturating_mul(2),
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Reads the next `(re,im)` tuple.
    pub fn read_pair(&mut self) -> Result<Complex64> {
        self.skip_to_open()?;
        let re = self.read_number(SEPARATOR)?;
        let im = self.read_number(CLOSE)?;
        Ok(Complex64::new(re, im))
    }

    fn truncated(&self) -> CodecError {
        CodecError::TruncatedInput {
            expected: self.expected,
            found: self.tokens,
        }
    }

    fn malformed(&self, start: usize, end: usize) -> CodecError {
        CodecError::MalformedText {
            offset: start,
            token: String::from_utf8_lossy(&self.data[start..end]).into_owned(),
        }
    }

    fn skip_to_open(&mut self) -> Result<()> {
        loop {
            match self.data.get(self.x) {
                None | Some(&b']') => return Err(self.truncated()),
                Some(&OPEN) => {
                    self.x += 1;
                    return Ok(());
                }
                Some(b) if b.is_ascii_whitespace() || *b == b'[' => self.x += 1,
                Some(_) => return Err(self.malformed(self.x, self.x + 1)),
            }
        }
    }

    fn read_number(&mut self, delimiter: u8) -> Result<f64> {
        let start = self.x;
        loop {
            match self.data.get(self.x) {
                None => return Err(self.truncated()),
                Some(&b) if b == delimiter => break,
                // A delimiter out of turn.
                Some(&(OPEN | SEPARATOR | CLOSE)) => {
                    return Err(self.malformed(start, self.x + 1));
                }
                Some(_) => self.x += 1,
            }
        }
        let end = self.x;
        let value = std::str::from_utf8(&self.data[start..end])
            .ok()
            .and_then(|token| token.trim().parse::<f64>().ok())
            .ok_or_else(|| self.malformed(start, end))?;
        self.x += 1;
        self.tokens += 1;
        Ok(value)
    }
}

/// Decodes `length` tuples from `data`, starting at byte `start`.
pub fn decode_tuples(data: &[u8], start: usize, length: usize) -> Result<ComplexBuffer> {
    let mut tokenizer = TextTokenizer::at(data, start, length);
    // Every tuple takes at least five bytes, so this never over-reserves.
    let mut buffer = ComplexBuffer::with_capacity(length.min(data.len() / 5))?;
    for _ in 0..length {
        buffer.push(tokenizer.read_pair()?);
    }
    trace!(length, consumed = tokenizer.position().saturating_sub(start), "decoded text tuples");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_adjacent_tuples() {
        let buffer = decode_tuples(b"(1.5,-2.0)(0.0,3.25)", 0, 2).unwrap();
        assert_eq!(buffer.as_slice(), &[1.5, -2.0, 0.0, 3.25]);
    }

    #[test]
    fn skips_blitz_block_prefix_and_whitespace() {
        let buffer = decode_tuples(b"[ (1,2) (3,4) \n  (5,6) ]", 0, 3).unwrap();
        assert_eq!(buffer.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn malformed_token_reports_offset() {
        match decode_tuples(b"(1.5,x)", 0, 1) {
            Err(CodecError::MalformedText { offset, token }) => {
                assert_eq!(offset, 5);
                assert_eq!(token, "x");
            }
            other => panic!("expected MalformedText, got {other:?}"),
        }
    }

    #[test]
    fn wrong_delimiter_is_malformed() {
        assert!(matches!(
            decode_tuples(b"(1.5)(2,3)", 0, 2),
            Err(CodecError::MalformedText { offset: 1, .. })
        ));
        assert!(matches!(
            decode_tuples(b"(1,2);(3,4)", 0, 2),
            Err(CodecError::MalformedText { offset: 5, .. })
        ));
    }

    #[test]
    fn too_few_tuples_is_truncated() {
        match decode_tuples(b"(1,2)(3,", 0, 3) {
            Err(CodecError::TruncatedInput { expected, found }) => {
                assert_eq!(expected, 6);
                assert_eq!(found, 3);
            }
            other => panic!("expected TruncatedInput, got {other:?}"),
        }
    }

    #[test]
    fn zero_length_reads_nothing() {
        assert!(decode_tuples(b"", 0, 0).unwrap().is_empty());
    }
}
