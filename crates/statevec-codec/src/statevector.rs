//! State-vector files.
//!
//! `.svbin` files hold the binary archive. Any other name is read as text:
//! a Blitz ASCII array plus a `# <time> <step hint>` comment line, which
//! current files put after the array and older files put first.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::array::ComplexArray;
use crate::constants::BINARY_EXTENSION;
use crate::error::{CodecError, Result};
use crate::{BinaryDecoder, BinaryEncoder, BlitzArray, CodecOptions, Snapshot};

/// `true` when `path` names a binary state-vector file.
pub fn is_binary_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BINARY_EXTENSION))
}

pub fn load_statevector<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    load_statevector_with(path, &CodecOptions::default())
}

pub fn load_statevector_with<P: AsRef<Path>>(path: P, options: &CodecOptions) -> Result<Snapshot> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading state vector");
    if is_binary_path(path) {
        let data = fs::read(path)?;
        BinaryDecoder::with_options(*options).decode(&data)
    } else {
        let text = fs::read_to_string(path)?;
        parse_statevector_text(&text, options)
    }
}

/// Writes `snapshot`, picking the format from the extension.
///
/// The file is created only after encoding has succeeded.
pub fn save_statevector<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<()> {
    save_statevector_with(path, snapshot, &CodecOptions::default())
}

pub fn save_statevector_with<P: AsRef<Path>>(
    path: P,
    snapshot: &Snapshot,
    options: &CodecOptions,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = if is_binary_path(path) {
        snapshot.encode_with(options)?
    } else {
        statevector_to_text(snapshot)?.into_bytes()
    };
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "saved state vector");
    Ok(())
}

/// Writes a host array as a binary state vector with the sentinel step hint.
pub fn write_statevector_binary<P, A>(path: P, array: &A, time: f64) -> Result<()>
where
    P: AsRef<Path>,
    A: ComplexArray + ?Sized,
{
    write_statevector_binary_with(path, array, time, &CodecOptions::default())
}

pub fn write_statevector_binary_with<P, A>(
    path: P,
    array: &A,
    time: f64,
    options: &CodecOptions,
) -> Result<()>
where
    P: AsRef<Path>,
    A: ComplexArray + ?Sized,
{
    let bytes = BinaryEncoder::with_options(*options).encode_array(
        array,
        time,
        options.step_hint_sentinel,
    )?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Parses the text state-vector layout.
pub fn parse_statevector_text(text: &str, options: &CodecOptions) -> Result<Snapshot> {
    let trimmed = text.trim_end_matches([' ', '\n', '\t', '\r']);
    let (comment, data) = if trimmed.starts_with("# ") {
        trimmed.split_once('\n').unwrap_or((trimmed, ""))
    } else {
        let (data, comment) = trimmed.rsplit_once('\n').unwrap_or(("", trimmed));
        if !comment.starts_with("# ") {
            return Err(CodecError::MalformedHeader {
                line: comment.to_owned(),
                reason: "missing `# <time>` comment",
            });
        }
        let data = data.split('#').next().unwrap_or(data);
        (comment, data)
    };
    let (time, step_hint) = parse_comment(comment, options)?;
    let (shape, buffer) = BlitzArray::parse_with(data, options)?.into_parts();
    Snapshot::new(shape, buffer, time, step_hint)
}

/// Renders the text state-vector layout, comment last.
pub fn statevector_to_text(snapshot: &Snapshot) -> Result<String> {
    let array = BlitzArray::new(snapshot.shape.clone(), snapshot.buffer.clone())?;
    let mut text = array.to_ascii();
    text.push_str(&format!("\n# {:?} {:?}\n", snapshot.time, snapshot.step_hint));
    Ok(text)
}

fn parse_comment(comment: &str, options: &CodecOptions) -> Result<(f64, f64)> {
    let malformed = |reason| CodecError::MalformedHeader {
        line: comment.to_owned(),
        reason,
    };
    let mut fields = comment[2..].split_whitespace();
    let time = fields
        .next()
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| malformed("time is not a number"))?;
    let step_hint = match fields.next() {
        Some(step) => step
            .parse::<f64>()
            .map_err(|_| malformed("step hint is not a number"))?,
        None => options.step_hint_sentinel,
    };
    Ok((time, step_hint))
}
