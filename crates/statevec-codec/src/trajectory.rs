//! Trajectory output files.
//!
//! ```text
//! # run parameters ...
//! 0 0.25 0.5
//! (0,1)
//! [ (1,0) (0,0) ]
//! # BASIS SYS<0> TYPE<Fock>
//! (0,1) x (0,1)
//! [ (1,0) (0,0)
//!   (0,0) (1,0) ]
//! 0.1 0.3 0.4
//! ```
//!
//! The head is every blank or `#` line before the first data row. After it,
//! a line starting with `(` opens a Blitz block holding a state vector and a
//! `# BASIS` line is followed by a Blitz block of basis states. A block runs
//! to the first later line ending in ` ]`. Other `#` lines and blank lines
//! are skipped; anything else is a row of numbers whose first column is the
//! time.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{CodecError, Result};
use crate::{BlitzArray, CodecOptions, Snapshot};

const BASIS_MARKER: &str = "# BASIS";
const BLOCK_END: &str = " ]";

/// One item of the data section, borrowed from the file text.
///
/// `line` is the 1-based line the item starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section<'a> {
    /// A data row, without its line break.
    Row { line: usize, text: &'a str },
    /// A Blitz block holding a state vector.
    StateVector { line: usize, text: &'a str },
    /// A `# BASIS` line and the Blitz block after it.
    Basis {
        line: usize,
        header: &'a str,
        text: &'a str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSections<'a> {
    /// Leading comment lines, verbatim.
    pub head: &'a str,
    pub sections: Vec<Section<'a>>,
}

/// Splits a trajectory file into its head and data-section items.
pub fn split_sections(text: &str) -> Result<OutputSections<'_>> {
    let lines: Vec<(usize, &str)> = text
        .split_inclusive('\n')
        .scan(0, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some((start, line))
        })
        .collect();
    let body = lines
        .iter()
        .position(|&(_, line)| !is_blank(line) && !line.starts_with('#'))
        .unwrap_or(lines.len());
    let head = &text[..lines.get(body).map_or(text.len(), |&(offset, _)| offset)];

    let mut sections = Vec::new();
    let mut i = body;
    while i < lines.len() {
        let (offset, line) = lines[i];
        let number = i + 1;
        if line.starts_with(BASIS_MARKER) {
            let end = block_end(&lines, i + 1).ok_or(CodecError::UnterminatedBlock { line: number })?;
            let (start, _) = lines[i + 1];
            sections.push(Section::Basis {
                line: number,
                header: line.trim_end(),
                text: &text[start..span_end(lines[end])],
            });
            i = end;
        } else if line.starts_with('(') {
            let end = block_end(&lines, i + 1).ok_or(CodecError::UnterminatedBlock { line: number })?;
            sections.push(Section::StateVector {
                line: number,
                text: &text[offset..span_end(lines[end])],
            });
            i = end;
        } else if !is_blank(line) && !line.starts_with('#') {
            sections.push(Section::Row {
                line: number,
                text: line.trim_end(),
            });
        }
        i += 1;
    }
    Ok(OutputSections { head, sections })
}

/// A basis change announced by a `# BASIS SYS<n> TYPE<name>` block.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisChange {
    /// Subsystem index, `None` for the whole system (`SYS<-1>`).
    pub system: Option<usize>,
    /// Basis name from `TYPE<...>`.
    pub kind: String,
    /// Time of the last row before the block.
    pub time: Option<f64>,
    pub states: BlitzArray,
}

/// A parsed trajectory file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    pub head: String,
    /// One entry per data row, time first.
    pub rows: Vec<Vec<f64>>,
    /// Embedded state vectors, each timed by the row before it.
    pub statevectors: Vec<Snapshot>,
    pub bases: Vec<BasisChange>,
}

impl Trajectory {
    pub fn times(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.first().copied())
            .collect()
    }

    /// Column `index` of every row, `None` if some row is shorter.
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        self.rows.iter().map(|row| row.get(index).copied()).collect()
    }
}

pub fn parse_trajectory(text: &str, options: &CodecOptions) -> Result<Trajectory> {
    options.validate()?;
    let OutputSections { head, sections } = split_sections(text)?;
    let mut trajectory = Trajectory {
        head: head.to_owned(),
        ..Trajectory::default()
    };
    let mut time = None;
    for section in sections {
        match section {
            Section::Row { line, text } => {
                let row = parse_row(line, text)?;
                time = row.first().copied();
                trajectory.rows.push(row);
            }
            Section::StateVector { line, text } => {
                let time = time.ok_or(CodecError::MissingTimestamp { line })?;
                let (shape, buffer) = BlitzArray::parse_with(text, options)?.into_parts();
                let snapshot = Snapshot::new(shape, buffer, time, options.step_hint_sentinel)?;
                trajectory.statevectors.push(snapshot);
            }
            Section::Basis { header, text, .. } => {
                let (system, kind) = parse_basis_header(header)?;
                trajectory.bases.push(BasisChange {
                    system,
                    kind,
                    time,
                    states: BlitzArray::parse_with(text, options)?,
                });
            }
        }
    }
    debug!(
        rows = trajectory.rows.len(),
        statevectors = trajectory.statevectors.len(),
        bases = trajectory.bases.len(),
        "parsed trajectory"
    );
    Ok(trajectory)
}

pub fn load_trajectory<P: AsRef<Path>>(path: P) -> Result<Trajectory> {
    load_trajectory_with(path, &CodecOptions::default())
}

pub fn load_trajectory_with<P: AsRef<Path>>(path: P, options: &CodecOptions) -> Result<Trajectory> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading trajectory");
    let text = fs::read_to_string(path)?;
    parse_trajectory(&text, options)
}

/// Files written by [`split_trajectory`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitFiles {
    pub rows: PathBuf,
    pub statevectors: Vec<PathBuf>,
    pub bases: Vec<PathBuf>,
}

/// Splits a trajectory file into a rows-only file at `write_path` plus one
/// `{write_path}_{time}.sv` file per state vector and one
/// `{write_path}_{time}_basis.sv` file per basis block, times printed with
/// six decimals.
///
/// With `header`, every block file starts with a `# <time> <step hint>` line
/// so [`load_statevector`](crate::load_statevector) can read it. Nothing is
/// written unless the whole input splits.
pub fn split_trajectory<P, Q>(read_path: P, write_path: Q, header: bool) -> Result<SplitFiles>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    split_trajectory_with(read_path, write_path, header, &CodecOptions::default())
}

pub fn split_trajectory_with<P, Q>(
    read_path: P,
    write_path: Q,
    header: bool,
    options: &CodecOptions,
) -> Result<SplitFiles>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let write_path = write_path.as_ref();
    let text = fs::read_to_string(read_path.as_ref())?;
    let OutputSections { head, sections } = split_sections(&text)?;

    let mut rows = Vec::new();
    let mut blocks: Vec<(PathBuf, String, bool)> = Vec::new();
    let mut time = None;
    for section in sections {
        let (line, text, suffix, basis) = match section {
            Section::Row { line, text } => {
                let token = text.split_whitespace().next().unwrap_or_default();
                let t = token.parse::<f64>().map_err(|_| CodecError::MalformedRow {
                    line,
                    token: token.to_owned(),
                })?;
                time = Some(t);
                rows.push(text);
                continue;
            }
            Section::StateVector { line, text } => (line, text, "", false),
            Section::Basis { line, text, .. } => (line, text, "_basis", true),
        };
        let time = time.ok_or(CodecError::MissingTimestamp { line })?;
        let path = suffixed(write_path, &format!("_{time:.6}{suffix}.sv"));
        let contents = if header {
            format!("# {time:?} {:?}\n{text}", options.step_hint_sentinel)
        } else {
            text.to_owned()
        };
        blocks.push((path, contents, basis));
    }

    let mut main = String::from(head);
    main.push_str("\n\n");
    main.push_str(&rows.join("\n"));
    main.push('\n');
    fs::write(write_path, main)?;

    let mut files = SplitFiles {
        rows: write_path.to_path_buf(),
        ..SplitFiles::default()
    };
    for (path, contents, basis) in blocks {
        fs::write(&path, contents)?;
        trace!(path = %path.display(), basis, "wrote block");
        if basis {
            files.bases.push(path);
        } else {
            files.statevectors.push(path);
        }
    }
    debug!(
        rows = rows.len(),
        statevectors = files.statevectors.len(),
        bases = files.bases.len(),
        "split trajectory"
    );
    Ok(files)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn block_end(lines: &[(usize, &str)], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| lines[i].1.trim_end_matches(['\n', '\r']).ends_with(BLOCK_END))
}

fn span_end((offset, line): (usize, &str)) -> usize {
    offset + line.len()
}

fn parse_row(line: usize, text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| CodecError::MalformedRow {
                line,
                token: token.to_owned(),
            })
        })
        .collect()
}

fn parse_basis_header(header: &str) -> Result<(Option<usize>, String)> {
    let malformed = |reason| CodecError::MalformedHeader {
        line: header.to_owned(),
        reason,
    };
    let system = tagged(header, "SYS<").ok_or_else(|| malformed("missing SYS<n>"))?;
    let system: i64 = system
        .trim()
        .parse()
        .map_err(|_| malformed("SYS<n> is not an integer"))?;
    let system = match system {
        -1 => None,
        n => Some(usize::try_from(n).map_err(|_| malformed("SYS<n> below -1"))?),
    };
    let kind = tagged(header, "TYPE<").ok_or_else(|| malformed("missing TYPE<name>"))?;
    Ok((system, kind.to_owned()))
}

fn tagged<'a>(header: &'a str, tag: &str) -> Option<&'a str> {
    let start = header.find(tag)? + tag.len();
    let len = header[start..].find('>')?;
    Some(&header[start..start + len])
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
