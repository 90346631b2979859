//! Runtime rank validation and dispatch.
//!
//! Shapes are handled as dynamically sized extent lists, so there is a single
//! code path for every rank. The dispatcher only enforces the configured
//! ceiling before handing a validated [`Rank`] to the caller's work.

use std::fmt;

use crate::error::{CodecError, Result};

/// A rank known to lie in `1..=max_rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(usize);

impl Rank {
    /// Validates `rank` against `max_rank`.
    pub fn new(rank: i64, max_rank: usize) -> Result<Self> {
        match usize::try_from(rank) {
            Ok(r) if (1..=max_rank).contains(&r) => Ok(Rank(r)),
            _ => Err(CodecError::UnsupportedRank {
                rank,
                max: max_rank,
            }),
        }
    }

    /// Validates the rank of an in-memory array.
    pub fn of_extents(extents: &[usize], max_rank: usize) -> Result<Self> {
        let rank = i64::try_from(extents.len()).unwrap_or(i64::MAX);
        Rank::new(rank, max_rank)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Runs `work` with a validated rank.
///
/// Out-of-range ranks fail with [`CodecError::UnsupportedRank`] before
/// `work` is called, so no partial result can escape.
pub fn dispatch<T, F>(rank: i64, max_rank: usize, work: F) -> Result<T>
where
    F: FnOnce(Rank) -> Result<T>,
{
    let rank = Rank::new(rank, max_rank)?;
    work(rank)
}
