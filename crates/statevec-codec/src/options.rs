//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_RANK, STEP_HINT_SENTINEL};
use crate::error::{CodecError, Result};

/// Tunables shared by every entry point.
///
/// Missing fields fall back to their defaults when deserialized, so a host
/// can embed a partial `[codec]` table in its own config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Highest accepted rank, inclusive.
    pub max_rank: usize,
    /// Step hint written when the caller does not supply one.
    pub step_hint_sentinel: f64,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_rank: MAX_RANK,
            step_hint_sentinel: STEP_HINT_SENTINEL,
        }
    }
}

impl CodecOptions {
    pub fn with_max_rank(mut self, max_rank: usize) -> Self {
        self.max_rank = max_rank;
        self
    }

    pub fn with_step_hint_sentinel(mut self, step_hint: f64) -> Self {
        self.step_hint_sentinel = step_hint;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rank == 0 {
            return Err(CodecError::InvalidOptions("max_rank must be at least 1"));
        }
        Ok(())
    }
}
