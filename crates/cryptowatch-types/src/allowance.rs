//! Rate-limit accounting.

use serde::{Deserialize, Serialize};

/// Rate-limit allowance reported by the API alongside every result.
///
/// `cost` is what the latest call consumed and `remaining` is the quota left
/// afterwards. Both come from the same `allowance` object and are never derived
/// from one another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allowance {
    /// Cost of the latest call.
    pub cost: f64,
    /// Remaining allowance after the latest call.
    pub remaining: f64,
}

impl Allowance {
    /// Creates a new allowance record.
    #[must_use]
    pub const fn new(cost: f64, remaining: f64) -> Self {
        Self { cost, remaining }
    }

    /// Returns true if the allowance has been used up.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }
}
