//! Executed trade record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade identifier (0 on exchanges that do not expose one).
    pub id: u64,
    /// Execution time in Unix seconds.
    pub timestamp: i64,
    /// Execution price.
    pub price: f64,
    /// Traded amount.
    pub amount: f64,
}

impl Trade {
    /// Creates a new trade.
    #[must_use]
    pub const fn new(id: u64, timestamp: i64, price: f64, amount: f64) -> Self {
        Self {
            id,
            timestamp,
            price,
            amount,
        }
    }

    /// Returns the execution time, or None if the timestamp is out of range.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Returns the notional value (price * amount).
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.amount
    }
}
