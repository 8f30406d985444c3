//! OHLC (candlestick) data.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC bars grouped by the period label the API returned them under
/// (e.g., `"60"` for one-minute candles).
pub type Ohlc = BTreeMap<String, Vec<OhlcBar>>;

/// OHLC bar (candlestick) data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    /// Bar close time in Unix seconds.
    pub close_time: i64,
    /// Opening price.
    pub open_price: f64,
    /// Highest price during the period.
    pub high_price: f64,
    /// Lowest price during the period.
    pub low_price: f64,
    /// Closing price.
    pub close_price: f64,
    /// Traded volume in the base asset.
    pub volume: f64,
}

impl OhlcBar {
    /// Creates a new OHLC bar.
    #[must_use]
    pub const fn new(
        close_time: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Self {
            close_time,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    /// Returns the close time, or None if the timestamp is out of range.
    #[must_use]
    pub fn close_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.close_time, 0)
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high_price - self.low_price
    }

    /// Returns true if this is a bullish (green) bar.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close_price > self.open_price
    }
}
