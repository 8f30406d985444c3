//! Order book snapshot.

use serde::{Deserialize, Serialize};

/// One price level of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    /// Price level.
    pub price: f64,
    /// Amount available at this level.
    pub amount: f64,
}

impl OrderBookEntry {
    /// Creates a new order book entry.
    #[must_use]
    pub const fn new(price: f64, amount: f64) -> Self {
        Self { price, amount }
    }

    /// Returns the notional value (price * amount).
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.amount
    }
}

/// Order book with both sides in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Sell side.
    pub asks: Vec<OrderBookEntry>,
    /// Buy side.
    pub bids: Vec<OrderBookEntry>,
}

impl OrderBook {
    /// Creates a new order book.
    #[must_use]
    pub const fn new(asks: Vec<OrderBookEntry>, bids: Vec<OrderBookEntry>) -> Self {
        Self { asks, bids }
    }

    /// Returns the lowest ask.
    #[must_use]
    pub fn best_ask(&self) -> Option<&OrderBookEntry> {
        self.asks.iter().min_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Returns the highest bid.
    #[must_use]
    pub fn best_bid(&self) -> Option<&OrderBookEntry> {
        self.bids.iter().max_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Returns the spread (best ask - best bid).
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Returns true if both sides are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}
