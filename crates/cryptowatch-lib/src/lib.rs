//! Blocking Rust client for the Cryptowatch public market-data API.
//!
//! This is a facade crate that re-exports functionality from the cryptowatch
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use cryptowatch::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let directory = ExchangeDirectory::with_defaults()?;
//!     println!("{} exchanges", directory.exchanges().len());
//!
//!     let market = MarketClient::new(ApiClient::with_defaults()?, &directory, "kraken", "btcusd")?;
//!     for trade in market.trades(None, Some(10))? {
//!         println!("{} @ {}", trade.amount, trade.price);
//!     }
//!     println!("remaining allowance: {:?}", market.allowance().map(|a| a.remaining));
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use cryptowatch_types::*;

// Re-export transport
pub use cryptowatch_fetch::{
    ApiClient, ClientConfig, Envelope, HttpBackend, ParseError, Query, RawResponse, Transport,
    parse, url,
};

#[cfg(feature = "testing")]
pub use cryptowatch_fetch::{RecordedRequest, ScriptedBackend};

// Re-export directory and market client
pub use cryptowatch_directory::ExchangeDirectory;
pub use cryptowatch_market::MarketClient;

/// Prelude module for convenient imports.
///
/// ```
/// use cryptowatch::prelude::*;
/// ```
pub mod prelude {
    pub use cryptowatch_types::{
        Allowance, ApiError, Market, MarketDetail, Ohlc, OhlcBar, OrderBook, OrderBookEntry,
        Result, RouteKind, Routes, Trade,
    };

    pub use cryptowatch_fetch::{ApiClient, ClientConfig, Transport};

    pub use cryptowatch_directory::ExchangeDirectory;
    pub use cryptowatch_market::MarketClient;
}
