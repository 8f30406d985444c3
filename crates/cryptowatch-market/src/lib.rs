//! Per-market client for the cryptowatch market-data API.
//!
//! # Example
//!
//! ```no_run
//! use cryptowatch_market::MarketClient;
//!
//! let market = MarketClient::connect("kraken", "btcusd")?;
//! println!("last price: {}", market.price()?);
//!
//! let book = market.order_book()?;
//! if let Some(spread) = book.spread() {
//!     println!("spread: {spread}");
//! }
//! # Ok::<(), cryptowatch_types::ApiError>(())
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod market;

pub use market::MarketClient;
