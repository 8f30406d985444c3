//! Core types for the cryptowatch market-data client.
//!
//! This crate provides the data structures shared by the rest of the workspace:
//!
//! - [`Market`] - A tradable pair on one exchange, as listed by `/markets`
//! - [`MarketDetail`] and [`Routes`] - The self-describing route set of a market
//! - [`Allowance`] - Rate-limit accounting reported with every response
//! - [`OrderBook`], [`Trade`], [`OhlcBar`] - Named records decoded from positional rows
//! - [`ApiError`] - The failure taxonomy of every API call

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod allowance;
mod book;
mod error;
mod market;
mod ohlc;
mod trade;

pub use allowance::Allowance;
pub use book::{OrderBook, OrderBookEntry};
pub use error::{ApiError, Result};
pub use market::{Market, MarketDetail, RouteKind, Routes};
pub use ohlc::{Ohlc, OhlcBar};
pub use trade::Trade;
