//! HTTP transport for the cryptowatch market-data client.
//!
//! This crate provides the request pipeline shared by every API call:
//!
//! - [`Transport`] - The `get(url, params)` capability the directory and market clients compose
//! - [`ApiClient`] - Retry, status classification and allowance bookkeeping
//! - [`HttpBackend`] - Raw HTTP seam, implemented for [`reqwest::blocking::Client`]
//! - [`parse`] - Positional row decoding into order books, trades and OHLC bars
//! - [`url`] - Endpoint URLs and query construction

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod envelope;
pub mod parse;
#[cfg(any(test, feature = "testing"))]
mod scripted;
pub mod url;

pub use client::{ApiClient, ClientConfig, HttpBackend, RawResponse, Transport};
pub use envelope::Envelope;
pub use parse::ParseError;
#[cfg(any(test, feature = "testing"))]
pub use scripted::{RecordedRequest, ScriptedBackend};
pub use url::Query;
