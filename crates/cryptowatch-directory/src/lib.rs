//! Exchange and market directory for the cryptowatch client.
//!
//! # Example
//!
//! ```no_run
//! use cryptowatch_directory::ExchangeDirectory;
//!
//! let directory = ExchangeDirectory::with_defaults()?;
//! for exchange in directory.exchanges() {
//!     println!("{exchange}: {} pairs", directory.pairs(exchange).len());
//! }
//! # Ok::<(), cryptowatch_types::ApiError>(())
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod directory;

pub use directory::ExchangeDirectory;
