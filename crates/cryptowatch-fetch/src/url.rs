//! Endpoint URLs and query construction.

/// Base URL of the public market-data API.
pub const BASE_URL: &str = "https://api.cryptowat.ch";

/// Builds the URL of the market listing.
///
/// # Example
///
/// ```
/// use cryptowatch_fetch::url::markets_url;
///
/// assert_eq!(markets_url("https://api.cryptowat.ch"), "https://api.cryptowat.ch/markets");
/// assert_eq!(markets_url("https://api.cryptowat.ch/"), "https://api.cryptowat.ch/markets");
/// ```
#[must_use]
pub fn markets_url(base: &str) -> String {
    format!("{}/markets", base.trim_end_matches('/'))
}

/// Query parameters that omit absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Adds `key=value` if `value` is present.
    #[must_use]
    pub fn opt<T: ToString>(mut self, key: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.params.push((key, value.to_string()));
        }
        self
    }

    /// Returns the parameters as key/value pairs.
    #[must_use]
    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Returns true if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
