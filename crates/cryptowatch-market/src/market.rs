//! Client bound to one market's route set.

use cryptowatch_directory::ExchangeDirectory;
use cryptowatch_fetch::{ApiClient, Query, Transport, parse};
use cryptowatch_types::{
    Allowance, ApiError, Ohlc, OrderBook, Result, RouteKind, Routes, Trade,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Client for a single `(exchange, pair)` market.
///
/// Routes are resolved once, at construction. A market the directory does not
/// list gets an empty route set: construction still succeeds and each operation
/// fails with [`ApiError::MissingRoute`] when called.
#[derive(Debug)]
pub struct MarketClient<T = ApiClient> {
    transport: T,
    exchange: String,
    pair: String,
    routes: Routes,
}

impl MarketClient {
    /// Loads the active market directory and resolves `exchange`/`pair` using
    /// default API clients.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be created or the directory or
    /// market detail cannot be fetched.
    pub fn connect(exchange: impl Into<String>, pair: impl Into<String>) -> Result<Self> {
        let directory = ExchangeDirectory::with_defaults()?;
        Self::new(ApiClient::with_defaults()?, &directory, exchange, pair)
    }
}

impl<T: Transport> MarketClient<T> {
    /// Resolves the routes of `exchange`/`pair` through `directory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the market detail cannot be fetched or decoded.
    pub fn new<D: Transport>(
        transport: T,
        directory: &ExchangeDirectory<D>,
        exchange: impl Into<String>,
        pair: impl Into<String>,
    ) -> Result<Self> {
        let exchange = exchange.into();
        let pair = pair.into();

        let routes = match directory.market_info_detail(&exchange, &pair)? {
            Some(detail) => {
                debug!(%exchange, %pair, "resolved market routes");
                detail.routes
            }
            None => {
                warn!(%exchange, %pair, "market not listed, routes left empty");
                Routes::default()
            }
        };

        Ok(Self::with_routes(transport, exchange, pair, routes))
    }

    /// Creates a client from an already known route set.
    pub fn with_routes(
        transport: T,
        exchange: impl Into<String>,
        pair: impl Into<String>,
        routes: Routes,
    ) -> Self {
        Self {
            transport,
            exchange: exchange.into(),
            pair: pair.into(),
            routes,
        }
    }

    /// Returns the exchange symbol.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Returns the pair symbol.
    #[must_use]
    pub fn pair(&self) -> &str {
        &self.pair
    }

    /// Returns the resolved routes.
    #[must_use]
    pub const fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Returns the allowance reported by the latest call.
    #[must_use]
    pub fn allowance(&self) -> Option<Allowance> {
        self.transport.allowance()
    }

    /// Returns the transport the client issues its calls through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    fn fetch(&self, kind: RouteKind, query: &Query) -> Result<Value> {
        let url = self.routes.get(kind);
        if url.is_empty() {
            return Err(ApiError::MissingRoute { route: kind });
        }
        self.transport.get(url, query.as_slice())
    }

    /// Returns the last traded price.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the payload has no numeric `price`.
    pub fn price(&self) -> Result<f64> {
        let payload = self.fetch(RouteKind::Price, &Query::new())?;
        Ok(parse::parse_price(&payload)?)
    }

    /// Returns the market summary exactly as the API reported it.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails.
    pub fn summary(&self) -> Result<Value> {
        self.fetch(RouteKind::Summary, &Query::new())
    }

    /// Returns the order book.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or a level cannot be decoded.
    pub fn order_book(&self) -> Result<OrderBook> {
        let payload = self.fetch(RouteKind::OrderBook, &Query::new())?;
        Ok(parse::parse_order_book(&payload)?)
    }

    /// Returns recent trades.
    ///
    /// `since` (Unix seconds) and `limit` are only sent when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or a trade cannot be decoded.
    pub fn trades(&self, since: Option<i64>, limit: Option<u32>) -> Result<Vec<Trade>> {
        let query = Query::new().opt("since", since).opt("limit", limit);
        let payload = self.fetch(RouteKind::Trades, &query)?;
        Ok(parse::parse_trades(&payload)?)
    }

    /// Returns OHLC bars grouped by period label.
    ///
    /// `before`/`after` (Unix seconds) and `period` (seconds) are only sent when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or a bar cannot be decoded.
    pub fn ohlc(
        &self,
        before: Option<i64>,
        after: Option<i64>,
        period: Option<u64>,
    ) -> Result<Ohlc> {
        let query = Query::new()
            .opt("period", period)
            .opt("after", after)
            .opt("before", before);
        let payload = self.fetch(RouteKind::Ohlc, &query)?;
        Ok(parse::parse_ohlc(&payload)?)
    }
}
