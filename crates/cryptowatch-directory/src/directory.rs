//! Market index grouped by exchange.

use std::collections::HashMap;

use cryptowatch_fetch::url::markets_url;
use cryptowatch_fetch::{ApiClient, Transport};
use cryptowatch_types::{Market, MarketDetail, Result};
use tracing::debug;

/// Directory of markets, indexed by exchange.
///
/// The market listing is fetched once at construction and never refreshed, so the
/// index is read-only for the directory's lifetime. Exchanges keep the order in
/// which they first appeared in the listing and markets keep their listing order.
#[derive(Debug)]
pub struct ExchangeDirectory<T = ApiClient> {
    transport: T,
    only_active: bool,
    exchanges: Vec<String>,
    markets: HashMap<String, Vec<Market>>,
}

impl ExchangeDirectory {
    /// Loads the active markets using a default API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the listing cannot be fetched.
    pub fn with_defaults() -> Result<Self> {
        Self::load(ApiClient::with_defaults()?, true)
    }
}

impl<T: Transport> ExchangeDirectory<T> {
    /// Loads the market listing from the transport's base URL.
    ///
    /// With `only_active`, markets flagged inactive are left out of the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched or decoded.
    pub fn load(transport: T, only_active: bool) -> Result<Self> {
        let url = markets_url(transport.base_url());
        Self::load_from(transport, &url, only_active)
    }

    /// Loads the market listing from the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched or decoded.
    pub fn load_from(transport: T, url: &str, only_active: bool) -> Result<Self> {
        let listing = transport.get(url, &[])?;
        let markets: Vec<Market> = serde_json::from_value(listing)?;
        let directory = Self::from_markets(transport, markets, only_active);
        debug!(
            url,
            markets = directory.len(),
            exchanges = directory.exchanges.len(),
            only_active,
            "loaded market directory"
        );
        Ok(directory)
    }

    /// Builds a directory from an already fetched listing.
    pub fn from_markets(
        transport: T,
        markets: impl IntoIterator<Item = Market>,
        only_active: bool,
    ) -> Self {
        let mut exchanges = Vec::new();
        let mut index: HashMap<String, Vec<Market>> = HashMap::new();

        for market in markets {
            if only_active && !market.is_active() {
                continue;
            }
            if !index.contains_key(market.exchange()) {
                exchanges.push(market.exchange().to_string());
            }
            index
                .entry(market.exchange().to_string())
                .or_default()
                .push(market);
        }

        Self {
            transport,
            only_active,
            exchanges,
            markets: index,
        }
    }

    /// Returns the exchange names in first-seen order.
    pub fn exchanges(&self) -> Vec<&str> {
        self.exchanges.iter().map(String::as_str).collect()
    }

    /// Returns the pairs listed for an exchange, empty if the exchange is unknown.
    pub fn pairs(&self, exchange: &str) -> Vec<&str> {
        self.markets(exchange).iter().map(Market::pair).collect()
    }

    /// Returns the markets listed for an exchange, empty if the exchange is unknown.
    #[must_use]
    pub fn markets(&self, exchange: &str) -> &[Market] {
        self.markets
            .get(exchange)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Looks up a market by exchange and pair.
    ///
    /// Returns the first listed match, or `None` if there is no such market.
    #[must_use]
    pub fn market_info(&self, exchange: &str, pair: &str) -> Option<&Market> {
        self.markets(exchange)
            .iter()
            .find(|market| market.pair() == pair)
    }

    /// Fetches the detail resource of a market, including its routes.
    ///
    /// Returns `Ok(None)` if there is no such market.
    ///
    /// # Errors
    ///
    /// Returns an error if the detail cannot be fetched or decoded.
    pub fn market_info_detail(&self, exchange: &str, pair: &str) -> Result<Option<MarketDetail>> {
        let Some(market) = self.market_info(exchange, pair) else {
            debug!(exchange, pair, "market not listed");
            return Ok(None);
        };
        let detail = self.transport.get(market.route(), &[])?;
        Ok(Some(serde_json::from_value(detail)?))
    }

    /// Returns the total number of indexed markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.values().map(Vec::len).sum()
    }

    /// Returns true if no market is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Returns true if inactive markets were filtered out.
    #[must_use]
    pub const fn only_active(&self) -> bool {
        self.only_active
    }

    /// Returns the transport the directory issues its calls through.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use cryptowatch_fetch::{ClientConfig, ScriptedBackend};
    use cryptowatch_types::{ApiError, RouteKind};
    use serde_json::{Value, json};

    fn scripted_client(backend: ScriptedBackend) -> ApiClient<ScriptedBackend> {
        ApiClient::with_backend(
            backend,
            ClientConfig {
                retry_delay: Duration::ZERO,
                ..ClientConfig::default()
            },
        )
    }

    fn market(exchange: &str, pair: &str, active: bool) -> Value {
        json!({
            "exchange": exchange,
            "pair": pair,
            "active": active,
            "route": format!("https://api.cryptowat.ch/markets/{exchange}/{pair}"),
        })
    }

    fn listing() -> Value {
        json!([
            market("bitfinex", "btcusd", true),
            market("kraken", "btceur", true),
            market("bitfinex", "ltcusd", false),
            market("bitfinex", "ethusd", true),
            market("gdax", "btcusd", false),
            market("kraken", "ethbtc", true),
        ])
    }

    fn load(only_active: bool) -> ExchangeDirectory<ApiClient<ScriptedBackend>> {
        let backend = ScriptedBackend::new();
        backend.push_result(listing());
        ExchangeDirectory::load(scripted_client(backend), only_active).unwrap()
    }

    #[test]
    fn test_load_requests_markets_listing() {
        let directory = load(true);
        let requests = directory.transport().backend().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.cryptowat.ch/markets");
        assert!(requests[0].params.is_empty());
    }

    #[test]
    fn test_load_uses_configured_base_url() {
        let backend = ScriptedBackend::new();
        backend.push_result(listing());
        let client = ApiClient::with_backend(
            backend,
            ClientConfig {
                base_url: "http://localhost:9999/".to_string(),
                retry_delay: Duration::ZERO,
                ..ClientConfig::default()
            },
        );

        let directory = ExchangeDirectory::load(&client, true).unwrap();
        assert_eq!(directory.len(), 4);
        assert_eq!(
            client.backend().requests()[0].url,
            "http://localhost:9999/markets"
        );
    }

    #[test]
    fn test_only_active_filters_inactive_markets() {
        let directory = load(true);
        assert!(directory.only_active());
        assert_eq!(directory.len(), 4);
        assert_eq!(directory.exchanges(), vec!["bitfinex", "kraken"]);
        assert!(
            directory
                .exchanges()
                .iter()
                .flat_map(|e| directory.markets(e))
                .all(Market::is_active)
        );
    }

    #[test]
    fn test_all_markets_kept_without_filter() {
        let directory = load(false);
        assert_eq!(directory.len(), 6);
        assert_eq!(directory.exchanges(), vec!["bitfinex", "kraken", "gdax"]);
        assert_eq!(directory.pairs("gdax"), vec!["btcusd"]);
    }

    #[test]
    fn test_pairs_keep_listing_order() {
        let directory = load(false);
        assert_eq!(
            directory.pairs("bitfinex"),
            vec!["btcusd", "ltcusd", "ethusd"]
        );
        assert_eq!(directory.pairs("kraken"), vec!["btceur", "ethbtc"]);
    }

    #[test]
    fn test_unknown_exchange_has_no_pairs() {
        let directory = load(true);
        assert!(directory.pairs("mtgox").is_empty());
        assert!(directory.markets("mtgox").is_empty());
        assert!(directory.market_info("mtgox", "btcusd").is_none());
    }

    #[test]
    fn test_market_info_lookup() {
        let directory = load(true);
        let market = directory.market_info("kraken", "ethbtc").unwrap();
        assert_eq!(market.exchange(), "kraken");
        assert_eq!(
            market.route(),
            "https://api.cryptowat.ch/markets/kraken/ethbtc"
        );
        assert!(directory.market_info("kraken", "xrpusd").is_none());
        assert!(directory.market_info("bitfinex", "ltcusd").is_none());
    }

    #[test]
    fn test_market_info_returns_first_duplicate() {
        let markets = vec![
            Market::new("kraken", "btcusd", true, "first"),
            Market::new("kraken", "btcusd", true, "second"),
        ];
        let directory =
            ExchangeDirectory::from_markets(scripted_client(ScriptedBackend::new()), markets, true);
        assert_eq!(
            directory.market_info("kraken", "btcusd").unwrap().route(),
            "first"
        );
        assert_eq!(directory.pairs("kraken"), vec!["btcusd", "btcusd"]);
    }

    #[test]
    fn test_market_info_detail_fetches_route() {
        let backend = ScriptedBackend::new();
        backend.push_result(listing());
        backend.push_result(json!({
            "id": 61,
            "exchange": "kraken",
            "pair": "btceur",
            "active": true,
            "routes": {
                "price": "https://api.cryptowat.ch/markets/kraken/btceur/price",
                "summary": "https://api.cryptowat.ch/markets/kraken/btceur/summary",
                "orderbook": "https://api.cryptowat.ch/markets/kraken/btceur/orderbook",
                "trades": "https://api.cryptowat.ch/markets/kraken/btceur/trades",
                "ohlc": "https://api.cryptowat.ch/markets/kraken/btceur/ohlc"
            }
        }));
        let directory = ExchangeDirectory::load(scripted_client(backend), true).unwrap();

        let detail = directory
            .market_info_detail("kraken", "btceur")
            .unwrap()
            .unwrap();
        assert_eq!(
            detail.routes.get(RouteKind::Trades),
            "https://api.cryptowat.ch/markets/kraken/btceur/trades"
        );
        assert_eq!(detail.field("id"), Some(&json!(61)));

        let requests = directory.transport().backend().requests();
        assert_eq!(
            requests[1].url,
            "https://api.cryptowat.ch/markets/kraken/btceur"
        );
    }

    #[test]
    fn test_market_info_detail_absent_market_makes_no_call() {
        let directory = load(true);
        assert!(
            directory
                .market_info_detail("kraken", "dogeusd")
                .unwrap()
                .is_none()
        );
        assert_eq!(directory.transport().backend().requests().len(), 1);
    }

    #[test]
    fn test_market_info_detail_propagates_api_error() {
        let backend = ScriptedBackend::new();
        backend.push_result(listing());
        backend.push(400, r#"{"error": "Instrument not found"}"#);
        let directory = ExchangeDirectory::load(scripted_client(backend), true).unwrap();

        let err = directory
            .market_info_detail("bitfinex", "btcusd")
            .unwrap_err();
        assert!(matches!(err, ApiError::Client { message } if message == "Instrument not found"));
    }

    #[test]
    fn test_load_fails_on_rate_limit() {
        let backend = ScriptedBackend::new();
        for _ in 0..5 {
            backend.push(429, "");
        }
        let err = ExchangeDirectory::load(scripted_client(backend), true).unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_load_rejects_malformed_listing() {
        let backend = ScriptedBackend::new();
        backend.push_result(json!({"exchange": "kraken"}));
        let err = ExchangeDirectory::load(scripted_client(backend), true).unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }
}
