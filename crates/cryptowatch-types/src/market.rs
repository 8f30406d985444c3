//! Market descriptors and their route sets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resource kinds a market exposes through its routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Last traded price.
    Price,
    /// 24-hour summary.
    Summary,
    /// Order book snapshot.
    #[serde(rename = "orderbook")]
    OrderBook,
    /// Recent trades.
    Trades,
    /// OHLC candles.
    Ohlc,
}

impl RouteKind {
    /// All route kinds, in the order the API lists them.
    pub const ALL: [Self; 5] = [
        Self::Price,
        Self::Summary,
        Self::OrderBook,
        Self::Trades,
        Self::Ohlc,
    ];

    /// Returns the route key as it appears in the `routes` object.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Summary => "summary",
            Self::OrderBook => "orderbook",
            Self::Trades => "trades",
            Self::Ohlc => "ohlc",
        }
    }
}

impl std::fmt::Display for RouteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tradable pair on one exchange, as listed by the markets endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Numeric market identifier, when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    /// Exchange symbol (e.g., "kraken").
    exchange: String,
    /// Pair symbol (e.g., "btcusd").
    pair: String,
    /// Whether the market is currently trading.
    active: bool,
    /// URL of the market's detail resource.
    route: String,
}

impl Market {
    /// Creates a new market descriptor.
    #[must_use]
    pub fn new(
        exchange: impl Into<String>,
        pair: impl Into<String>,
        active: bool,
        route: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            exchange: exchange.into(),
            pair: pair.into(),
            active,
            route: route.into(),
        }
    }

    /// Returns the numeric market identifier, if the API supplied one.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        self.id
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

    /// Returns true if the market is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the URL of the market's detail resource.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }
}

/// Named sub-routes of a market.
///
/// A route the API did not supply is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routes {
    /// Price route.
    #[serde(default)]
    pub price: String,
    /// Summary route.
    #[serde(default)]
    pub summary: String,
    /// Order book route.
    #[serde(default)]
    pub orderbook: String,
    /// Trades route.
    #[serde(default)]
    pub trades: String,
    /// OHLC route.
    #[serde(default)]
    pub ohlc: String,
}

impl Routes {
    /// Returns the URL for the given route kind, empty if unresolved.
    #[must_use]
    pub fn get(&self, kind: RouteKind) -> &str {
        match kind {
            RouteKind::Price => &self.price,
            RouteKind::Summary => &self.summary,
            RouteKind::OrderBook => &self.orderbook,
            RouteKind::Trades => &self.trades,
            RouteKind::Ohlc => &self.ohlc,
        }
    }

    /// Returns true if no route is resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        RouteKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }
}

/// Market detail payload: the route set plus every other field the API returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDetail {
    /// Routes to the market's resources.
    #[serde(default)]
    pub routes: Routes,
    /// Remaining detail fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketDetail {
    /// Returns a detail field other than `routes`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
