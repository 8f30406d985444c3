//! Decoding of positional rows into named records.
//!
//! The API encodes order book levels, trades and candles as JSON arrays:
//!
//! - order book level: `[price, amount]`
//! - trade: `[id, timestamp, price, amount]`
//! - OHLC bar: `[close_time, open, high, low, close, volume, ...]`
//!
//! Every function here is pure: the same payload always yields the same records.

use cryptowatch_types::{ApiError, Ohlc, OhlcBar, OrderBook, OrderBookEntry, Trade};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while decoding a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A value that should be an array is something else.
    #[error("Expected an array for {0}")]
    NotAnArray(&'static str),

    /// A value that should be an object is something else.
    #[error("Expected an object for {0}")]
    NotAnObject(&'static str),

    /// A row has fewer elements than the record needs.
    #[error("Row too short: {found} elements (expected at least {expected})")]
    RowLength {
        /// Elements the record needs.
        expected: usize,
        /// Elements the row has.
        found: usize,
    },

    /// A row element is not a number of the expected kind.
    #[error("Element {index} is not a valid {kind}")]
    InvalidNumber {
        /// Position in the row.
        index: usize,
        /// Expected kind of number.
        kind: &'static str,
    },
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Extracts the `price` field of a price payload.
///
/// # Errors
///
/// Returns an error if the field is absent or not a number.
pub fn parse_price(payload: &Value) -> Result<f64, ParseError> {
    payload
        .get("price")
        .ok_or(ParseError::MissingField("price"))?
        .as_f64()
        .ok_or(ParseError::InvalidNumber {
            index: 0,
            kind: "float",
        })
}

/// Decodes an order book payload `{asks: [[p, a], ..], bids: [[p, a], ..]}`.
///
/// # Errors
///
/// Returns an error if either side is missing or a level is malformed.
pub fn parse_order_book(payload: &Value) -> Result<OrderBook, ParseError> {
    let side = |name: &'static str| -> Result<Vec<OrderBookEntry>, ParseError> {
        rows(payload.get(name).ok_or(ParseError::MissingField(name))?, name)?
            .iter()
            .map(order_book_entry)
            .collect()
    };
    Ok(OrderBook::new(side("asks")?, side("bids")?))
}

/// Decodes a single `[price, amount]` level.
///
/// # Errors
///
/// Returns an error if the row is too short or holds non-numbers.
pub fn order_book_entry(row: &Value) -> Result<OrderBookEntry, ParseError> {
    let row = fields(row, "orderbook level", 2)?;
    Ok(OrderBookEntry::new(float(row, 0)?, float(row, 1)?))
}

/// Decodes a trade list `[[id, timestamp, price, amount], ..]`.
///
/// # Errors
///
/// Returns an error if the payload is not an array or a trade is malformed.
pub fn parse_trades(payload: &Value) -> Result<Vec<Trade>, ParseError> {
    rows(payload, "trades")?.iter().map(trade).collect()
}

/// Decodes a single `[id, timestamp, price, amount]` trade.
///
/// # Errors
///
/// Returns an error if the row is too short or holds non-numbers.
pub fn trade(row: &Value) -> Result<Trade, ParseError> {
    let row = fields(row, "trade", 4)?;
    Ok(Trade::new(
        unsigned(row, 0)?,
        integer(row, 1)?,
        float(row, 2)?,
        float(row, 3)?,
    ))
}

/// Decodes an OHLC payload `{period: [[close_time, o, h, l, c, volume, ..], ..], ..}`.
///
/// Bars keep the order they had under their period label. Elements past the
/// sixth (such as quote volume) are ignored.
///
/// # Errors
///
/// Returns an error if the payload is not an object or a bar is malformed.
pub fn parse_ohlc(payload: &Value) -> Result<Ohlc, ParseError> {
    let periods = payload
        .as_object()
        .ok_or(ParseError::NotAnObject("ohlc"))?;

    let mut ohlc = Ohlc::new();
    for (period, bars) in periods {
        let bars = rows(bars, "ohlc period")?
            .iter()
            .map(ohlc_bar)
            .collect::<Result<Vec<_>, _>>()?;
        ohlc.insert(period.clone(), bars);
    }
    Ok(ohlc)
}

/// Decodes a single `[close_time, open, high, low, close, volume]` bar.
///
/// # Errors
///
/// Returns an error if the row is too short or holds non-numbers.
pub fn ohlc_bar(row: &Value) -> Result<OhlcBar, ParseError> {
    let row = fields(row, "ohlc bar", 6)?;
    Ok(OhlcBar::new(
        integer(row, 0)?,
        float(row, 1)?,
        float(row, 2)?,
        float(row, 3)?,
        float(row, 4)?,
        float(row, 5)?,
    ))
}

fn rows<'a>(value: &'a Value, what: &'static str) -> Result<&'a [Value], ParseError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ParseError::NotAnArray(what))
}

fn fields<'a>(
    row: &'a Value,
    what: &'static str,
    expected: usize,
) -> Result<&'a [Value], ParseError> {
    let row = rows(row, what)?;
    if row.len() < expected {
        return Err(ParseError::RowLength {
            expected,
            found: row.len(),
        });
    }
    Ok(row)
}

fn float(row: &[Value], index: usize) -> Result<f64, ParseError> {
    row[index].as_f64().ok_or(ParseError::InvalidNumber {
        index,
        kind: "float",
    })
}

// Whole numbers sometimes arrive in float notation (e.g. `1.5e9`).
fn integer(row: &[Value], index: usize) -> Result<i64, ParseError> {
    let value = &row[index];
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        })
        .ok_or(ParseError::InvalidNumber {
            index,
            kind: "integer",
        })
}

fn unsigned(row: &[Value], index: usize) -> Result<u64, ParseError> {
    u64::try_from(integer(row, index)?).map_err(|_| ParseError::InvalidNumber {
        index,
        kind: "unsigned integer",
    })
}
