use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core::Candle;
use crate::core::primitives::millis_to_unix_seconds;
use crate::data::CandleSource;
use crate::error::{DashError, DashResult};

pub const DEFAULT_KLINES_ENDPOINT: &str = "https://api.binance.com/api/v3/klines";
pub const MAX_KLINE_LIMIT: u16 = 150;

/// Fields every kline row must carry: open time plus OHLC.
const KLINE_MIN_FIELDS: usize = 5;

/// Symbol/interval/window selection for the klines endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KlineQuery {
    pub endpoint: String,
    pub symbol: String,
    pub interval: String,
    pub limit: u16,
}

impl Default for KlineQuery {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_KLINES_ENDPOINT.to_owned(),
            symbol: "BTCUSDT".to_owned(),
            interval: "1d".to_owned(),
            limit: MAX_KLINE_LIMIT,
        }
    }
}

impl KlineQuery {
    pub fn validate(self) -> DashResult<Self> {
        if self.endpoint.trim().is_empty() {
            return Err(DashError::Config("kline endpoint must not be empty".to_owned()));
        }
        if self.symbol.is_empty() || !self.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DashError::Config(format!(
                "kline symbol `{}` must be non-empty ascii alphanumeric",
                self.symbol
            )));
        }
        if self.interval.is_empty() {
            return Err(DashError::Config("kline interval must not be empty".to_owned()));
        }
        if !(1..=MAX_KLINE_LIMIT).contains(&self.limit) {
            return Err(DashError::Config(format!(
                "kline limit must be in 1..={MAX_KLINE_LIMIT}, got {}",
                self.limit
            )));
        }
        Ok(self)
    }

    fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("symbol", self.symbol.clone()),
            ("interval", self.interval.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Blocking klines client; one outbound request per `fetch_candles` call.
#[derive(Debug, Clone)]
pub struct BinanceKlineSource {
    client: reqwest::blocking::Client,
    query: KlineQuery,
}

impl BinanceKlineSource {
    /// Builds the client. Without `timeout` the transport default applies.
    pub fn new(query: KlineQuery, timeout: Option<Duration>) -> DashResult<Self> {
        let query = query.validate()?;
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| DashError::Network(format!("http client init failed: {err}")))?;
        Ok(Self { client, query })
    }

    #[must_use]
    pub fn query(&self) -> &KlineQuery {
        &self.query
    }
}

impl CandleSource for BinanceKlineSource {
    fn fetch_candles(&self) -> DashResult<Vec<Candle>> {
        debug!(
            endpoint = %self.query.endpoint,
            symbol = %self.query.symbol,
            interval = %self.query.interval,
            limit = self.query.limit,
            "fetching klines"
        );
        let response = self
            .client
            .get(&self.query.endpoint)
            .query(&self.query.query_pairs())
            .send()
            .map_err(|err| DashError::Network(format!("kline request failed: {err}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| DashError::Network(format!("kline body read failed: {err}")))?;

        let candles = decode_kline_response(status.as_u16(), &body)?;
        debug!(count = candles.len(), "received klines");
        Ok(candles)
    }
}

/// Decodes a klines HTTP response into raw candles.
///
/// An error payload (an object with `code` or a string `msg`) or a non-success status is a
/// `Network` error carrying the upstream message; an unexpected shape is a
/// `Format` error.
pub fn decode_kline_response(status: u16, body: &str) -> DashResult<Vec<Candle>> {
    let success = (200..300).contains(&status);
    let payload: Value = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(_) if !success => {
            return Err(DashError::Network(format!("HTTP status {status}")));
        }
        Err(err) => {
            return Err(DashError::Format(format!("kline body is not json: {err}")));
        }
    };

    if let Some(message) = upstream_error_message(&payload) {
        warn!(status, %message, "kline endpoint returned an error payload");
        return Err(DashError::Network(message));
    }
    if !success {
        return Err(DashError::Network(format!("HTTP status {status}")));
    }

    let rows = payload
        .as_array()
        .ok_or_else(|| DashError::Format("kline payload must be an array".to_owned()))?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| parse_kline_row(index, row))
        .collect()
}

fn upstream_error_message(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;
    let message = object.get("msg").and_then(Value::as_str);
    match (message, object.get("code")) {
        (Some(message), Some(code)) => Some(format!("{message} (code {code})")),
        (Some(message), None) => Some(message.to_owned()),
        (None, Some(code)) => Some(format!("upstream error code {code}")),
        (None, None) => None,
    }
}

/// Maps `[openTime_ms, open, high, low, close, ...]` into a candle.
///
/// Unparsable price fields become `NaN` so normalization drops the candle.
pub fn parse_kline_row(index: usize, row: &Value) -> DashResult<Candle> {
    let fields = row
        .as_array()
        .ok_or_else(|| DashError::Format(format!("kline row {index} is not an array")))?;
    if fields.len() < KLINE_MIN_FIELDS {
        return Err(DashError::Format(format!(
            "kline row {index} has {} fields, expected at least {KLINE_MIN_FIELDS}",
            fields.len()
        )));
    }

    let open_time_ms = parse_open_time(&fields[0]).ok_or_else(|| {
        DashError::Format(format!(
            "kline row {index} open time `{}` is not an integer",
            fields[0]
        ))
    })?;

    Ok(Candle::new(
        millis_to_unix_seconds(open_time_ms),
        parse_exchange_number(&fields[1]),
        parse_exchange_number(&fields[2]),
        parse_exchange_number(&fields[3]),
        parse_exchange_number(&fields[4]),
    ))
}

fn parse_open_time(value: &Value) -> Option<i64> {
    if let Some(millis) = value.as_i64() {
        return Some(millis);
    }
    let millis = value.as_f64()?;
    (millis.is_finite() && millis.fract() == 0.0 && millis.abs() < i64::MAX as f64)
        .then_some(millis as i64)
}

/// Exchanges send prices as decimal strings; numbers are accepted as well.
#[must_use]
pub fn parse_exchange_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::String(text) => {
            let text = text.trim();
            Decimal::from_str(text)
                .ok()
                .and_then(|decimal| decimal.to_f64())
                .or_else(|| text.parse::<f64>().ok())
        }
        Value::Number(number) => number.as_f64(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        trace!(%value, "unparsable exchange number");
        f64::NAN
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{KlineQuery, parse_exchange_number};

    #[test]
    fn exchange_numbers_accept_strings_and_numbers() {
        assert_eq!(parse_exchange_number(&json!("42000.01000000")), 42_000.01);
        assert_eq!(parse_exchange_number(&json!(1.5)), 1.5);
        assert_eq!(parse_exchange_number(&json!("1e3")), 1_000.0);
        assert!(parse_exchange_number(&json!("n/a")).is_nan());
        assert!(parse_exchange_number(&json!(null)).is_nan());
    }

    #[test]
    fn default_query_targets_daily_btc() {
        let query = KlineQuery::default().validate().expect("valid");
        assert_eq!(query.symbol, "BTCUSDT");
        assert_eq!(query.interval, "1d");
        assert_eq!(query.limit, 150);
    }

    #[test]
    fn oversized_limit_is_rejected() {
        let query = KlineQuery {
            limit: 500,
            ..KlineQuery::default()
        };
        assert!(query.validate().is_err());
    }
}
