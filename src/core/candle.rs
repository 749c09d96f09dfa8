use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64, unix_seconds_to_datetime};
use crate::error::DashResult;

/// One OHLC data point keyed by its bucket start in unix seconds.
///
/// A `Candle` may carry non-finite prices when it comes straight from a data
/// source; only candles inside a [`CandleSeries`] are guaranteed well formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    #[must_use]
    pub const fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Converts strongly-typed temporal/decimal input into a candle.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> DashResult<Self> {
        Ok(Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
        ))
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    /// All prices finite and non-negative.
    #[must_use]
    pub fn is_well_formed(self) -> bool {
        [self.open, self.high, self.low, self.close]
            .into_iter()
            .all(|price| price.is_finite() && price >= 0.0)
    }

    #[must_use]
    pub fn datetime(self) -> Option<DateTime<Utc>> {
        unix_seconds_to_datetime(self.time)
    }
}

/// Untrusted candle record; any field may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCandle {
    pub time: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl RawCandle {
    /// Returns the candle when every field is present, finite and non-negative.
    #[must_use]
    pub fn checked(self) -> Option<Candle> {
        let candle = Candle::new(
            self.time?,
            self.open?,
            self.high?,
            self.low?,
            self.close?,
        );
        candle.is_well_formed().then_some(candle)
    }
}

impl From<Candle> for RawCandle {
    fn from(candle: Candle) -> Self {
        Self {
            time: Some(candle.time),
            open: Some(candle.open),
            high: Some(candle.high),
            low: Some(candle.low),
            close: Some(candle.close),
        }
    }
}

impl From<&Candle> for RawCandle {
    fn from(candle: &Candle) -> Self {
        Self::from(*candle)
    }
}

/// Normalized candle sequence: well formed, unique `time`, ascending.
///
/// Only the normalizer builds non-empty series, so holders can rely on the
/// invariants without re-checking.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub(crate) fn from_canonical(candles: Vec<Candle>) -> Self {
        debug_assert!(candles.windows(2).all(|pair| pair[0].time < pair[1].time));
        Self { candles }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// First and last bucket times.
    #[must_use]
    pub fn time_range(&self) -> Option<(i64, i64)> {
        Some((self.first()?.time, self.last()?.time))
    }

    /// Lowest low and highest high across the series.
    #[must_use]
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.candles.is_empty() {
            return None;
        }
        let (min, max) = self
            .candles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), candle| {
                (min.min(candle.low), max.max(candle.high))
            });
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
