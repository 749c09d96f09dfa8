use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{DashError, DashResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> DashResult<f64> {
    value.to_f64().ok_or_else(|| {
        DashError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}

#[must_use]
pub fn unix_seconds_to_datetime(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

/// Exchange timestamps are milliseconds; buckets are keyed in whole seconds.
#[must_use]
pub fn millis_to_unix_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000)
}
