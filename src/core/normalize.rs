use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{CandleSeries, RawCandle};

/// Which record wins when several share a bucket time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// First occurrence in input order.
    #[default]
    KeepFirst,
    /// Last occurrence in input order, for sources that revise a bucket in place.
    KeepLast,
}

/// Filters malformed records, drops duplicate times (first wins) and sorts
/// ascending by time.
pub fn normalize<I>(raw: I) -> CandleSeries
where
    I: IntoIterator,
    I::Item: Into<RawCandle>,
{
    normalize_with(raw, DuplicatePolicy::KeepFirst)
}

/// Same pipeline as [`normalize`] with an explicit duplicate policy.
pub fn normalize_with<I>(raw: I, policy: DuplicatePolicy) -> CandleSeries
where
    I: IntoIterator,
    I::Item: Into<RawCandle>,
{
    let mut received = 0_usize;
    let mut skipped = 0_usize;
    let mut duplicates = 0_usize;
    let mut by_time: IndexMap<i64, _> = IndexMap::new();

    for (index, item) in raw.into_iter().enumerate() {
        received += 1;
        let raw: RawCandle = item.into();
        let Some(candle) = raw.checked() else {
            skipped += 1;
            trace!(index, ?raw, "skipping malformed candle");
            continue;
        };

        match by_time.entry(candle.time) {
            Entry::Vacant(slot) => {
                slot.insert(candle);
            }
            Entry::Occupied(mut slot) => {
                duplicates += 1;
                if policy == DuplicatePolicy::KeepLast {
                    *slot.get_mut() = candle;
                }
            }
        }
    }

    let mut candles: Vec<_> = by_time.into_values().collect();
    candles.sort_by_key(|candle| candle.time);

    debug!(
        received,
        skipped,
        duplicates,
        canonical_count = candles.len(),
        ?policy,
        "normalized candles"
    );
    CandleSeries::from_canonical(candles)
}
