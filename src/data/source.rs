use crate::core::Candle;
use crate::error::DashResult;

/// Anything that can produce one batch of candles per call.
///
/// Implementations return raw candles; normalization is the caller's job.
/// Failures are `DashError::Network` or `DashError::Format`.
pub trait CandleSource {
    fn fetch_candles(&self) -> DashResult<Vec<Candle>>;
}

impl<S: CandleSource + ?Sized> CandleSource for &S {
    fn fetch_candles(&self) -> DashResult<Vec<Candle>> {
        (**self).fetch_candles()
    }
}

impl<S: CandleSource + ?Sized> CandleSource for Box<S> {
    fn fetch_candles(&self) -> DashResult<Vec<Candle>> {
        (**self).fetch_candles()
    }
}

/// Serves a fixed candle list; used for the fallback dataset and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticCandleSource {
    candles: Vec<Candle>,
}

impl StaticCandleSource {
    #[must_use]
    pub fn new(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self::new(super::fallback_candles())
    }
}

impl CandleSource for StaticCandleSource {
    fn fetch_candles(&self) -> DashResult<Vec<Candle>> {
        Ok(self.candles.clone())
    }
}
