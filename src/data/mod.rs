//! Candle sources: the live klines adapter and the static fallback dataset.

mod binance;
mod fallback;
mod source;

pub use binance::{
    BinanceKlineSource, DEFAULT_KLINES_ENDPOINT, KlineQuery, MAX_KLINE_LIMIT,
    decode_kline_response, parse_exchange_number, parse_kline_row,
};
pub use fallback::{FALLBACK_CANDLES, fallback_candles};
pub use source::{CandleSource, StaticCandleSource};
