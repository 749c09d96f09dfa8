pub mod candle;
pub mod candlestick;
pub mod normalize;
pub mod primitives;
pub mod scale;
pub mod types;

pub use candle::{Candle, CandleSeries, RawCandle};
pub use candlestick::{CandleGeometry, project_candles};
pub use normalize::{DuplicatePolicy, normalize, normalize_with};
pub use scale::{LinearScale, PriceScale, ScaleMargins, TimeScale};
pub use types::{PlotArea, Viewport};
