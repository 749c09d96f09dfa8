use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{Candle, PlotArea, PriceScale, TimeScale};
use crate::error::{DashError, DashResult};

/// Projected candle geometry in plot-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_bullish: bool,
}

/// Projects candles into deterministic render geometry.
///
/// Candles are placed by their index in the slice, so callers pass the whole
/// normalized series in order.
pub fn project_candles(
    candles: &[Candle],
    time_scale: TimeScale,
    price_scale: PriceScale,
    plot: PlotArea,
    body_width_px: f64,
) -> DashResult<Vec<CandleGeometry>> {
    if !body_width_px.is_finite() || body_width_px <= 0.0 {
        return Err(DashError::InvalidData(
            "body width must be finite and > 0".to_owned(),
        ));
    }
    if !plot.is_valid() {
        return Err(DashError::InvalidData(
            "plot area must be finite and > 0".to_owned(),
        ));
    }

    #[cfg(feature = "parallel-projection")]
    {
        candles
            .par_iter()
            .enumerate()
            .map(|(index, candle)| {
                project_single_candle(index, *candle, time_scale, price_scale, plot, body_width_px)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        candles
            .iter()
            .enumerate()
            .map(|(index, candle)| {
                project_single_candle(index, *candle, time_scale, price_scale, plot, body_width_px)
            })
            .collect()
    }
}

fn project_single_candle(
    index: usize,
    candle: Candle,
    time_scale: TimeScale,
    price_scale: PriceScale,
    plot: PlotArea,
    body_width_px: f64,
) -> DashResult<CandleGeometry> {
    let half = body_width_px / 2.0;
    let center_x = time_scale.index_to_pixel(index, plot.width)?;
    let open_y = price_scale.price_to_pixel(candle.open, plot.height)?;
    let close_y = price_scale.price_to_pixel(candle.close, plot.height)?;
    let wick_top = price_scale.price_to_pixel(candle.high, plot.height)?;
    let wick_bottom = price_scale.price_to_pixel(candle.low, plot.height)?;

    Ok(CandleGeometry {
        center_x,
        body_left: center_x - half,
        body_right: center_x + half,
        body_top: open_y.min(close_y),
        body_bottom: open_y.max(close_y),
        wick_top,
        wick_bottom,
        is_bullish: candle.is_bullish(),
    })
}
