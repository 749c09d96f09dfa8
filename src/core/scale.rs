use serde::{Deserialize, Serialize};

use crate::core::Candle;
use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> DashResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(DashError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Maps `value` onto `[0, extent_px]`.
    pub fn domain_to_pixel(self, value: f64, extent_px: f64) -> DashResult<f64> {
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(DashError::InvalidData(
                "pixel extent must be finite and > 0".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(DashError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * extent_px)
    }

    pub fn pixel_to_domain(self, pixel: f64, extent_px: f64) -> DashResult<f64> {
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(DashError::InvalidData(
                "pixel extent must be finite and > 0".to_owned(),
            ));
        }
        if !pixel.is_finite() {
            return Err(DashError::InvalidData("pixel must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        Ok(self.domain_start + (pixel / extent_px) * span)
    }
}

/// Horizontal axis over logical bar indices.
///
/// Bars are spaced evenly regardless of calendar gaps; index `i` sits at the
/// centre of its slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    scale: LinearScale,
}

impl TimeScale {
    /// Visible logical range covering every bar with half a slot of padding on
    /// each side.
    pub fn fit_content(bar_count: usize) -> DashResult<Self> {
        if bar_count == 0 {
            return Err(DashError::InvalidData(
                "time scale cannot be fit to empty data".to_owned(),
            ));
        }
        Ok(Self {
            scale: LinearScale::new(-0.5, bar_count as f64 - 0.5)?,
        })
    }

    #[must_use]
    pub fn visible_logical_range(self) -> (f64, f64) {
        self.scale.domain()
    }

    pub fn index_to_pixel(self, index: usize, plot_width: f64) -> DashResult<f64> {
        self.scale.domain_to_pixel(index as f64, plot_width)
    }

    /// Pixel distance between neighbouring bar centres.
    #[must_use]
    pub fn bar_spacing(self, plot_width: f64) -> f64 {
        let (start, end) = self.scale.domain();
        plot_width / (end - start)
    }
}

/// Fraction of the plot height kept empty above and below the price range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl Default for ScaleMargins {
    fn default() -> Self {
        Self {
            top: 0.2,
            bottom: 0.1,
        }
    }
}

impl ScaleMargins {
    pub fn validate(self) -> DashResult<Self> {
        if !self.top.is_finite()
            || !self.bottom.is_finite()
            || self.top < 0.0
            || self.bottom < 0.0
            || self.top + self.bottom >= 1.0
        {
            return Err(DashError::InvalidData(
                "scale margins must be finite, >= 0 and sum to < 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Vertical price axis; larger prices map to smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    scale: LinearScale,
    margins: ScaleMargins,
}

impl PriceScale {
    pub fn new(price_min: f64, price_max: f64, margins: ScaleMargins) -> DashResult<Self> {
        let margins = margins.validate()?;
        let (price_min, price_max) = widen_flat_range(price_min, price_max);
        Ok(Self {
            scale: LinearScale::new(price_min, price_max)?,
            margins,
        })
    }

    /// Fits the domain to the lowest low and highest high.
    pub fn fit_candles(candles: &[Candle], margins: ScaleMargins) -> DashResult<Self> {
        if candles.is_empty() {
            return Err(DashError::InvalidData(
                "price scale cannot be fit to empty data".to_owned(),
            ));
        }
        let (min, max) = candles
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), candle| {
                (min.min(candle.low), max.max(candle.high))
            });
        Self::new(min, max, margins)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.scale.domain()
    }

    pub fn price_to_pixel(self, price: f64, plot_height: f64) -> DashResult<f64> {
        let top = plot_height * self.margins.top;
        let usable = plot_height * (1.0 - self.margins.top - self.margins.bottom);
        let from_bottom = self.scale.domain_to_pixel(price, usable)?;
        Ok(top + usable - from_bottom)
    }

    pub fn pixel_to_price(self, pixel: f64, plot_height: f64) -> DashResult<f64> {
        let top = plot_height * self.margins.top;
        let usable = plot_height * (1.0 - self.margins.top - self.margins.bottom);
        self.scale.pixel_to_domain(top + usable - pixel, usable)
    }
}

fn widen_flat_range(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        return (min, max);
    }
    let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.01 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{PriceScale, ScaleMargins, TimeScale};
    use crate::core::Candle;

    #[test]
    fn fit_content_centres_bars_in_their_slots() {
        let scale = TimeScale::fit_content(4).expect("fit");
        assert_eq!(scale.visible_logical_range(), (-0.5, 3.5));
        assert_relative_eq!(scale.bar_spacing(400.0), 100.0);
        assert_relative_eq!(scale.index_to_pixel(0, 400.0).expect("px"), 50.0);
        assert_relative_eq!(scale.index_to_pixel(3, 400.0).expect("px"), 350.0);
    }

    #[test]
    fn price_scale_inverts_and_applies_margins() {
        let margins = ScaleMargins {
            top: 0.2,
            bottom: 0.1,
        };
        let scale = PriceScale::new(100.0, 200.0, margins).expect("scale");
        assert_relative_eq!(scale.price_to_pixel(200.0, 100.0).expect("px"), 20.0);
        assert_relative_eq!(scale.price_to_pixel(100.0, 100.0).expect("px"), 90.0);
        assert_relative_eq!(scale.pixel_to_price(55.0, 100.0).expect("price"), 150.0);
    }

    #[test]
    fn flat_price_range_is_widened() {
        let candles = [Candle::new(1, 5.0, 5.0, 5.0, 5.0)];
        let scale = PriceScale::fit_candles(&candles, ScaleMargins::default()).expect("scale");
        let (min, max) = scale.domain();
        assert!(min < 5.0 && max > 5.0);
    }
}
