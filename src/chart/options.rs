use serde::{Deserialize, Serialize};

use crate::core::ScaleMargins;
use crate::error::{DashError, DashResult};
use crate::render::Color;

/// Fixed chart height in pixels; only the width tracks the container.
pub const DEFAULT_CHART_HEIGHT: u32 = 500;

/// Palette for text and grid colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartTheme {
    Light,
    #[default]
    Dark,
}

impl ChartTheme {
    #[must_use]
    pub const fn text_color(self) -> Color {
        match self {
            Self::Light => Color::rgb8(0x02, 0x08, 0x17),
            Self::Dark => Color::rgb8(0xf8, 0xfa, 0xfc),
        }
    }

    #[must_use]
    pub const fn grid_color(self) -> Color {
        match self {
            Self::Light => Color::rgb8(0xe2, 0xe8, 0xf0),
            Self::Dark => Color::rgb8(0x1e, 0x29, 0x3b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub background: Color,
    pub text_color: Color,
    pub font_size_px: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::themed(ChartTheme::default())
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn themed(theme: ChartTheme) -> Self {
        Self {
            background: Color::TRANSPARENT,
            text_color: theme.text_color(),
            font_size_px: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub vert_lines: Color,
    pub horz_lines: Color,
    pub line_width: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::themed(ChartTheme::default())
    }
}

impl GridOptions {
    #[must_use]
    pub fn themed(theme: ChartTheme) -> Self {
        Self {
            vert_lines: theme.grid_color(),
            horz_lines: theme.grid_color(),
            line_width: 1.0,
        }
    }
}

/// Candle body, border and wick colors for rising and falling buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandlestickStyle {
    pub up_color: Color,
    pub down_color: Color,
    pub border_up_color: Color,
    pub border_down_color: Color,
    pub wick_up_color: Color,
    pub wick_down_color: Color,
    pub border_width: f64,
    pub wick_width: f64,
    /// Body width as a fraction of bar spacing.
    pub body_width_ratio: f64,
}

impl Default for CandlestickStyle {
    fn default() -> Self {
        let up = Color::rgb8(0x26, 0xa6, 0x9a);
        let down = Color::rgb8(0xef, 0x53, 0x50);
        Self {
            up_color: up,
            down_color: down,
            border_up_color: up,
            border_down_color: down,
            wick_up_color: up,
            wick_down_color: down,
            border_width: 1.0,
            wick_width: 1.0,
            body_width_ratio: 0.8,
        }
    }
}

impl CandlestickStyle {
    #[must_use]
    pub fn body_color(&self, bullish: bool) -> Color {
        if bullish { self.up_color } else { self.down_color }
    }

    #[must_use]
    pub fn border_color(&self, bullish: bool) -> Color {
        if bullish {
            self.border_up_color
        } else {
            self.border_down_color
        }
    }

    #[must_use]
    pub fn wick_color(&self, bullish: bool) -> Color {
        if bullish {
            self.wick_up_color
        } else {
            self.wick_down_color
        }
    }
}

/// Rendering surface configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub height: u32,
    pub layout: LayoutOptions,
    pub grid: GridOptions,
    pub candlestick: CandlestickStyle,
    pub price_margins: ScaleMargins,
    pub price_axis_width_px: f64,
    pub time_axis_height_px: f64,
    /// Minimum horizontal distance between time-axis labels.
    pub min_time_label_spacing_px: f64,
    pub price_tick_count: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_CHART_HEIGHT,
            layout: LayoutOptions::default(),
            grid: GridOptions::default(),
            candlestick: CandlestickStyle::default(),
            price_margins: ScaleMargins::default(),
            price_axis_width_px: 64.0,
            time_axis_height_px: 28.0,
            min_time_label_spacing_px: 80.0,
            price_tick_count: 6,
        }
    }
}

impl ChartOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        let background = self.layout.background;
        self.layout = LayoutOptions {
            background,
            ..LayoutOptions::themed(theme)
        };
        self.grid = GridOptions::themed(theme);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.layout.background = background;
        self
    }

    #[must_use]
    pub fn with_candlestick_style(mut self, style: CandlestickStyle) -> Self {
        self.candlestick = style;
        self
    }

    pub fn validate(self) -> DashResult<Self> {
        if self.height == 0 {
            return Err(DashError::InvalidData(
                "chart height must be > 0".to_owned(),
            ));
        }
        self.price_margins.validate()?;

        for color in [
            self.layout.background,
            self.layout.text_color,
            self.grid.vert_lines,
            self.grid.horz_lines,
            self.candlestick.up_color,
            self.candlestick.down_color,
            self.candlestick.border_up_color,
            self.candlestick.border_down_color,
            self.candlestick.wick_up_color,
            self.candlestick.wick_down_color,
        ] {
            color.validate()?;
        }

        for (name, value) in [
            ("font_size_px", self.layout.font_size_px),
            ("grid line_width", self.grid.line_width),
            ("wick_width", self.candlestick.wick_width),
            ("min_time_label_spacing_px", self.min_time_label_spacing_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DashError::InvalidData(format!(
                    "chart option `{name}` must be finite and > 0"
                )));
            }
        }

        for (name, value) in [
            ("border_width", self.candlestick.border_width),
            ("price_axis_width_px", self.price_axis_width_px),
            ("time_axis_height_px", self.time_axis_height_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DashError::InvalidData(format!(
                    "chart option `{name}` must be finite and >= 0"
                )));
            }
        }

        let ratio = self.candlestick.body_width_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(DashError::InvalidData(
                "candle body_width_ratio must be in (0, 1]".to_owned(),
            ));
        }
        if self.price_tick_count < 2 {
            return Err(DashError::InvalidData(
                "price_tick_count must be >= 2".to_owned(),
            ));
        }
        if f64::from(self.height) <= self.time_axis_height_px {
            return Err(DashError::InvalidData(
                "chart height must exceed the time axis height".to_owned(),
            ));
        }

        Ok(self)
    }
}
