use tracing::{debug, trace};

use crate::chart::ChartOptions;
use crate::chart::axis::{format_price, price_ticks, time_label};
use crate::core::{CandleSeries, PlotArea, PriceScale, TimeScale, Viewport, project_candles};
use crate::error::{DashError, DashResult};
use crate::render::{LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive};

const MIN_PLOT_EXTENT_PX: f64 = 1.0;
const MIN_BODY_WIDTH_PX: f64 = 1.0;
const LABEL_PADDING_PX: f64 = 6.0;

/// Rendering surface bound to one mounted chart view.
///
/// Owns the backend renderer plus everything needed to rebuild a frame: the
/// options, the current viewport, the candle data and the fitted scales.
#[derive(Debug)]
pub struct ChartSurface<R: Renderer> {
    renderer: R,
    options: ChartOptions,
    viewport: Viewport,
    candles: CandleSeries,
    time_scale: Option<TimeScale>,
    price_scale: Option<PriceScale>,
}

impl<R: Renderer> ChartSurface<R> {
    pub fn new(renderer: R, options: ChartOptions, width: u32) -> DashResult<Self> {
        let options = options.validate()?;
        let viewport = Viewport::new(width, options.height);
        if !viewport.is_valid() {
            return Err(DashError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self {
            renderer,
            options,
            viewport,
            candles: CandleSeries::empty(),
            time_scale: None,
            price_scale: None,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    #[must_use]
    pub fn candles(&self) -> &CandleSeries {
        &self.candles
    }

    #[must_use]
    pub fn time_scale(&self) -> Option<TimeScale> {
        self.time_scale
    }

    #[must_use]
    pub fn price_scale(&self) -> Option<PriceScale> {
        self.price_scale
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Replaces the candle data wholesale. Scales keep their previous fit
    /// until [`Self::fit_content`] runs.
    pub fn set_data(&mut self, candles: &CandleSeries) {
        debug!(
            previous_count = self.candles.len(),
            candle_count = candles.len(),
            "set surface data"
        );
        self.candles = candles.clone();
    }

    /// Fits both scales so every candle is visible.
    pub fn fit_content(&mut self) -> DashResult<()> {
        if self.candles.is_empty() {
            self.time_scale = None;
            self.price_scale = None;
            return Ok(());
        }
        self.time_scale = Some(TimeScale::fit_content(self.candles.len())?);
        self.price_scale = Some(PriceScale::fit_candles(
            self.candles.as_slice(),
            self.options.price_margins,
        )?);
        Ok(())
    }

    /// Tracks a container width; height stays fixed.
    ///
    /// Returns `false` when the width is unchanged or zero (hidden container).
    pub fn apply_width(&mut self, width: u32) -> DashResult<bool> {
        if width == 0 || width == self.viewport.width {
            trace!(width, "surface width unchanged");
            return Ok(false);
        }
        let viewport = self.viewport.with_width(width);
        self.renderer.resize(viewport)?;
        debug!(
            from = self.viewport.width,
            to = width,
            "surface width updated"
        );
        self.viewport = viewport;
        Ok(true)
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        PlotArea::new(
            (f64::from(self.viewport.width) - self.options.price_axis_width_px)
                .max(MIN_PLOT_EXTENT_PX),
            (f64::from(self.viewport.height) - self.options.time_axis_height_px)
                .max(MIN_PLOT_EXTENT_PX),
        )
    }

    pub fn build_render_frame(&self) -> DashResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.viewport).with_background(self.options.layout.background);
        let (Some(time_scale), Some(price_scale)) = (self.time_scale, self.price_scale) else {
            return Ok(frame);
        };
        if self.candles.is_empty() {
            return Ok(frame);
        }

        let plot = self.plot_area();
        self.append_price_axis(&mut frame, price_scale, plot)?;
        self.append_time_axis(&mut frame, time_scale, plot)?;
        self.append_axis_borders(&mut frame, plot);
        self.append_candles(&mut frame, time_scale, price_scale, plot)?;
        Ok(frame)
    }

    pub fn render(&mut self) -> DashResult<()> {
        let frame = self.build_render_frame()?;
        trace!(
            lines = frame.lines.len(),
            rects = frame.rects.len(),
            texts = frame.texts.len(),
            "render chart surface"
        );
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn append_price_axis(
        &self,
        frame: &mut RenderFrame,
        price_scale: PriceScale,
        plot: PlotArea,
    ) -> DashResult<()> {
        let visible_max = price_scale.pixel_to_price(0.0, plot.height)?;
        let visible_min = price_scale.pixel_to_price(plot.height, plot.height)?;
        let (ticks, decimals) = price_ticks(visible_min, visible_max, self.options.price_tick_count);
        let layout = self.options.layout;
        let grid = self.options.grid;

        for tick in ticks {
            let y = price_scale.price_to_pixel(tick, plot.height)?;
            frame.lines.push(LinePrimitive::new(
                0.0,
                y,
                plot.width,
                y,
                grid.line_width,
                grid.horz_lines,
            ));
            frame.texts.push(TextPrimitive::new(
                format_price(tick, decimals),
                plot.width + LABEL_PADDING_PX,
                y - layout.font_size_px * 0.6,
                layout.font_size_px,
                layout.text_color,
                TextHAlign::Left,
            ));
        }
        Ok(())
    }

    fn append_time_axis(
        &self,
        frame: &mut RenderFrame,
        time_scale: TimeScale,
        plot: PlotArea,
    ) -> DashResult<()> {
        let spacing = time_scale.bar_spacing(plot.width);
        let stride = (self.options.min_time_label_spacing_px / spacing).ceil().max(1.0) as usize;
        let layout = self.options.layout;
        let grid = self.options.grid;

        for (index, candle) in self.candles.iter().enumerate().step_by(stride) {
            let x = time_scale.index_to_pixel(index, plot.width)?;
            frame.lines.push(LinePrimitive::new(
                x,
                0.0,
                x,
                plot.height,
                grid.line_width,
                grid.vert_lines,
            ));
            if let Some(label) = time_label(candle.time) {
                frame.texts.push(TextPrimitive::new(
                    label,
                    x,
                    plot.height + LABEL_PADDING_PX,
                    layout.font_size_px,
                    layout.text_color,
                    TextHAlign::Center,
                ));
            }
        }
        Ok(())
    }

    fn append_axis_borders(&self, frame: &mut RenderFrame, plot: PlotArea) {
        let grid = self.options.grid;
        frame.lines.push(LinePrimitive::new(
            plot.width,
            0.0,
            plot.width,
            plot.height,
            grid.line_width,
            grid.horz_lines,
        ));
        frame.lines.push(LinePrimitive::new(
            0.0,
            plot.height,
            plot.width,
            plot.height,
            grid.line_width,
            grid.vert_lines,
        ));
    }

    fn append_candles(
        &self,
        frame: &mut RenderFrame,
        time_scale: TimeScale,
        price_scale: PriceScale,
        plot: PlotArea,
    ) -> DashResult<()> {
        let style = self.options.candlestick;
        let body_width =
            (time_scale.bar_spacing(plot.width) * style.body_width_ratio).max(MIN_BODY_WIDTH_PX);
        let geometries = project_candles(
            self.candles.as_slice(),
            time_scale,
            price_scale,
            plot,
            body_width,
        )?;

        for candle in geometries {
            frame.lines.push(LinePrimitive::new(
                candle.center_x,
                candle.wick_top,
                candle.center_x,
                candle.wick_bottom,
                style.wick_width,
                style.wick_color(candle.is_bullish),
            ));

            let mut body = RectPrimitive::new(
                candle.body_left,
                candle.body_top,
                candle.body_right - candle.body_left,
                (candle.body_bottom - candle.body_top).max(MIN_BODY_WIDTH_PX),
                style.body_color(candle.is_bullish),
            );
            if style.border_width > 0.0 {
                body = body.with_border(style.border_width, style.border_color(candle.is_bullish));
            }
            frame.rects.push(body);
        }
        Ok(())
    }
}
