//! GTK4 host: a `DrawingArea` acting as the chart container.

use std::cell::RefCell;
use std::rc::Weak;

use gtk4 as gtk;
use gtk::prelude::*;
use tracing::warn;

use crate::chart::{ChartContainer, ChartSurface, ResizeListener, ResizeSubscription};
use crate::render::{CairoContextRenderer, Renderer};

/// Wraps a `DrawingArea`; its allocated width drives the chart width.
#[derive(Debug, Clone)]
pub struct GtkChartContainer {
    area: gtk::DrawingArea,
}

impl GtkChartContainer {
    #[must_use]
    pub fn new(area: gtk::DrawingArea) -> Self {
        Self { area }
    }

    #[must_use]
    pub fn area(&self) -> &gtk::DrawingArea {
        &self.area
    }

    /// Draws the surface behind `surface` on every GTK draw callback.
    ///
    /// Holds only a weak handle, so an unmounted chart draws nothing.
    pub fn install_draw_handler<R>(&self, surface: Weak<RefCell<ChartSurface<R>>>)
    where
        R: Renderer + CairoContextRenderer + 'static,
    {
        self.area.set_draw_func(move |_, context, _, _| {
            let Some(surface) = surface.upgrade() else {
                return;
            };
            let mut surface = surface.borrow_mut();
            let drawn = surface.build_render_frame().and_then(|frame| {
                surface
                    .renderer_mut()
                    .render_on_cairo_context(context, &frame)
            });
            if let Err(err) = drawn {
                warn!(error = %err, "gtk chart draw failed");
            }
        });
        self.area.queue_draw();
    }
}

impl ChartContainer for GtkChartContainer {
    fn client_width(&self) -> Option<u32> {
        if !self.area.is_realized() {
            return None;
        }
        u32::try_from(self.area.width()).ok().filter(|width| *width > 0)
    }

    fn subscribe_resize(&self, listener: ResizeListener) -> ResizeSubscription {
        let listener = RefCell::new(listener);
        let handler = self.area.connect_resize(move |area, width, _| {
            if let Ok(width) = u32::try_from(width) {
                (listener.borrow_mut())(width);
                area.queue_draw();
            }
        });
        let area = self.area.downgrade();
        ResizeSubscription::new(move || {
            if let Some(area) = area.upgrade() {
                area.disconnect(handler);
            }
        })
    }
}
