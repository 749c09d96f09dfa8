mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::error::DashResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from chart lifecycle and data handling.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> DashResult<()>;

    /// Called when the surface width tracks a container resize.
    ///
    /// Backends that own a fixed-size target reallocate it here.
    fn resize(&mut self, _viewport: crate::core::Viewport) -> DashResult<()> {
        Ok(())
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
