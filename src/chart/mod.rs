//! Chart view: options, the rendering surface and its lifecycle.
//!
//! Data flows `CandleSeries` → [`ChartLifecycle::present`] → [`ChartSurface`]
//! → [`crate::render::Renderer`]. Container resize events reach the surface
//! only through the subscription the lifecycle holds.

pub mod axis;
mod container;
mod lifecycle;
mod options;
mod surface;

pub use container::{ChartContainer, HeadlessContainer, ResizeListener, ResizeSubscription};
pub use lifecycle::{
    ChartLifecycle, ChartPhase, NO_DATA_PLACEHOLDER, PresentOutcome, SharedSurface,
    SurfaceFactory,
};
pub use options::{
    CandlestickStyle, ChartOptions, ChartTheme, DEFAULT_CHART_HEIGHT, GridOptions, LayoutOptions,
};
pub use surface::ChartSurface;
