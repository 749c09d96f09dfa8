//! candle-dash: a BTC/USDT candlestick dashboard core.
//!
//! Candles flow from a [`data::CandleSource`] through [`crate::core::normalize`] into
//! a [`chart::ChartLifecycle`], which owns the rendering surface bound to a
//! host container. [`app::HomeView`] wires the pipeline together with the
//! fallback policy and the mock analysis panel.

pub mod analysis;
pub mod app;
pub mod chart;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use app::{DataOrigin, HomeView};
pub use chart::{ChartLifecycle, ChartOptions, PresentOutcome};
pub use config::DashboardConfig;
pub use crate::core::{Candle, CandleSeries, RawCandle, normalize};
pub use error::{DashError, DashResult};
