use std::time::Instant;

use tracing::{error, info};

use crate::analysis::{AnalysisOutcome, AnalysisPanel, AnalysisStart};
use crate::app::{LOAD_FAILURE_MESSAGE, Notification, Notifier};
use crate::chart::{ChartContainer, ChartLifecycle, PresentOutcome, SurfaceFactory};
use crate::core::{CandleSeries, normalize};
use crate::data::{CandleSource, fallback_candles};
use crate::error::DashError;

pub const CHART_TITLE: &str = "BTC/USDT Chart";

/// Where the presented candles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No fetch has completed yet; the chart area shows a loading skeleton.
    Loading,
    Ready {
        series: CandleSeries,
        origin: DataOrigin,
    },
}

/// The home page: one candle fetch feeding the chart, plus the analysis panel.
pub struct HomeView<S, N> {
    source: S,
    notifier: N,
    state: LoadState,
    analysis: AnalysisPanel,
}

impl<S: CandleSource, N: Notifier> HomeView<S, N> {
    #[must_use]
    pub fn new(source: S, notifier: N, analysis: AnalysisPanel) -> Self {
        Self {
            source,
            notifier,
            state: LoadState::Loading,
            analysis,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    #[must_use]
    pub fn chart_series(&self) -> Option<&CandleSeries> {
        match &self.state {
            LoadState::Ready { series, .. } => Some(series),
            LoadState::Loading => None,
        }
    }

    #[must_use]
    pub fn origin(&self) -> Option<DataOrigin> {
        match self.state {
            LoadState::Ready { origin, .. } => Some(origin),
            LoadState::Loading => None,
        }
    }

    /// Fetches once and replaces the previous series wholesale.
    ///
    /// A failing source is logged, swapped for the fallback dataset and
    /// reported through exactly one warning notification.
    pub fn load(&mut self) -> DataOrigin {
        self.state = LoadState::Loading;
        let (series, origin) = match self.source.fetch_candles() {
            Ok(raw) => {
                let series = normalize(raw);
                info!(candle_count = series.len(), "chart data loaded");
                (series, DataOrigin::Live)
            }
            Err(err) => {
                self.report_failure(&err);
                (normalize(fallback_candles()), DataOrigin::Fallback)
            }
        };
        self.state = LoadState::Ready { series, origin };
        origin
    }

    /// Presents the loaded series; does nothing while still loading.
    pub fn sync_chart<C, F>(&self, chart: &mut ChartLifecycle<C, F>) -> Option<PresentOutcome>
    where
        C: ChartContainer,
        F: SurfaceFactory,
    {
        self.chart_series().map(|series| chart.present(series))
    }

    #[must_use]
    pub fn analysis(&self) -> &AnalysisPanel {
        &self.analysis
    }

    pub fn analysis_mut(&mut self) -> &mut AnalysisPanel {
        &mut self.analysis
    }

    pub fn analyze(&mut self, now: Instant) -> AnalysisStart {
        self.analysis.analyze(now)
    }

    pub fn poll_analysis(&mut self, now: Instant) -> Option<AnalysisOutcome> {
        self.analysis.poll(now)
    }

    fn report_failure(&self, err: &DashError) {
        error!(
            error = %err,
            source_failure = err.is_source_failure(),
            "error fetching chart data; using fallback dataset"
        );
        self.notifier.notify(Notification::warning(LOAD_FAILURE_MESSAGE));
    }
}
