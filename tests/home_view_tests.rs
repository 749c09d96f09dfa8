use std::cell::Cell;
use std::time::{Duration, Instant};

use candle_dash::analysis::{AnalysisOutcome, AnalysisPanel};
use candle_dash::app::{
    DataOrigin, HomeView, LOAD_FAILURE_MESSAGE, LoadState, NotificationLevel, RecordingNotifier,
};
use candle_dash::chart::{ChartLifecycle, ChartOptions, HeadlessContainer, PresentOutcome};
use candle_dash::core::{Candle, Viewport};
use candle_dash::data::{CandleSource, StaticCandleSource, fallback_candles};
use candle_dash::error::{DashError, DashResult};
use candle_dash::render::NullRenderer;

struct FailingSource {
    calls: Cell<usize>,
    error: fn() -> DashError,
}

impl CandleSource for FailingSource {
    fn fetch_candles(&self) -> DashResult<Vec<Candle>> {
        self.calls.set(self.calls.get() + 1);
        Err((self.error)())
    }
}

fn network_down() -> DashError {
    DashError::Network("connection refused".to_owned())
}

fn bad_payload() -> DashError {
    DashError::Format("kline payload must be an array".to_owned())
}

fn null_factory(_viewport: Viewport) -> DashResult<NullRenderer> {
    Ok(NullRenderer::default())
}

#[test]
fn view_starts_loading_without_presenting() {
    let notifier = RecordingNotifier::new();
    let home = HomeView::new(StaticCandleSource::default(), notifier, AnalysisPanel::default());
    let container = HeadlessContainer::attached(800);
    let mut chart = ChartLifecycle::new(container, ChartOptions::new(), null_factory);

    assert!(home.is_loading());
    assert_eq!(home.sync_chart(&mut chart), None);
    assert_eq!(chart.surfaces_created(), 0);
}

#[test]
fn live_data_is_normalized_before_presenting() {
    let notifier = RecordingNotifier::new();
    let source = StaticCandleSource::new(vec![
        Candle::new(2, 10.0, 12.0, 9.0, 11.0),
        Candle::new(1, 5.0, 6.0, 4.0, 5.5),
        Candle::new(1, 7.0, 8.0, 6.0, 7.5),
        Candle::new(3, f64::NAN, 8.0, 6.0, 7.5),
    ]);
    let mut home = HomeView::new(source, notifier.clone(), AnalysisPanel::default());

    assert_eq!(home.load(), DataOrigin::Live);
    let series = home.chart_series().expect("ready");
    assert_eq!(series.len(), 2);
    assert_eq!(series.first().map(|candle| candle.open), Some(5.0));
    assert!(notifier.notifications().is_empty());
}

#[test]
fn network_failure_falls_back_with_single_warning() {
    let notifier = RecordingNotifier::new();
    let source = FailingSource {
        calls: Cell::new(0),
        error: network_down,
    };
    let mut home = HomeView::new(&source, notifier.clone(), AnalysisPanel::default());

    assert_eq!(home.load(), DataOrigin::Fallback);
    assert_eq!(home.origin(), Some(DataOrigin::Fallback));
    assert_eq!(source.calls.get(), 1);

    let LoadState::Ready { series, origin } = home.state() else {
        panic!("expected ready state");
    };
    assert_eq!(*origin, DataOrigin::Fallback);
    assert_eq!(series.as_slice(), fallback_candles().as_slice());

    let notifications = notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Warning);
    assert_eq!(notifications[0].message, LOAD_FAILURE_MESSAGE);
}

#[test]
fn format_failure_is_handled_like_network_failure() {
    let notifier = RecordingNotifier::new();
    let source = FailingSource {
        calls: Cell::new(0),
        error: bad_payload,
    };
    let mut home = HomeView::new(source, notifier.clone(), AnalysisPanel::default());

    assert_eq!(home.load(), DataOrigin::Fallback);
    assert_eq!(notifier.count(NotificationLevel::Warning), 1);
}

#[test]
fn fallback_series_reaches_the_chart() {
    let notifier = RecordingNotifier::new();
    let source = FailingSource {
        calls: Cell::new(0),
        error: network_down,
    };
    let mut home = HomeView::new(source, notifier, AnalysisPanel::default());
    let container = HeadlessContainer::attached(800);
    let mut chart = ChartLifecycle::new(container, ChartOptions::new(), null_factory);

    home.load();
    assert_eq!(home.sync_chart(&mut chart), Some(PresentOutcome::Created));
    assert_eq!(
        chart.with_surface(|surface| surface.candles().len()),
        Some(fallback_candles().len())
    );

    home.load();
    assert_eq!(home.sync_chart(&mut chart), Some(PresentOutcome::Unchanged));
}

#[test]
fn empty_live_data_shows_placeholder() {
    let notifier = RecordingNotifier::new();
    let mut home = HomeView::new(StaticCandleSource::default(), notifier.clone(), AnalysisPanel::default());
    let container = HeadlessContainer::attached(800);
    let mut chart = ChartLifecycle::new(container, ChartOptions::new(), null_factory);

    assert_eq!(home.load(), DataOrigin::Live);
    assert_eq!(home.sync_chart(&mut chart), Some(PresentOutcome::Placeholder));
    assert!(notifier.notifications().is_empty());
}

#[test]
fn analysis_runs_alongside_the_chart() {
    let notifier = RecordingNotifier::new();
    let mut home = HomeView::new(
        StaticCandleSource::fallback(),
        notifier,
        AnalysisPanel::new(Duration::from_millis(1500)),
    );
    home.load();

    let start = Instant::now();
    let run = home.analyze(start);
    assert!(home.poll_analysis(start + Duration::from_millis(1499)).is_none());
    match home.poll_analysis(start + Duration::from_millis(1500)) {
        Some(AnalysisOutcome::Completed { ticket, .. }) => assert_eq!(ticket, run.ticket),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
