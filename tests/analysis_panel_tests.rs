use std::time::{Duration, Instant};

use candle_dash::analysis::{
    ANALYZE_BUTTON_LABEL, ANALYZING_BUTTON_LABEL, AnalysisMode, AnalysisOutcome, AnalysisPanel,
    AnalysisReport, RESULT_PLACEHOLDER,
};

const DELAY: Duration = Duration::from_millis(1500);

#[test]
fn idle_panel_shows_placeholder() {
    let panel = AnalysisPanel::default();
    assert_eq!(panel.delay(), DELAY);
    assert!(!panel.is_loading());
    assert_eq!(panel.button_label(), ANALYZE_BUTTON_LABEL);
    assert_eq!(panel.placeholder(), Some(RESULT_PLACEHOLDER));
    assert!(panel.result().is_none());
}

#[test]
fn report_arrives_only_after_delay() {
    let mut panel = AnalysisPanel::new(DELAY);
    let start = Instant::now();
    let run = panel.analyze(start);
    assert!(run.cancelled.is_none());
    assert!(panel.is_loading());
    assert_eq!(panel.button_label(), ANALYZING_BUTTON_LABEL);
    assert_eq!(panel.placeholder(), None);

    assert!(panel.poll(start + Duration::from_millis(1000)).is_none());
    let outcome = panel.poll(start + DELAY).expect("completed");
    assert_eq!(
        outcome,
        AnalysisOutcome::Completed {
            ticket: run.ticket,
            report: AnalysisReport::canned(AnalysisMode::Normal),
        }
    );
    assert!(!panel.is_loading());
    assert_eq!(panel.result().map(|report| report.take_profit), Some("$72,000"));
}

#[test]
fn reanalyzing_cancels_the_previous_run() {
    let mut panel = AnalysisPanel::new(DELAY);
    let start = Instant::now();
    let first = panel.analyze(start);
    let second = panel.analyze(start + Duration::from_millis(1000));
    assert_eq!(second.cancelled, Some(first.ticket));

    // the first deadline passes without producing a result
    assert_eq!(
        panel.poll(start + DELAY),
        Some(AnalysisOutcome::Cancelled {
            ticket: first.ticket
        })
    );
    assert!(panel.poll(start + DELAY).is_none());
    assert!(panel.result().is_none());

    match panel.poll(start + Duration::from_millis(2500)) {
        Some(AnalysisOutcome::Completed { ticket, .. }) => assert_eq!(ticket, second.ticket),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn cancel_reports_cancelled_outcome() {
    let mut panel = AnalysisPanel::new(DELAY);
    let start = Instant::now();
    let run = panel.analyze(start);

    assert_eq!(panel.cancel(), Some(run.ticket));
    assert!(!panel.is_loading());
    assert_eq!(
        panel.poll(start + DELAY),
        Some(AnalysisOutcome::Cancelled { ticket: run.ticket })
    );
    assert!(panel.poll(start + DELAY * 2).is_none());
    assert_eq!(panel.cancel(), None);
}

#[test]
fn mode_is_captured_when_the_run_starts() {
    let mut panel = AnalysisPanel::new(DELAY);
    panel.set_mode(AnalysisMode::Ultra);
    let start = Instant::now();
    panel.analyze(start);
    panel.set_mode(AnalysisMode::Normal);

    let Some(AnalysisOutcome::Completed { report, .. }) = panel.poll(start + DELAY) else {
        panic!("expected completion");
    };
    assert_eq!(report.mode, AnalysisMode::Ultra);
    assert_eq!(report.mode.label(), "Ultra (Pro)");
}

#[test]
fn canned_report_lists_trade_levels() {
    let text = AnalysisReport::canned(AnalysisMode::Normal).to_string();
    assert!(text.contains("Entry Price: $68,000 - $68,500"));
    assert!(text.contains("Take Profit: $72,000"));
    assert!(text.contains("Stop Loss: $67,000"));
    assert!(text.starts_with("Based on the multi-timeframe analysis"));
}

#[test]
fn every_superseded_run_is_reported_in_order() {
    let mut panel = AnalysisPanel::new(DELAY);
    let start = Instant::now();
    let first = panel.analyze(start);
    let second = panel.analyze(start);
    let third = panel.analyze(start);
    assert_eq!(third.cancelled, Some(second.ticket));

    let mut outcomes = Vec::new();
    while let Some(outcome) = panel.poll(start + DELAY) {
        outcomes.push(outcome);
    }

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0],
        AnalysisOutcome::Cancelled {
            ticket: first.ticket
        }
    );
    assert_eq!(
        outcomes[1],
        AnalysisOutcome::Cancelled {
            ticket: second.ticket
        }
    );
    assert!(matches!(
        outcomes[2],
        AnalysisOutcome::Completed { ticket, .. } if ticket == third.ticket
    ));
}
