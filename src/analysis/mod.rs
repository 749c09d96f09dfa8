//! Mock "AI analysis": a delayed, cancellable task that yields canned text.

mod panel;
mod schedule;

pub use panel::{
    ANALYZE_BUTTON_LABEL, ANALYZING_BUTTON_LABEL, AnalysisMode, AnalysisOutcome, AnalysisPanel,
    AnalysisReport, AnalysisStart, DEFAULT_ANALYSIS_DELAY, RESULT_PLACEHOLDER,
};
pub use schedule::{OneShotScheduler, TaskTicket};
