use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{OneShotScheduler, TaskTicket};

pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(1500);

pub const ANALYZE_BUTTON_LABEL: &str = "Analyze Chart";
pub const ANALYZING_BUTTON_LABEL: &str = "Analyzing...";
pub const RESULT_PLACEHOLDER: &str = "Click \"Analyze Chart\" to see the AI's insights.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Normal,
    Ultra,
}

impl AnalysisMode {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal (Flash)",
            Self::Ultra => "Ultra (Pro)",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canned trade signal. The text is fixed; no market data is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub mode: AnalysisMode,
    pub summary: &'static str,
    pub entry_price: &'static str,
    pub take_profit: &'static str,
    pub stop_loss: &'static str,
}

impl AnalysisReport {
    #[must_use]
    pub const fn canned(mode: AnalysisMode) -> Self {
        Self {
            mode,
            summary: "Based on the multi-timeframe analysis, the current market structure for \
                      BTC/USDT appears to be consolidating within a bullish trend. Key support \
                      is identified near the $67,000 level, with resistance at $72,000.",
            entry_price: "$68,000 - $68,500",
            take_profit: "$72,000",
            stop_loss: "$67,000",
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        writeln!(f, "Entry Price: {}", self.entry_price)?;
        writeln!(f, "Take Profit: {}", self.take_profit)?;
        write!(f, "Stop Loss: {}", self.stop_loss)
    }
}

/// Result of [`AnalysisPanel::analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStart {
    pub ticket: TaskTicket,
    /// Run that was still in flight and has been discarded.
    pub cancelled: Option<TaskTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed {
        ticket: TaskTicket,
        report: AnalysisReport,
    },
    Cancelled {
        ticket: TaskTicket,
    },
}

/// Mock analysis panel state: mode toggle, loading flag and the last report.
#[derive(Debug)]
pub struct AnalysisPanel {
    mode: AnalysisMode,
    delay: Duration,
    scheduler: OneShotScheduler<AnalysisMode>,
    result: Option<AnalysisReport>,
    /// Superseded or cancelled runs not yet reported, oldest first.
    cancelled: VecDeque<TaskTicket>,
}

impl Default for AnalysisPanel {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_DELAY)
    }
}

impl AnalysisPanel {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            mode: AnalysisMode::default(),
            delay,
            scheduler: OneShotScheduler::new(),
            result: None,
            cancelled: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Takes effect on the next `analyze`; a run in flight keeps its mode.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts a run. The previous result is hidden and any in-flight run is
    /// cancelled, so its report can never be shown.
    pub fn analyze(&mut self, now: Instant) -> AnalysisStart {
        self.result = None;
        let (ticket, cancelled) = self.scheduler.schedule(now, self.delay, self.mode);
        self.cancelled.extend(cancelled);
        debug!(
            ticket = ticket.id(),
            mode = %self.mode,
            delay_ms = self.delay.as_millis() as u64,
            "analysis started"
        );
        AnalysisStart { ticket, cancelled }
    }

    /// Drops the in-flight run; reported as cancelled by a later `poll`.
    pub fn cancel(&mut self) -> Option<TaskTicket> {
        let ticket = self.scheduler.cancel()?;
        self.cancelled.push_back(ticket);
        debug!(ticket = ticket.id(), "analysis cancelled");
        Some(ticket)
    }

    /// Advances the panel to `now`. Pending cancellations are reported first,
    /// one per call, in the order they happened.
    pub fn poll(&mut self, now: Instant) -> Option<AnalysisOutcome> {
        if let Some(ticket) = self.cancelled.pop_front() {
            return Some(AnalysisOutcome::Cancelled { ticket });
        }
        let (ticket, mode) = self.scheduler.poll(now)?;
        let report = AnalysisReport::canned(mode);
        self.result = Some(report.clone());
        debug!(ticket = ticket.id(), %mode, "analysis completed");
        Some(AnalysisOutcome::Completed { ticket, report })
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.scheduler.is_pending()
    }

    #[must_use]
    pub fn due_at(&self) -> Option<Instant> {
        self.scheduler.due_at()
    }

    #[must_use]
    pub fn result(&self) -> Option<&AnalysisReport> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.is_loading() {
            ANALYZING_BUTTON_LABEL
        } else {
            ANALYZE_BUTTON_LABEL
        }
    }

    /// Placeholder text, shown only when idle without a result.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        (!self.is_loading() && self.result.is_none()).then_some(RESULT_PLACEHOLDER)
    }
}
