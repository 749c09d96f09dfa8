//! Dashboard configuration, loaded from an optional JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{AnalysisMode, DEFAULT_ANALYSIS_DELAY};
use crate::chart::{ChartOptions, ChartTheme};
use crate::data::KlineQuery;
use crate::error::{DashError, DashResult};

/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub market: KlineQuery,
    /// `None` leaves the HTTP client's default in place.
    pub request_timeout_ms: Option<u64>,
    pub theme: ChartTheme,
    /// Explicit chart options; when absent the themed defaults are used.
    pub chart: Option<ChartOptions>,
    pub analysis_delay_ms: u64,
    pub analysis_mode: AnalysisMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            market: KlineQuery::default(),
            request_timeout_ms: None,
            theme: ChartTheme::default(),
            chart: None,
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY.as_millis() as u64,
            analysis_mode: AnalysisMode::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| DashError::Config(format!("failed to parse config: {e}")))?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashError::Config(format!("failed to serialize config: {e}")))
    }

    pub fn load(path: &Path) -> DashResult<Self> {
        let input = fs::read_to_string(path).map_err(|e| {
            DashError::Config(format!("failed to read config `{}`: {e}", path.display()))
        })?;
        let config = Self::from_json_str(&input)?;
        debug!(path = %path.display(), "dashboard config loaded");
        Ok(config)
    }

    pub fn validate(self) -> DashResult<Self> {
        let market = self.market.validate()?;
        if self.request_timeout_ms == Some(0) {
            return Err(DashError::Config(
                "request_timeout_ms must be > 0 when set".to_owned(),
            ));
        }
        if let Some(chart) = self.chart {
            chart
                .validate()
                .map_err(|e| DashError::Config(format!("chart options: {e}")))?;
        }
        Ok(Self { market, ..self })
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    #[must_use]
    pub fn chart_options(&self) -> ChartOptions {
        self.chart
            .unwrap_or_else(|| ChartOptions::new().with_theme(self.theme))
    }
}
