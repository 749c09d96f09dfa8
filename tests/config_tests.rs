use std::time::Duration;

use candle_dash::DashboardConfig;
use candle_dash::analysis::AnalysisMode;
use candle_dash::chart::{ChartOptions, ChartTheme};
use candle_dash::data::DEFAULT_KLINES_ENDPOINT;
use candle_dash::error::DashError;

#[test]
fn empty_json_yields_defaults() {
    let config = DashboardConfig::from_json_str("{}").expect("config");
    assert_eq!(config, DashboardConfig::default());
    assert_eq!(config.market.endpoint, DEFAULT_KLINES_ENDPOINT);
    assert_eq!(config.market.limit, 150);
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.analysis_delay(), Duration::from_millis(1500));
    assert_eq!(config.chart_options(), ChartOptions::new());
}

#[test]
fn json_overrides_selected_fields() {
    let config = DashboardConfig::from_json_str(
        r#"{
            "market": { "symbol": "ETHUSDT", "limit": 90 },
            "request_timeout_ms": 2500,
            "theme": "light",
            "analysis_mode": "ultra"
        }"#,
    )
    .expect("config");

    assert_eq!(config.market.symbol, "ETHUSDT");
    assert_eq!(config.market.interval, "1d");
    assert_eq!(config.market.limit, 90);
    assert_eq!(config.request_timeout(), Some(Duration::from_millis(2500)));
    assert_eq!(config.analysis_mode, AnalysisMode::Ultra);
    assert_eq!(
        config.chart_options(),
        ChartOptions::new().with_theme(ChartTheme::Light)
    );
}

#[test]
fn out_of_range_limit_is_rejected() {
    for limit in [0, 151] {
        let input = format!(r#"{{ "market": {{ "limit": {limit} }} }}"#);
        let err = DashboardConfig::from_json_str(&input).expect_err("limit");
        assert!(matches!(err, DashError::Config(_)), "{limit}: {err:?}");
    }
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = DashboardConfig::from_json_str("{ market: }").expect_err("syntax");
    assert!(matches!(err, DashError::Config(_)));
}

#[test]
fn invalid_chart_options_are_rejected() {
    let err = DashboardConfig::from_json_str(r#"{ "chart": { "height": 0 } }"#)
        .expect_err("zero height");
    assert!(matches!(err, DashError::Config(_)));
}

#[test]
fn config_round_trips_through_pretty_json() {
    let config = DashboardConfig {
        request_timeout_ms: Some(1000),
        ..DashboardConfig::default()
    };
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(DashboardConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn missing_file_is_reported() {
    let err = DashboardConfig::load(std::path::Path::new("/nonexistent/candle-dash.json"))
        .expect_err("missing");
    assert!(matches!(err, DashError::Config(_)));
}
