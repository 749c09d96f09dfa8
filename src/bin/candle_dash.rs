use std::path::PathBuf;
use std::time::Instant;

use candle_dash::{DashError, DashboardConfig};
use candle_dash::analysis::{AnalysisMode, AnalysisOutcome, AnalysisPanel};
use candle_dash::app::{CHART_TITLE, HomeView, TracingNotifier};
use candle_dash::chart::{ChartLifecycle, HeadlessContainer, PresentOutcome};
use candle_dash::core::Viewport;
use candle_dash::data::{BinanceKlineSource, CandleSource, StaticCandleSource};
use candle_dash::render::NullRenderer;

const USAGE: &str = "usage: candle-dash [--config <path>] [--width <px>] [--mode <normal|ultra>] [--offline] [--png <path>]";
const DEFAULT_WIDTH: u32 = 1024;

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    width: Option<u32>,
    mode: Option<AnalysisMode>,
    offline: bool,
    png: Option<PathBuf>,
}

fn main() {
    let _ = candle_dash::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => DashboardConfig::load(path).map_err(|err| err.to_string())?,
        None => DashboardConfig::default(),
    };

    let source: Box<dyn CandleSource> = if args.offline {
        Box::new(StaticCandleSource::fallback())
    } else {
        Box::new(
            BinanceKlineSource::new(config.market.clone(), config.request_timeout())
                .map_err(|err| err.to_string())?,
        )
    };

    let analysis = AnalysisPanel::new(config.analysis_delay());
    let mut home = HomeView::new(source, TracingNotifier, analysis);
    home.analysis_mut()
        .set_mode(args.mode.unwrap_or(config.analysis_mode));

    let origin = home.load();
    let candle_count = home.chart_series().map_or(0, |series| series.len());
    println!("{CHART_TITLE}: {candle_count} candles ({origin:?})");

    let container = HeadlessContainer::attached(args.width.unwrap_or(DEFAULT_WIDTH));
    let options = config.chart_options();
    present_chart(&home, container, options, args.png.as_deref())?;

    let started = home.analyze(Instant::now());
    println!("{} ({})", home.analysis().button_label(), home.analysis().mode());
    loop {
        if let Some(due_at) = home.analysis().due_at() {
            std::thread::sleep(due_at.saturating_duration_since(Instant::now()));
        }
        match home.poll_analysis(Instant::now()) {
            Some(AnalysisOutcome::Completed { ticket, report }) if ticket == started.ticket => {
                println!("{report}");
                return Ok(());
            }
            Some(AnalysisOutcome::Completed { .. } | AnalysisOutcome::Cancelled { .. }) => {}
            None if !home.analysis().is_loading() => {
                return Err("analysis ended without a result".to_owned());
            }
            None => {}
        }
    }
}

fn present_chart<S, N>(
    home: &HomeView<S, N>,
    container: HeadlessContainer,
    options: candle_dash::ChartOptions,
    png: Option<&std::path::Path>,
) -> Result<(), String>
where
    S: CandleSource,
    N: candle_dash::app::Notifier,
{
    #[cfg(feature = "cairo-backend")]
    if let Some(path) = png {
        use candle_dash::render::CairoRenderer;

        let mut chart = ChartLifecycle::new(container, options, |viewport: Viewport| {
            CairoRenderer::new(viewport.width, viewport.height)
        });
        report_outcome(home.sync_chart(&mut chart));
        return match chart.with_surface(|surface| surface.renderer().write_png(path)) {
            Some(written) => {
                written.map_err(|err| err.to_string())?;
                println!("chart written to {}", path.display());
                Ok(())
            }
            None => Err("no chart surface to export".to_owned()),
        };
    }

    #[cfg(not(feature = "cairo-backend"))]
    if png.is_some() {
        return Err("--png requires the `cairo-backend` feature".to_owned());
    }

    let mut chart = ChartLifecycle::new(container, options, |_viewport: Viewport| {
        Ok::<_, DashError>(NullRenderer::default())
    });
    report_outcome(home.sync_chart(&mut chart));
    if let Some(render_count) = chart.with_surface(|surface| surface.renderer().render_count) {
        println!("chart rendered {render_count} time(s)");
    }
    Ok(())
}

fn report_outcome(outcome: Option<PresentOutcome>) {
    match outcome {
        Some(PresentOutcome::Placeholder) => {
            println!("{}", candle_dash::chart::NO_DATA_PLACEHOLDER);
        }
        Some(outcome) => println!("chart: {outcome:?}"),
        None => println!("chart: loading"),
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs::default();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--width" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --width".to_owned())?;
                let width = value
                    .parse::<u32>()
                    .ok()
                    .filter(|width| *width > 0)
                    .ok_or_else(|| format!("invalid --width `{value}`"))?;
                parsed.width = Some(width);
            }
            "--mode" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --mode".to_owned())?;
                parsed.mode = Some(match value.as_str() {
                    "normal" => AnalysisMode::Normal,
                    "ultra" => AnalysisMode::Ultra,
                    other => return Err(format!("invalid --mode `{other}`")),
                });
            }
            "--offline" => parsed.offline = true,
            "--png" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --png".to_owned())?;
                parsed.png = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(parsed)
}
