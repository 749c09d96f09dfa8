#[cfg(feature = "gtk4-adapter")]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use candle_dash::analysis::{AnalysisOutcome, AnalysisPanel, RESULT_PLACEHOLDER};
    use candle_dash::app::{CHART_TITLE, HomeView, TracingNotifier};
    use candle_dash::chart::{ChartLifecycle, ChartPhase};
    use candle_dash::core::Viewport;
    use candle_dash::data::{BinanceKlineSource, CandleSource, StaticCandleSource};
    use candle_dash::platform_gtk::GtkChartContainer;
    use candle_dash::render::CairoRenderer;
    use candle_dash::DashboardConfig;
    use gtk4 as gtk;
    use gtk4::prelude::*;

    let _ = candle_dash::telemetry::init_default_tracing();

    let app = gtk::Application::builder()
        .application_id("rs.candle_dash.demos.dashboard")
        .build();

    app.connect_activate(|app| {
        let config = DashboardConfig::default();
        let source: Box<dyn CandleSource> =
            match BinanceKlineSource::new(config.market.clone(), config.request_timeout()) {
                Ok(source) => Box::new(source),
                Err(err) => {
                    eprintln!("klines client unavailable, using fallback data: {err}");
                    Box::new(StaticCandleSource::fallback())
                }
            };
        let home = Rc::new(RefCell::new(HomeView::new(
            source,
            TracingNotifier,
            AnalysisPanel::new(config.analysis_delay()),
        )));
        home.borrow_mut().load();

        let area = gtk::DrawingArea::builder()
            .content_height(config.chart_options().height as i32)
            .hexpand(true)
            .build();
        let container = GtkChartContainer::new(area.clone());
        let chart = Rc::new(RefCell::new(ChartLifecycle::new(
            container.clone(),
            config.chart_options(),
            |viewport: Viewport| CairoRenderer::new(viewport.width, viewport.height),
        )));

        {
            let home = Rc::clone(&home);
            let chart = Rc::clone(&chart);
            area.connect_resize(move |_, _, _| {
                let mut chart = chart.borrow_mut();
                let outcome = match chart.phase() {
                    ChartPhase::Uninitialized => home.borrow().sync_chart(&mut chart),
                    ChartPhase::Deferred => chart.container_ready(),
                    _ => None,
                };
                if outcome.is_some() {
                    if let Some(surface) = chart.surface_handle() {
                        container.install_draw_handler(surface);
                    }
                }
            });
        }

        let result = gtk::Label::builder()
            .label(RESULT_PLACEHOLDER)
            .wrap(true)
            .xalign(0.0)
            .build();
        let button = gtk::Button::with_label(home.borrow().analysis().button_label());
        {
            let home = Rc::clone(&home);
            let result = result.clone();
            button.connect_clicked(move |button| {
                let delay = {
                    let mut home = home.borrow_mut();
                    home.analyze(Instant::now());
                    button.set_label(home.analysis().button_label());
                    home.analysis().delay()
                };
                result.set_label("");

                let home = Rc::clone(&home);
                let result = result.clone();
                let button = button.clone();
                gtk::glib::timeout_add_local_once(delay, move || {
                    let mut home = home.borrow_mut();
                    if let Some(AnalysisOutcome::Completed { report, .. }) =
                        home.poll_analysis(Instant::now())
                    {
                        result.set_label(&report.to_string());
                    }
                    button.set_label(home.analysis().button_label());
                });
            });
        }

        let layout = gtk::Box::new(gtk::Orientation::Vertical, 12);
        layout.set_margin_top(12);
        layout.set_margin_bottom(12);
        layout.set_margin_start(12);
        layout.set_margin_end(12);
        layout.append(&gtk::Label::new(Some(CHART_TITLE)));
        layout.append(&area);
        layout.append(&button);
        layout.append(&result);

        let window = gtk::ApplicationWindow::builder()
            .application(app)
            .title("candle-dash | BTC/USDT 1d")
            .default_width(1280)
            .default_height(760)
            .child(&layout)
            .build();

        // keeps the chart alive for as long as the window exists
        window.connect_destroy(move |_| chart.borrow_mut().unmount());
        window.present();
    });

    let _ = app.run();
}

#[cfg(not(feature = "gtk4-adapter"))]
fn main() {
    println!("run with: cargo run --features desktop --example gtk_dashboard");
}
