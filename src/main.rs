mod app;
mod cli;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use cli::Args;
use config::DashboardConfig;
use data::loader::SourceSpec;
use data::pipeline;
use data::view::build_view;

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = DashboardConfig::load_or_default(args.config.as_deref())?;
    let source = args.source_spec()?;

    if args.print {
        let spec = source.context("--print needs a WORKBOOK or --csv sources")?;
        return print_summary(&args, &config, &spec);
    }
    run_window(config, source)
}

/// Headless mode: load, filter, aggregate, print.
fn print_summary(args: &Args, config: &DashboardConfig, spec: &SourceSpec) -> Result<()> {
    let filter = args.filter_state(config)?;
    let dataset = pipeline::load(spec, config)?;
    if dataset.is_empty() {
        log::warn!("{} produced no usable records", spec.describe());
    }

    let view = build_view(&dataset, &filter);
    print!("{}", report::render(&dataset, &filter, &view));
    Ok(())
}

fn run_window(config: DashboardConfig, source: Option<SourceSpec>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Internship Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config, source)))),
    )
    .map_err(|e| anyhow!("window terminated with an error: {e}"))
}
