use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod models;
mod services;
mod utils;

use config::{DashboardLayout, RenderSettings};
use models::DashboardReport;
use services::chart_service::PlottersSvg;
use services::dashboard_service::render_dashboard;
use utils::{DashboardError, Page, SvgDirectory, Table};

#[derive(Parser)]
#[command(name = "listing-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render the charts of a listing dashboard page to SVG")]
struct Cli {
    /// HTML page holding the JSON data slots
    page: PathBuf,

    /// Directory the SVG charts are written to [env: DASHBOARD_OUT_DIR]
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// JSON file replacing the default chart layout
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Chart width in pixels [env: DASHBOARD_CHART_WIDTH]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    width: Option<u32>,

    /// Chart height in pixels [env: DASHBOARD_CHART_HEIGHT]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    height: Option<u32>,
}

fn main() {
    dotenv::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "listing_dashboard=debug".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok((report, out_dir)) => print_report(&report, &out_dir),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<(DashboardReport, PathBuf), DashboardError> {
    let mut settings = RenderSettings::from_env();
    if let Some(dir) = cli.out_dir {
        settings.out_dir = dir;
    }
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }

    let layout = match &cli.layout {
        Some(path) => {
            info!("Loading layout from {}", path.display());
            DashboardLayout::load(path)?
        }
        None => DashboardLayout::default(),
    };

    let source = std::fs::read_to_string(&cli.page).map_err(|e| DashboardError::io(&cli.page, e))?;
    let page = Page::parse(&source);
    info!(
        "Rendering {} charts from {} ({}x{})",
        layout.charts.len(),
        cli.page.display(),
        settings.width,
        settings.height
    );

    let mut sink = SvgDirectory::create(&settings.out_dir)?;
    let report = render_dashboard(&page, &layout, &settings, &PlottersSvg, &mut sink);

    Ok((report, sink.dir().to_path_buf()))
}

fn print_report(report: &DashboardReport, out_dir: &std::path::Path) {
    let mut table = Table::new(vec!["Chart", "Slot", "Surface", "Status"]);
    for outcome in &report.outcomes {
        table.add_row(vec![
            outcome.name.clone(),
            outcome.data_slot.clone(),
            outcome.surface.clone(),
            outcome.status.to_string(),
        ]);
    }

    print!("{}", table.render());
    let diagnostics = report.diagnostics().count();
    if diagnostics > 0 {
        println!("{} chart(s) could not be rendered, see the warnings above", diagnostics);
    }
    println!(
        "{} of {} charts written to {} at {}",
        report.rendered_count(),
        report.outcomes.len(),
        out_dir.display(),
        report.rendered_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
