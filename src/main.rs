//! Fatal Force - U.S. police fatal force data exploration
//!
//! Opens the interactive dashboard, or exports and summarizes one selection
//! from the command line.

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use fatal_force::cli::{Cli, Command, ExportCommand, SelectionArgs, SummaryCommand};
use fatal_force::dashboard::DashboardViews;
use fatal_force::data::{DataLoader, Dataset};
use fatal_force::export::export_views;
use fatal_force::gui::DashboardApp;
use fatal_force::{init_logging, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    apply_source_overrides(&mut config, &cli);

    match cli.command {
        None | Some(Command::Dashboard) => run_dashboard(config),
        Some(Command::Export(cmd)) => run_export(&config, &cmd),
        Some(Command::Summary(cmd)) => run_summary(&config, &cmd),
    }
}

/// `--csv` and `--url` replace the configured data source.
fn apply_source_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.csv {
        config.data.csv_path = Some(path.clone());
    }
    if let Some(url) = &cli.url {
        config.data.source_url = url.clone();
        config.data.csv_path = None;
    }
}

fn load_dataset(config: &Config) -> Result<Dataset> {
    let loader = DataLoader::new(config.data.drop_columns.clone());
    let dataset = loader
        .load(config.data.csv_path.as_deref(), &config.data.source_url)
        .context("loading incident data")?;
    tracing::info!(
        source = %dataset.source(),
        rows = dataset.row_count(),
        "dataset ready"
    );
    Ok(dataset)
}

fn compute_views(config: &Config, dataset: &Dataset, selection: &SelectionArgs) -> Result<DashboardViews> {
    let states = selection.states()?;
    let views = DashboardViews::compute(dataset, selection.year(), &states, &config.view_settings())
        .context("computing views")?;
    Ok(views)
}

fn run_export(config: &Config, cmd: &ExportCommand) -> Result<()> {
    let dataset = load_dataset(config)?;
    let views = compute_views(config, &dataset, &cmd.selection)?;
    let summary = views.summary(&dataset);

    let written = export_views(&views, &summary, &cmd.out, cmd.png)
        .with_context(|| format!("exporting to {}", cmd.out.display()))?;
    for path in &written {
        println!("{}", path.display());
    }

    if cmd.open {
        open::that(&cmd.out).with_context(|| format!("opening {}", cmd.out.display()))?;
    }
    Ok(())
}

fn run_summary(config: &Config, cmd: &SummaryCommand) -> Result<()> {
    let dataset = load_dataset(config)?;
    let views = compute_views(config, &dataset, &cmd.selection)?;
    let summary = views.summary(&dataset);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

fn run_dashboard(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(config.window.title.clone()),
        ..Default::default()
    };

    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard failed: {e}"))
}
