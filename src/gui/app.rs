//! Fatal Force Dashboard Application
//! Main window with control panel and chart viewer.

use crate::charts::{BoundaryMap, SPECIAL_AREAS};
use crate::config::Config;
use crate::dashboard::{format_thousands, DashboardViews, ViewSettings};
use crate::data::{DataLoader, Dataset};
use crate::export::export_views;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DatasetInfo};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Dataset loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        dataset: Dataset,
        years: Vec<i64>,
        states: Vec<String>,
        info: DatasetInfo,
    },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: Config,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    dataset: Option<Dataset>,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.charts.age_statistic),
            chart_viewer: ChartViewer::new(),
            dataset: None,
            load_rx: None,
            is_loading: false,
            config,
        };

        let boundaries = BoundaryMap::load(&app.config.data.geo_path, &SPECIAL_AREAS)
            .map_err(|e| e.to_string());
        if let Err(error) = &boundaries {
            tracing::warn!(%error, "state map disabled");
        }
        app.chart_viewer.set_boundaries(boundaries);

        let csv_path = app.config.data.csv_path.clone();
        app.start_load(csv_path);
        app
    }

    /// Load the table on a background thread; a local file wins over the
    /// configured URL.
    fn start_load(&mut self, csv_path: Option<PathBuf>) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.busy = true;
        self.control_panel.set_status("Loading dataset...");

        let loader = DataLoader::new(self.config.data.drop_columns.clone());
        let url = self.config.data.source_url.clone();

        thread::spawn(move || {
            let what = csv_path
                .as_ref()
                .map_or_else(|| url.clone(), |p| p.display().to_string());
            let _ = tx.send(LoadResult::Progress(format!("Reading {}...", what)));

            let result = loader.load(csv_path.as_deref(), &url).map_err(|e| e.to_string());
            let message = match result.and_then(|dataset| {
                let years = dataset.years().map_err(|e| e.to_string())?;
                let states = dataset.states().map_err(|e| e.to_string())?;
                let records = dataset.records().map_err(|e| e.to_string())?;
                let info = DatasetInfo {
                    rows: dataset.row_count(),
                    columns: dataset.column_count(),
                    records,
                };
                Ok(LoadResult::Complete {
                    dataset,
                    years,
                    states,
                    info,
                })
            }) {
                Ok(complete) => complete,
                Err(error) => LoadResult::Error(error),
            };
            let _ = tx.send(message);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(status);
                    }
                    LoadResult::Complete {
                        dataset,
                        years,
                        states,
                        info,
                    } => {
                        self.control_panel.set_status(format!(
                            "Loaded {} rows, {} columns",
                            format_thousands(info.rows),
                            info.columns
                        ));
                        self.control_panel
                            .set_options(dataset.source().to_string(), years, states);
                        self.chart_viewer.set_dataset(info);
                        self.dataset = Some(dataset);
                        self.finish_loading();
                        should_keep_receiver = false;
                        self.recompute();
                    }
                    LoadResult::Error(error) => {
                        tracing::error!(%error, "dataset load failed");
                        self.control_panel.set_status(format!("Error: {}", error));
                        self.finish_loading();
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.busy = false;
    }

    fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            age_statistic: self.control_panel.age_statistic,
            ..self.config.view_settings()
        }
    }

    /// Rebuild every view for the current selectors.
    fn recompute(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };

        let (year, states) = match self.control_panel.selection() {
            Ok(selection) => selection,
            Err(error) => {
                self.control_panel.set_selection_error(Some(error.to_string()));
                self.chart_viewer.set_message(error.to_string());
                return;
            }
        };
        self.control_panel.set_selection_error(None);

        match DashboardViews::compute(dataset, year, &states, &self.view_settings()) {
            Ok(views) => self.chart_viewer.set_views(views),
            Err(error) => {
                tracing::error!(%error, "view computation failed");
                self.chart_viewer.set_message(format!("Error: {}", error));
            }
        }
    }

    /// Handle CSV file selection
    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.chart_viewer.clear();
            self.dataset = None;
            self.start_load(Some(path));
        }
    }

    fn handle_reload(&mut self) {
        let csv_path = match self.dataset.as_ref().map(Dataset::source) {
            Some(crate::data::DataSource::File(path)) => Some(path.clone()),
            _ => self.config.data.csv_path.clone(),
        };
        self.start_load(csv_path);
    }

    /// Write the current views to a chosen folder and open it.
    fn handle_export(&mut self) {
        let (Some(dataset), Some(views)) = (&self.dataset, &self.chart_viewer.views) else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match export_views(views, &views.summary(dataset), &dir, true) {
            Ok(written) => {
                self.control_panel
                    .set_status(format!("Exported {} files to {}", written.len(), dir.display()));
                if let Err(error) = open::that(&dir) {
                    tracing::warn!(%error, "could not open export folder");
                }
            }
            Err(error) => {
                self.control_panel.set_status(format!("Error: {}", error));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::OpenCsv => self.handle_open_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::SelectionChanged => self.recompute(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
