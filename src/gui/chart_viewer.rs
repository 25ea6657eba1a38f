//! Chart Viewer Widget
//! Central scrollable panel: dataset summary, race and map row, cities row,
//! and the gender and age row.

use crate::charts::{BoundaryMap, ChartPlotter};
use crate::dashboard::{format_thousands, DashboardViews};
use crate::data::IncidentRecord;
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const ROW_HEIGHT: f32 = 20.0;
const RECORD_COLUMNS: [(&str, f32); 6] = [
    ("Year", 50.0),
    ("State", 130.0),
    ("City", 150.0),
    ("Race", 110.0),
    ("Gender", 70.0),
    ("Age", 40.0),
];

/// Everything the viewer knows about the loaded table.
#[derive(Default)]
pub struct DatasetInfo {
    pub rows: usize,
    pub columns: usize,
    /// Year-descending.
    pub records: Vec<IncidentRecord>,
}

#[derive(Default)]
pub struct ChartViewer {
    pub info: Option<DatasetInfo>,
    pub views: Option<DashboardViews>,
    pub boundaries: Option<Result<BoundaryMap, String>>,
    pub message: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.info = None;
        self.views = None;
        self.message = None;
    }

    pub fn set_dataset(&mut self, info: DatasetInfo) {
        self.info = Some(info);
    }

    pub fn set_views(&mut self, views: DashboardViews) {
        self.views = Some(views);
        self.message = None;
    }

    /// Replace the charts with a message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.views = None;
        self.message = Some(message.into());
    }

    pub fn set_boundaries(&mut self, boundaries: Result<BoundaryMap, String>) {
        self.boundaries = Some(boundaries);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("U.S. Fatal Force").size(26.0).strong());
                ui.label(
                    "In this dashboard, you will explore the data related to fatal force \
                     in the United States.",
                );
                ui.add_space(CHART_SPACING);

                if let Some(info) = &self.info {
                    Self::draw_summary(ui, info);
                    ui.add_space(CHART_SPACING);
                }

                match (&self.views, &self.message) {
                    (Some(views), _) => self.draw_views(ui, views),
                    (None, Some(message)) => {
                        ui.label(RichText::new(message).size(16.0).color(Color32::from_rgb(220, 53, 69)));
                    }
                    (None, None) => {
                        ui.centered_and_justified(|ui| {
                            ui.label(RichText::new("No Data").size(20.0));
                        });
                    }
                }
            });
    }

    fn draw_summary(ui: &mut egui::Ui, info: &DatasetInfo) {
        egui::CollapsingHeader::new(RichText::new("Show a summary of the dataset").italics().strong())
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    Self::metric(ui, "Total rows", &format_thousands(info.rows));
                    ui.add_space(80.0);
                    Self::metric(ui, "Total columns", &info.columns.to_string());
                });
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    for (name, width) in RECORD_COLUMNS {
                        ui.add_sized([width, ROW_HEIGHT], egui::Label::new(RichText::new(name).strong()));
                    }
                });
                ui.separator();
                ScrollArea::vertical()
                    .id_salt("records")
                    .max_height(300.0)
                    .show_rows(ui, ROW_HEIGHT, info.records.len(), |ui, range| {
                        for record in &info.records[range] {
                            let cells = [
                                record.year.to_string(),
                                record.state.clone(),
                                record.city.clone(),
                                record.race.clone().unwrap_or_default(),
                                record.gender.clone().unwrap_or_default(),
                                record.age.map(|a| format!("{a:.0}")).unwrap_or_default(),
                            ];
                            ui.horizontal(|ui| {
                                for (cell, (_, width)) in cells.iter().zip(RECORD_COLUMNS) {
                                    ui.add_sized([width, ROW_HEIGHT], egui::Label::new(cell).truncate());
                                }
                            });
                        }
                    });
            });
    }

    fn metric(ui: &mut egui::Ui, label: &str, value: &str) {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).strong().size(13.0));
            ui.label(RichText::new(value).size(28.0));
        });
    }

    fn draw_views(&self, ui: &mut egui::Ui, views: &DashboardViews) {
        let half = (ui.available_width() - CHART_SPACING) / 2.0;

        ui.label(
            RichText::new(format!(
                "{} · {} · {} incidents",
                views.year,
                views.states,
                format_thousands(views.row_count)
            ))
            .color(Color32::GRAY),
        );
        ui.add_space(8.0);

        // Race chart and map
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(half);
                ui.label(RichText::new("Race Plot Chart").size(18.0).strong());
                let labels: Vec<String> = views.race_counts.iter().map(|c| c.label.clone()).collect();
                let values: Vec<usize> = views.race_counts.iter().map(|c| c.count).collect();
                ChartPlotter::draw_bar_chart(ui, "race_bar", &labels, &values, 325.0);
            });
            ui.add_space(CHART_SPACING);
            ui.vertical(|ui| {
                ui.set_width(half);
                ui.label(RichText::new("U.S. Fatal Force").size(18.0).strong());
                match &self.boundaries {
                    Some(Ok(map)) => ChartPlotter::draw_state_map(ui, map, &views.state_map, 300.0),
                    Some(Err(error)) => {
                        ui.label(RichText::new(format!("Map unavailable: {error}")).italics());
                    }
                    None => {
                        ui.spinner();
                    }
                }
            });
        });

        ui.add_space(CHART_SPACING);

        // Cities chart and table
        let wide = (ui.available_width() - CHART_SPACING) * 0.69;
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(wide);
                ui.label(RichText::new("Cities Plot Chart").size(18.0).strong());
                let labels: Vec<String> = views
                    .city_counts
                    .iter()
                    .map(|c| format!("{}, {}", c.city, c.state))
                    .collect();
                let values: Vec<usize> = views.city_counts.iter().map(|c| c.count).collect();
                ChartPlotter::draw_bar_chart(ui, "cities_bar", &labels, &values, 500.0);
            });
            ui.add_space(CHART_SPACING);
            ui.vertical(|ui| {
                ui.label(RichText::new("Cities Data").size(18.0).strong());
                ui.add_space(20.0);
                let rows: Vec<Vec<String>> = views
                    .cities_table()
                    .into_iter()
                    .map(|c| vec![c.city, c.state, c.count.to_string()])
                    .collect();
                ChartPlotter::draw_table(ui, "cities_table", &["City", "State", "count"], &rows);
            });
        });

        ui.add_space(CHART_SPACING);

        // Gender pie and age distributions
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(format!("Gender Distribution ({})", views.year))
                        .size(18.0)
                        .strong(),
                );
                ChartPlotter::draw_gender_pie(ui, &views.gender_counts, 220.0);
            });
            ui.add_space(CHART_SPACING);
            let each = (ui.available_width() - CHART_SPACING) / views.distributions.len().max(1) as f32;
            for dist in &views.distributions {
                ui.vertical(|ui| {
                    ui.set_width(each);
                    ui.label(
                        RichText::new(format!("Distribution of {} Victims", dist.gender))
                            .size(18.0)
                            .strong(),
                    );
                    ChartPlotter::draw_age_distribution(ui, dist, 260.0);
                });
            }
        });
    }
}
