//! Export Module
//! Writes the chart option documents (and optionally PNG renderings) for
//! one selection to a directory.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::dashboard::{DashboardViews, SelectionSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Size of the rendered PNG charts.
pub const PNG_WIDTH: u32 = 1200;
pub const PNG_HEIGHT: u32 = 800;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Caption of the cities chart for `shown` cities.
pub fn cities_caption(shown: usize) -> String {
    format!("Top {} Cities", shown)
}

/// File-name stem for a gender's distribution figure.
pub fn distribution_stem(gender: &str) -> String {
    format!("age_distribution_{}", gender.to_lowercase())
}

/// Write every view of `views` into `dir`, creating it if needed.
/// Returns the written paths in write order.
pub fn export_views(
    views: &DashboardViews,
    summary: &SelectionSummary,
    dir: &Path,
    png: bool,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    written.push(write_json(dir, "race_bar.json", &views.race_chart)?);
    written.push(write_json(dir, "cities_bar.json", &views.cities_chart)?);
    written.push(write_json(dir, "state_map.json", &views.state_map)?);
    written.push(write_json(dir, "gender_pie.json", &views.gender_pie())?);
    for (gender, figure) in views.distribution_figures() {
        let name = format!("{}.json", distribution_stem(&gender));
        written.push(write_json(dir, &name, &figure)?);
    }
    written.push(write_json(dir, "summary.json", summary)?);

    if png {
        let race_labels: Vec<String> = views.race_counts.iter().map(|c| c.label.clone()).collect();
        let race_values: Vec<usize> = views.race_counts.iter().map(|c| c.count).collect();
        let bytes = StaticChartRenderer::render_bar_chart_png(
            "Deaths by Race",
            &race_labels,
            &race_values,
            PNG_WIDTH,
            PNG_HEIGHT,
        )?;
        written.push(write_bytes(dir, "race_bar.png", &bytes)?);

        let city_labels: Vec<String> = views
            .city_counts
            .iter()
            .map(|c| format!("{}, {}", c.city, c.state))
            .collect();
        let city_values: Vec<usize> = views.city_counts.iter().map(|c| c.count).collect();
        let bytes = StaticChartRenderer::render_bar_chart_png(
            &cities_caption(views.city_counts.len()),
            &city_labels,
            &city_values,
            PNG_WIDTH,
            PNG_HEIGHT,
        )?;
        written.push(write_bytes(dir, "cities_bar.png", &bytes)?);

        for dist in &views.distributions {
            let bytes = StaticChartRenderer::render_distribution_png(dist, PNG_WIDTH, PNG_HEIGHT)?;
            let name = format!("{}.png", distribution_stem(&dist.gender));
            written.push(write_bytes(dir, &name, &bytes)?);
        }
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "export finished");
    Ok(written)
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<PathBuf, ExportError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| ExportError::Json {
        name: name.to_string(),
        source,
    })?;
    write_bytes(dir, name, text.as_bytes())
}

fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = dir.join(name);
    std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote");
    Ok(path)
}
