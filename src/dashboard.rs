//! Dashboard Module
//! Runs one interaction: filter the dataset, aggregate, and build every
//! chart configuration.

use crate::charts::{
    age_distribution_figure, cities_bar_options, gender_pie_figure, race_bar_options,
    state_map_options, BarOptions, MapOptions,
};
use crate::data::{filter_incidents, Dataset, SelectionError, StateSelection, YearSelection};
use crate::stats::{
    age_distribution, city_counts, gender_counts, race_counts, sorted, state_counts,
    AgeDistribution, AgeStatistic, CategoryCount, CityCount, DistributionError, SortOrder,
    StateCount,
};
use polars::prelude::PolarsError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Genders with their own distribution plot.
pub const PLOTTED_GENDERS: [&str; 2] = ["Male", "Female"];

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] PolarsError),
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Knobs for one dashboard computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub city_limit: usize,
    pub kde_points: usize,
    /// Bin width the age curves are scaled to.
    pub bin_size: f64,
    pub age_statistic: AgeStatistic,
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub year: YearSelection,
    pub states: StateSelection,
    pub row_count: usize,
    /// Ascending, as the bar chart draws it.
    pub race_counts: Vec<CategoryCount>,
    /// Ascending, as the bar chart draws it.
    pub city_counts: Vec<CityCount>,
    pub state_counts: Vec<StateCount>,
    pub gender_counts: Vec<CategoryCount>,
    pub distributions: Vec<AgeDistribution>,
    pub race_chart: BarOptions,
    pub cities_chart: BarOptions,
    pub state_map: MapOptions,
}

impl DashboardViews {
    /// Build all views for a selection.
    pub fn compute(
        dataset: &Dataset,
        year: YearSelection,
        states: &StateSelection,
        settings: &ViewSettings,
    ) -> Result<Self, DashboardError> {
        let df = filter_incidents(dataset.frame(), year, states)?;

        let race = race_counts(&df, SortOrder::Ascending)?;
        let cities = city_counts(&df, settings.city_limit, SortOrder::Ascending)?;
        let by_state = state_counts(&df)?;
        let genders = gender_counts(&df)?;

        let distributions = PLOTTED_GENDERS
            .iter()
            .map(|g| {
                age_distribution(
                    &df,
                    g,
                    settings.age_statistic,
                    settings.kde_points,
                    settings.bin_size,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            %year,
            rows = df.height(),
            races = race.len(),
            cities = cities.len(),
            states = by_state.len(),
            "dashboard views computed"
        );

        Ok(Self {
            year,
            states: states.clone(),
            row_count: df.height(),
            race_chart: race_bar_options(&race),
            cities_chart: cities_bar_options(&cities),
            state_map: state_map_options(&by_state),
            race_counts: race,
            city_counts: cities,
            state_counts: by_state,
            gender_counts: genders,
            distributions,
        })
    }

    /// Race table, largest first.
    pub fn race_table(&self) -> Vec<CategoryCount> {
        sorted(&self.race_counts, SortOrder::Descending)
    }

    /// Cities table, largest first.
    pub fn cities_table(&self) -> Vec<CityCount> {
        sorted(&self.city_counts, SortOrder::Descending)
    }

    pub fn gender_pie(&self) -> Value {
        gender_pie_figure(&self.gender_counts, self.year)
    }

    pub fn distribution_figures(&self) -> Vec<(String, Value)> {
        self.distributions
            .iter()
            .map(|d| (d.gender.clone(), age_distribution_figure(d)))
            .collect()
    }

    /// Dataset metrics plus the count tables for this selection.
    pub fn summary(&self, dataset: &Dataset) -> SelectionSummary {
        SelectionSummary {
            source: dataset.source().to_string(),
            total_rows: dataset.row_count(),
            total_columns: dataset.column_count(),
            year: self.year.to_string(),
            states: self.states.to_string(),
            selected_rows: self.row_count,
            races: self.race_table(),
            cities: self.cities_table(),
            genders: self.gender_counts.clone(),
            by_state: self.state_counts.clone(),
            age_markers: self
                .distributions
                .iter()
                .map(|d| AgeMarker {
                    gender: d.gender.clone(),
                    statistic: d.statistic,
                    gender_value: d.gender_marker,
                    overall_value: d.overall_marker,
                })
                .collect(),
        }
    }
}

/// Central age value for one gender and for all victims.
#[derive(Debug, Clone, Serialize)]
pub struct AgeMarker {
    pub gender: String,
    pub statistic: AgeStatistic,
    pub gender_value: Option<f64>,
    pub overall_value: Option<f64>,
}

/// Headless view of one selection.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub source: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub year: String,
    pub states: String,
    pub selected_rows: usize,
    pub races: Vec<CategoryCount>,
    pub cities: Vec<CityCount>,
    pub genders: Vec<CategoryCount>,
    pub by_state: Vec<StateCount>,
    pub age_markers: Vec<AgeMarker>,
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Source:   {}", self.source)?;
        writeln!(
            f,
            "Dataset:  {} rows, {} columns",
            format_thousands(self.total_rows),
            self.total_columns
        )?;
        writeln!(f, "Year:     {}", self.year)?;
        writeln!(f, "States:   {}", self.states)?;
        writeln!(f, "Selected: {} incidents", format_thousands(self.selected_rows))?;

        writeln!(f, "\nDeaths by race")?;
        for row in &self.races {
            writeln!(f, "  {:<24} {:>8}", row.label, format_thousands(row.count))?;
        }

        writeln!(f, "\nTop cities")?;
        for row in &self.cities {
            let place = format!("{}, {}", row.city, row.state);
            writeln!(f, "  {:<32} {:>8}", place, format_thousands(row.count))?;
        }

        writeln!(f, "\nGender")?;
        for row in &self.genders {
            writeln!(f, "  {:<24} {:>8}", row.label, format_thousands(row.count))?;
        }

        writeln!(f, "\nAge")?;
        for m in &self.age_markers {
            let fmt_age = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v));
            writeln!(
                f,
                "  {:<8} {} {:>6} (all victims {})",
                m.gender,
                m.statistic,
                fmt_age(m.gender_value),
                fmt_age(m.overall_value)
            )?;
        }
        Ok(())
    }
}

/// Format a count with thousands separators.
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_dataset;

    fn settings() -> ViewSettings {
        ViewSettings {
            city_limit: 10,
            kde_points: 40,
            bin_size: 6.0,
            age_statistic: AgeStatistic::Mean,
        }
    }

    #[test]
    fn computes_every_view() {
        let ds = sample_dataset();
        let views =
            DashboardViews::compute(&ds, YearSelection::All, &StateSelection::All, &settings())
                .unwrap();
        assert_eq!(views.row_count, 8);
        assert_eq!(views.race_counts.last().unwrap().label, "White");
        assert_eq!(views.race_table()[0].label, "White");
        assert_eq!(views.cities_table()[0].city, "Houston");
        assert_eq!(views.state_map.visual_map.max, 2);
        assert_eq!(views.distributions.len(), 2);
        assert_eq!(views.distribution_figures()[1].0, "Female");
        assert_eq!(
            views.race_chart.series[0].data,
            views.race_counts.iter().map(|c| c.count).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_selection_still_builds_views() {
        let ds = sample_dataset();
        let sel = StateSelection::States(vec!["Alaska".into()]);
        let views = DashboardViews::compute(&ds, YearSelection::Year(2016), &sel, &settings())
            .unwrap();
        assert_eq!(views.row_count, 0);
        assert!(views.race_counts.is_empty());
        assert!(views.city_counts.is_empty());
        assert_eq!(views.state_map.visual_map.max, 0);
        assert!(views.distributions[0].gender_curve.is_empty());
        assert_eq!(views.distributions[0].gender_marker, None);
    }

    #[test]
    fn pie_title_follows_year() {
        let ds = sample_dataset();
        let views = DashboardViews::compute(
            &ds,
            YearSelection::Year(2017),
            &StateSelection::All,
            &settings(),
        )
        .unwrap();
        let title = views.gender_pie()["layout"]["title"]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(title.contains("2017"));
    }

    #[test]
    fn summary_lists_tables_largest_first() {
        let ds = sample_dataset();
        let views =
            DashboardViews::compute(&ds, YearSelection::All, &StateSelection::All, &settings())
                .unwrap();
        let summary = views.summary(&ds);
        assert_eq!(summary.total_rows, 8);
        assert_eq!(summary.states, "All states");
        assert_eq!(summary.races[0].label, "White");
        assert_eq!(summary.age_markers.len(), 2);

        let text = summary.to_string();
        assert!(text.contains("Deaths by race"));
        assert!(text.contains("Houston, Texas"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["selected_rows"], 8);
        assert_eq!(json["age_markers"][0]["statistic"], "Mean");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
