//! Dataset Module
//! The loaded incident table and its typed row view.

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// Columns every incident table must carry after loading.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Year", "State", "City", "Race", "Gender", "Age"];

/// One fatal-force incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRecord {
    pub year: i64,
    pub state: String,
    pub city: String,
    pub race: Option<String>,
    pub gender: Option<String>,
    pub age: Option<f64>,
}

/// Where the table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    File(std::path::PathBuf),
    InMemory,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::InMemory => write!(f, "in-memory table"),
        }
    }
}

/// The incident table, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    source: DataSource,
}

impl Dataset {
    /// Wrap an already-normalized frame.
    pub fn new(df: DataFrame, source: DataSource) -> Self {
        Self { df, source }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn column_count(&self) -> usize {
        self.df.width()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> PolarsResult<Vec<i64>> {
        let years: BTreeSet<i64> = int_values(&self.df, "Year")?.into_iter().flatten().collect();
        Ok(years.into_iter().collect())
    }

    /// Distinct state names, sorted.
    pub fn states(&self) -> PolarsResult<Vec<String>> {
        let states: BTreeSet<String> = string_values(&self.df, "State")?
            .into_iter()
            .flatten()
            .collect();
        Ok(states.into_iter().collect())
    }

    /// Rows of the table as records, newest year first.
    pub fn records(&self) -> PolarsResult<Vec<IncidentRecord>> {
        let mut records = records_from_frame(&self.df)?;
        records.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(records)
    }
}

/// Convert a frame with the incident schema into records.
///
/// Rows without a year, state or city are skipped.
pub fn records_from_frame(df: &DataFrame) -> PolarsResult<Vec<IncidentRecord>> {
    let years = int_values(df, "Year")?;
    let states = string_values(df, "State")?;
    let cities = string_values(df, "City")?;
    let races = string_values(df, "Race")?;
    let genders = string_values(df, "Gender")?;
    let ages = float_values(df, "Age")?;

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;

    for i in 0..df.height() {
        match (years[i], &states[i], &cities[i]) {
            (Some(year), Some(state), Some(city)) => records.push(IncidentRecord {
                year,
                state: state.clone(),
                city: city.clone(),
                race: races[i].clone(),
                gender: genders[i].clone(),
                age: ages[i],
            }),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "rows without year, state or city left out of record view");
    }

    Ok(records)
}

/// Values of a column as optional strings.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Values of a column as optional integers.
pub fn int_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

/// Values of a column as optional floats. NaN counts as missing.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A small normalized incident table used across unit tests.
    pub fn sample_frame() -> DataFrame {
        df!(
            "Year" => [2015i64, 2015, 2016, 2016, 2016, 2017, 2017, 2018],
            "State" => ["Texas", "California", "Texas", "Texas", "Ohio", "California", "Texas", "Ohio"],
            "City" => ["Houston", "Los Angeles", "Houston", "Dallas", "Columbus", "Los Angeles", "Houston", "Columbus"],
            "Race" => [Some("White"), Some("Hispanic"), Some("Black"), Some("White"), None, Some("Hispanic"), Some("White"), Some("Black")],
            "Gender" => [Some("Male"), Some("Male"), Some("Female"), Some("Male"), Some("Male"), Some("Female"), Some("Unknown"), Some("Male")],
            "Age" => [Some(34.0), Some(22.0), Some(41.0), None, Some(29.0), Some(35.0), Some(22.0), Some(50.0)]
        )
        .expect("fixture frame")
    }

    pub fn sample_dataset() -> Dataset {
        Dataset::new(sample_frame(), DataSource::InMemory)
    }
}
