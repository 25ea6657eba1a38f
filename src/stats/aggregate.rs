//! Aggregation Module
//! Value-count tables over the filtered incident table.

use crate::data::string_values;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Default number of cities kept by [`city_counts`].
pub const DEFAULT_CITY_LIMIT: usize = 10;

/// Ordering of a count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first; the horizontal bar renderers draw the first row at the
    /// bottom.
    Ascending,
    /// Largest first, for tables.
    Descending,
}

/// One row of a single-field count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// One row of the city table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub state: String,
    pub count: usize,
}

/// One region of the state map, in the `{name, value}` shape map
/// renderers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub name: String,
    pub value: usize,
}

/// Rows that can be put in count order.
pub trait Counted {
    fn count(&self) -> usize;
    fn sort_key(&self) -> String;
}

impl Counted for CategoryCount {
    fn count(&self) -> usize {
        self.count
    }
    fn sort_key(&self) -> String {
        self.label.clone()
    }
}

impl Counted for CityCount {
    fn count(&self) -> usize {
        self.count
    }
    fn sort_key(&self) -> String {
        format!("{}\u{1f}{}", self.city, self.state)
    }
}

impl Counted for StateCount {
    fn count(&self) -> usize {
        self.value
    }
    fn sort_key(&self) -> String {
        self.name.clone()
    }
}

/// Sort a count table in place.
///
/// Descending order breaks ties by label; ascending is its exact reverse.
pub fn sort_counts<T: Counted>(rows: &mut [T], order: SortOrder) {
    rows.sort_by(|a, b| {
        b.count()
            .cmp(&a.count())
            .then_with(|| a.sort_key().cmp(&b.sort_key()))
    });
    if order == SortOrder::Ascending {
        rows.reverse();
    }
}

/// Return a sorted copy of a count table.
pub fn sorted<T: Counted + Clone>(rows: &[T], order: SortOrder) -> Vec<T> {
    let mut rows = rows.to_vec();
    sort_counts(&mut rows, order);
    rows
}

/// Count incidents per value of one column. Nulls are not counted.
pub fn value_counts(df: &DataFrame, column: &str, order: SortOrder) -> PolarsResult<Vec<CategoryCount>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in string_values(df, column)?.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    sort_counts(&mut rows, order);
    Ok(rows)
}

/// Incidents per race.
pub fn race_counts(df: &DataFrame, order: SortOrder) -> PolarsResult<Vec<CategoryCount>> {
    value_counts(df, "Race", order)
}

/// Incidents per (city, state), keeping the `limit` largest groups.
pub fn city_counts(df: &DataFrame, limit: usize, order: SortOrder) -> PolarsResult<Vec<CityCount>> {
    let cities = string_values(df, "City")?;
    let states = string_values(df, "State")?;

    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for (city, state) in cities.into_iter().zip(states) {
        if let (Some(city), Some(state)) = (city, state) {
            *counts.entry((city, state)).or_default() += 1;
        }
    }

    let mut rows: Vec<CityCount> = counts
        .into_iter()
        .map(|((city, state), count)| CityCount { city, state, count })
        .collect();

    // Truncate on the descending order, then re-sort for display
    sort_counts(&mut rows, SortOrder::Descending);
    rows.truncate(limit);
    sort_counts(&mut rows, order);
    Ok(rows)
}

/// Incidents per state, as map data.
pub fn state_counts(df: &DataFrame) -> PolarsResult<Vec<StateCount>> {
    Ok(value_counts(df, "State", SortOrder::Descending)?
        .into_iter()
        .map(|c| StateCount {
            name: c.label,
            value: c.count,
        })
        .collect())
}

/// Incidents per gender, restricted to `Male` and `Female`.
pub fn gender_counts(df: &DataFrame) -> PolarsResult<Vec<CategoryCount>> {
    Ok(value_counts(df, "Gender", SortOrder::Descending)?
        .into_iter()
        .filter(|c| c.label == "Male" || c.label == "Female")
        .collect())
}

/// Mean of the map values, 0 for an empty table.
pub fn mean_state_value(counts: &[StateCount]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().map(|c| c.value as f64).sum::<f64>() / counts.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_frame;

    fn labels(rows: &[CategoryCount]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn race_counts_skip_nulls_and_sort() {
        let df = sample_frame();
        let desc = race_counts(&df, SortOrder::Descending).unwrap();
        assert_eq!(labels(&desc), vec!["White", "Black", "Hispanic"]);
        assert_eq!(desc.iter().map(|r| r.count).sum::<usize>(), 7);

        let asc = race_counts(&df, SortOrder::Ascending).unwrap();
        assert_eq!(labels(&asc), vec!["Hispanic", "Black", "White"]);
        assert!(asc.windows(2).all(|w| w[0].count <= w[1].count));
    }

    #[test]
    fn city_counts_group_by_city_and_state() {
        let df = sample_frame();
        let rows = city_counts(&df, DEFAULT_CITY_LIMIT, SortOrder::Descending).unwrap();
        assert_eq!(rows[0].city, "Houston");
        assert_eq!(rows[0].state, "Texas");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn city_counts_never_exceed_limit() {
        let cities: Vec<String> = (0..25).map(|i| format!("City {i}")).collect();
        let n = cities.len();
        let df = df!(
            "City" => cities,
            "State" => vec!["Texas"; n]
        )
        .unwrap();
        let rows = city_counts(&df, DEFAULT_CITY_LIMIT, SortOrder::Ascending).unwrap();
        assert_eq!(rows.len(), 10);
        let rows = city_counts(&df, 3, SortOrder::Descending).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn city_truncation_keeps_the_largest_groups() {
        let df = df!(
            "City" => ["A", "A", "A", "B", "B", "C"],
            "State" => ["Ohio", "Ohio", "Ohio", "Ohio", "Ohio", "Ohio"]
        )
        .unwrap();
        let rows = city_counts(&df, 2, SortOrder::Ascending).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.city.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn state_counts_and_mean() {
        let df = sample_frame();
        let rows = state_counts(&df).unwrap();
        assert_eq!(
            rows[0],
            StateCount {
                name: "Texas".into(),
                value: 4
            }
        );
        let mean = mean_state_value(&rows);
        assert!((mean - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(mean_state_value(&[]), 0.0);
    }

    #[test]
    fn gender_counts_only_male_and_female() {
        let df = sample_frame();
        let rows = gender_counts(&df).unwrap();
        assert_eq!(labels(&rows), vec!["Male", "Female"]);
        assert_eq!(rows[0].count, 5);
        assert_eq!(rows[1].count, 2);
    }

    #[test]
    fn ties_break_by_label() {
        let df = df!("Race" => ["b", "a", "c", "c"]).unwrap();
        let desc = race_counts(&df, SortOrder::Descending).unwrap();
        assert_eq!(labels(&desc), vec!["c", "a", "b"]);
        let asc = sorted(&desc, SortOrder::Ascending);
        assert_eq!(labels(&asc), vec!["b", "a", "c"]);
    }
}
