//! Selection Filter Module
//! Restricts the incident table by year and state.

use polars::prelude::*;
use thiserror::Error;

/// Sidebar choice meaning "every year".
pub const ALL_YEARS: &str = "All years";
/// Sidebar choice meaning "every state".
pub const ALL_STATES: &str = "All states";

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Please select a valid state.")]
    InvalidState,
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Year selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSelection {
    #[default]
    All,
    Year(i64),
}

impl std::fmt::Display for YearSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearSelection::All => f.write_str(ALL_YEARS),
            YearSelection::Year(year) => write!(f, "{}", year),
        }
    }
}

impl From<Option<i64>> for YearSelection {
    fn from(year: Option<i64>) -> Self {
        year.map_or(YearSelection::All, YearSelection::Year)
    }
}

/// State selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateSelection {
    #[default]
    All,
    States(Vec<String>),
}

impl StateSelection {
    /// Interpret the raw multiselect choices.
    ///
    /// Only the sentinel means every state. An empty selection is a user
    /// error. A sentinel mixed with real names is ignored.
    pub fn from_choices<S: AsRef<str>>(choices: &[S]) -> Result<Self, SelectionError> {
        if choices.is_empty() {
            return Err(SelectionError::InvalidState);
        }

        let states: Vec<String> = choices
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| *c != ALL_STATES)
            .map(str::to_string)
            .collect();

        if states.is_empty() {
            Ok(StateSelection::All)
        } else {
            Ok(StateSelection::States(states))
        }
    }
}

impl std::fmt::Display for StateSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateSelection::All => f.write_str(ALL_STATES),
            StateSelection::States(names) => f.write_str(&names.join(", ")),
        }
    }
}

/// Return the rows matching both selectors.
///
/// Field values are kept as loaded. No match gives an empty frame.
pub fn filter_incidents(
    df: &DataFrame,
    year: YearSelection,
    states: &StateSelection,
) -> Result<DataFrame, SelectionError> {
    let year_predicate = match year {
        YearSelection::All => None,
        YearSelection::Year(y) => Some(col("Year").eq(lit(y))),
    };

    let state_predicate = match states {
        StateSelection::All => None,
        StateSelection::States(names) => Some(
            names
                .iter()
                .map(|name| col("State").eq(lit(name.as_str())))
                .reduce(|acc, e| acc.or(e))
                .unwrap_or_else(|| lit(false)),
        ),
    };

    let predicate = match (year_predicate, state_predicate) {
        (None, None) => return Ok(df.clone()),
        (Some(p), None) | (None, Some(p)) => p,
        (Some(y), Some(s)) => y.and(s),
    };

    let filtered = df.clone().lazy().filter(predicate).collect()?;

    tracing::debug!(
        %year,
        states = ?states,
        rows = filtered.height(),
        "applied selection"
    );

    Ok(filtered)
}
