//! Data module - CSV loading, normalization and selection

mod dataset;
mod filter;
mod loader;
pub mod states;

pub use dataset::{
    float_values, int_values, records_from_frame, string_values, DataSource, Dataset,
    IncidentRecord, REQUIRED_COLUMNS,
};
pub use filter::{
    filter_incidents, SelectionError, StateSelection, YearSelection, ALL_STATES, ALL_YEARS,
};
pub use loader::{DataLoader, LoaderError};

#[cfg(test)]
pub(crate) use dataset::fixtures;
