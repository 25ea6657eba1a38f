//! Fatal Force - U.S. police fatal force data exploration
//!
//! Loads the incident table, filters it by year and state, and builds the
//! race, city, state map, gender and age views shown by the dashboard.

pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod gui;
pub mod logging;
pub mod stats;

pub use config::Config;
pub use dashboard::{DashboardViews, SelectionSummary, ViewSettings};
pub use data::{DataLoader, Dataset, StateSelection, YearSelection};
pub use logging::init_logging;
