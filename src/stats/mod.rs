//! Stats module - count tables and age distributions

mod aggregate;
mod distribution;

pub use aggregate::{
    city_counts, gender_counts, mean_state_value, race_counts, sort_counts, sorted,
    state_counts, value_counts, CategoryCount, CityCount, Counted, SortOrder, StateCount,
    DEFAULT_CITY_LIMIT,
};
pub use distribution::{
    age_distribution, ages, kernel_density, mean, median, mode, sample_std, AgeDistribution,
    AgeStatistic, DensityCurve, DistributionError, DEFAULT_BIN_SIZE, DEFAULT_KDE_POINTS,
};
