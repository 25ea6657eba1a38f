//! Age Distribution Module
//! Descriptive statistics and kernel density curves for victim ages.

use crate::data::{float_values, string_values};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default number of points on a density curve.
pub const DEFAULT_KDE_POINTS: usize = 500;

/// Default histogram bin width, in years, that the age curves are scaled to.
pub const DEFAULT_BIN_SIZE: f64 = 6.0;

#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Invalid kernel: {0}")]
    KernelError(String),
}

/// Which central value marks a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgeStatistic {
    #[default]
    Mean,
    Median,
    Mode,
}

impl AgeStatistic {
    pub const ALL: [AgeStatistic; 3] = [AgeStatistic::Mean, AgeStatistic::Median, AgeStatistic::Mode];

    pub fn label(&self) -> &'static str {
        match self {
            AgeStatistic::Mean => "Mean",
            AgeStatistic::Median => "Median",
            AgeStatistic::Mode => "Mode",
        }
    }

    /// Compute this statistic; `None` for an empty sample.
    pub fn compute(&self, values: &[f64]) -> Option<f64> {
        match self {
            AgeStatistic::Mean => mean(values),
            AgeStatistic::Median => median(values),
            AgeStatistic::Mode => mode(values),
        }
    }
}

impl std::fmt::Display for AgeStatistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A density curve over a sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DensityCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl DensityCurve {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.x.iter().zip(self.y.iter()).map(|(&x, &y)| [x, y])
    }

    /// Multiply every density by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        self.y.iter_mut().for_each(|y| *y *= factor);
        self
    }
}

/// Ages of one gender against all victims in the selection.
#[derive(Debug, Clone, Serialize)]
pub struct AgeDistribution {
    pub gender: String,
    pub statistic: AgeStatistic,
    pub gender_curve: DensityCurve,
    pub overall_curve: DensityCurve,
    pub gender_marker: Option<f64>,
    pub overall_marker: Option<f64>,
    pub gender_count: usize,
    pub overall_count: usize,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Most frequent value; the smallest one when several tie.
pub fn mode(values: &[f64]) -> Option<f64> {
    // Round values to a fixed precision so equal ages share a key
    let precision = 1e6;
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry((v * precision).round() as i64).or_default() += 1;
    }

    let best = counts.values().copied().max()?;
    counts
        .into_iter()
        .find(|(_, count)| *count == best)
        .map(|(key, _)| key as f64 / precision)
}

/// Sample standard deviation (n - 1).
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    let Some(m) = mean(values).filter(|_| n >= 2) else {
        return 0.0;
    };
    (values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated at
/// `points` evenly spaced positions starting at the sample minimum.
///
/// Samples with fewer than two values or no spread give an empty curve.
pub fn kernel_density(values: &[f64], points: usize) -> Result<DensityCurve, DistributionError> {
    let n = values.len();
    let std = sample_std(values);
    if n < 2 || std == 0.0 || points == 0 {
        return Ok(DensityCurve::default());
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let kernel =
        Normal::new(0.0, 1.0).map_err(|e| DistributionError::KernelError(e.to_string()))?;

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / points as f64;

    let x: Vec<f64> = (0..points).map(|i| min + i as f64 * step).collect();
    let scale = 1.0 / (n as f64 * bandwidth);

    // Evaluate the grid in parallel
    let y: Vec<f64> = x
        .par_iter()
        .map(|&xi| {
            values
                .iter()
                .map(|&v| kernel.pdf((xi - v) / bandwidth))
                .sum::<f64>()
                * scale
        })
        .collect();

    Ok(DensityCurve { x, y })
}

/// Non-null ages, optionally restricted to one gender.
pub fn ages(df: &DataFrame, gender: Option<&str>) -> PolarsResult<Vec<f64>> {
    let ages = float_values(df, "Age")?;
    let Some(gender) = gender else {
        return Ok(ages.into_iter().flatten().collect());
    };

    let genders = string_values(df, "Gender")?;
    Ok(ages
        .into_iter()
        .zip(genders)
        .filter_map(|(age, g)| match (age, g) {
            (Some(age), Some(g)) if g == gender => Some(age),
            _ => None,
        })
        .collect())
}

/// Build the age distribution of `gender` against every victim.
///
/// Curves are scaled by `bin_size`, so each value reads as the share of
/// victims in a `bin_size`-year bin around that age.
pub fn age_distribution(
    df: &DataFrame,
    gender: &str,
    statistic: AgeStatistic,
    points: usize,
    bin_size: f64,
) -> Result<AgeDistribution, DistributionError> {
    let overall = ages(df, None)?;
    let subset = ages(df, Some(gender))?;

    let (gender_curve, overall_curve) = rayon::join(
        || kernel_density(&subset, points),
        || kernel_density(&overall, points),
    );

    Ok(AgeDistribution {
        gender: gender.to_string(),
        statistic,
        gender_curve: gender_curve?.scaled(bin_size),
        overall_curve: overall_curve?.scaled(bin_size),
        gender_marker: statistic.compute(&subset),
        overall_marker: statistic.compute(&overall),
        gender_count: subset.len(),
        overall_count: overall.len(),
    })
}
