//! Configuration management.
//!
//! Configuration is loaded with figment from (in order of precedence,
//! highest first):
//! 1. Environment variables prefixed with `FATAL_FORCE_` (`__` separates
//!    sections, e.g. `FATAL_FORCE_CHARTS__CITY_LIMIT=5`)
//! 2. A TOML file, `fatal-force.toml` in the working directory by default
//! 3. Default values

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dashboard::ViewSettings;
use crate::stats::{AgeStatistic, DEFAULT_BIN_SIZE, DEFAULT_CITY_LIMIT, DEFAULT_KDE_POINTS};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "fatal-force.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FATAL_FORCE_";

/// Published incident table.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/s-lasch/CIS-280/main/police_fatalities.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub charts: ChartsConfig,
    pub window: WindowConfig,
}

/// Where the incident table and boundary file come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Remote CSV, used when `csv_path` is not set.
    pub source_url: String,
    /// Local CSV that replaces the remote fetch.
    pub csv_path: Option<PathBuf>,
    /// GeoJSON state boundaries for the map.
    pub geo_path: PathBuf,
    /// Identifier columns dropped on load.
    pub drop_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Cities kept by the cities chart.
    pub city_limit: usize,
    /// Points on each age density curve.
    pub kde_points: usize,
    /// Histogram bin width, in years; the age curves give the share of
    /// victims per bin of this width.
    pub bin_size: f64,
    /// Initial statistic marked on the age plots.
    pub age_statistic: AgeStatistic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            csv_path: None,
            geo_path: PathBuf::from("data/usa.json"),
            drop_columns: vec!["UID".to_string()],
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            city_limit: DEFAULT_CITY_LIMIT,
            kde_points: DEFAULT_KDE_POINTS,
            bin_size: DEFAULT_BIN_SIZE,
            age_statistic: AgeStatistic::Mean,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "U.S. Fatal Force Data Analysis".to_string(),
            width: 1400.0,
            height: 900.0,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        tracing::debug!(file = %config_file.display(), "configuration loaded");
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.charts.city_limit == 0 {
            return Err(ConfigError::Validation(
                "charts.city_limit must be greater than 0".to_string(),
            ));
        }
        if self.charts.kde_points < 2 {
            return Err(ConfigError::Validation(
                "charts.kde_points must be at least 2".to_string(),
            ));
        }
        if !(self.charts.bin_size > 0.0 && self.charts.bin_size.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "charts.bin_size must be a positive number, got {}",
                self.charts.bin_size
            )));
        }
        if self.data.csv_path.is_none() && self.data.source_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "data.source_url is empty and no data.csv_path is set".to_string(),
            ));
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }

    /// Settings for one dashboard computation.
    #[must_use]
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            city_limit: self.charts.city_limit,
            kde_points: self.charts.kde_points,
            bin_size: self.charts.bin_size,
            age_statistic: self.charts.age_statistic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.data.drop_columns, vec!["UID".to_string()]);
        assert_eq!(config.charts.city_limit, 10);
        assert_eq!(config.charts.kde_points, 500);
        assert_eq!(config.charts.bin_size, 6.0);
        assert_eq!(config.view_settings().bin_size, 6.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_positive_bin_size() {
        let mut config = Config::default();
        config.charts.bin_size = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.charts.bin_size = -6.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_city_limit() {
        let mut config = Config::default();
        config.charts.city_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_requires_a_source() {
        let mut config = Config::default();
        config.data.source_url = "  ".to_string();
        assert!(config.validate().is_err());
        config.data.csv_path = Some(PathBuf::from("local.csv"));
        assert!(config.validate().is_ok());
    }

    // Anything that calls `load_from` runs inside `figment::Jail`.

    #[test]
    fn test_missing_file_uses_defaults() {
        figment::Jail::expect_with(|_| {
            let config = Config::load_from(Some(PathBuf::from("does/not/exist.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[data]
csv_path = "incidents.csv"

[charts]
city_limit = 5
age_statistic = "Median"
"#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("custom.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.data.csv_path, Some(PathBuf::from("incidents.csv")));
            assert_eq!(config.charts.city_limit, 5);
            assert_eq!(config.charts.kde_points, DEFAULT_KDE_POINTS);
            assert_eq!(config.charts.age_statistic, AgeStatistic::Median);
            assert_eq!(config.window, WindowConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_value_fails_validation() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[charts]\nkde_points = 1\n")?;
            let err = Config::load_from(Some(PathBuf::from("bad.toml"))).unwrap_err();
            assert!(err.to_string().contains("kde_points"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
[charts]
city_limit = 5
bin_size = 5.0
"#,
            )?;
            jail.set_env("FATAL_FORCE_CHARTS__CITY_LIMIT", "3");

            let config = Config::load_from(None).map_err(|e| e.to_string())?;
            assert_eq!(config.charts.city_limit, 3);
            assert_eq!(config.charts.bin_size, 5.0);
            assert_eq!(config.charts.kde_points, DEFAULT_KDE_POINTS);
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"city_limit\":10"));
    }
}
