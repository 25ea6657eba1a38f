//! CSV Data Loader Module
//! Fetches the incident CSV (remote or local) and normalizes it using Polars.

use super::dataset::{DataSource, Dataset, REQUIRED_COLUMNS};
use super::states::normalize_state;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to fetch {url}: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Loads and normalizes the incident table.
#[derive(Debug, Clone)]
pub struct DataLoader {
    drop_columns: Vec<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(vec!["UID".to_string()])
    }
}

impl DataLoader {
    /// `drop_columns` are removed when present; absent ones are ignored.
    pub fn new(drop_columns: Vec<String>) -> Self {
        Self { drop_columns }
    }

    /// Prefer a local file when one is given, otherwise fetch `url`.
    pub fn load(&self, csv_path: Option<&Path>, url: &str) -> Result<Dataset, LoaderError> {
        match csv_path {
            Some(path) => self.load_file(path),
            None => self.load_remote(url),
        }
    }

    /// Fetch the CSV over HTTP and load it.
    pub fn load_remote(&self, url: &str) -> Result<Dataset, LoaderError> {
        tracing::info!(%url, "fetching dataset");

        let fetch_error = |source: reqwest::Error| LoaderError::FetchError {
            url: url.to_string(),
            source,
        };
        let bytes = reqwest::blocking::get(url)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(fetch_error)?;

        tracing::debug!(bytes = bytes.len(), "dataset downloaded");
        let df = Self::parse_csv_bytes(bytes.to_vec())?;
        self.finish(df, DataSource::Remote(url.to_string()))
    }

    /// Load a CSV file from disk.
    pub fn load_file(&self, path: &Path) -> Result<Dataset, LoaderError> {
        tracing::info!(path = %path.display(), "reading dataset");

        if !path.is_file() {
            return Err(LoaderError::IoError {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        self.finish(df, DataSource::File(path.to_path_buf()))
    }

    /// Load CSV text already held in memory.
    pub fn load_bytes(&self, bytes: Vec<u8>) -> Result<Dataset, LoaderError> {
        let df = Self::parse_csv_bytes(bytes)?;
        self.finish(df, DataSource::InMemory)
    }

    fn parse_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    /// Drop identifier columns, check the schema, coerce types and
    /// normalize state names.
    fn finish(&self, df: DataFrame, source: DataSource) -> Result<Dataset, LoaderError> {
        let mut df = self.drop_identifier_columns(df)?;

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(missing) = REQUIRED_COLUMNS
            .into_iter()
            .find(|required| !names.iter().any(|n| n == required))
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let year = df.column("Year")?.cast(&DataType::Int64)?;
        df.with_column(year)?;
        let age = df.column("Age")?.cast(&DataType::Float64)?;
        df.with_column(age)?;

        let states: Vec<Option<String>> = df
            .column("State")?
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.map(normalize_state))
            .collect();
        df.with_column(Column::new("State".into(), states))?;

        tracing::info!(
            rows = df.height(),
            columns = df.width(),
            %source,
            "dataset loaded"
        );

        Ok(Dataset::new(df, source))
    }

    fn drop_identifier_columns(&self, mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        for name in &self.drop_columns {
            let present = df.get_column_names().iter().any(|c| c.as_str() == name);
            if present {
                df = df.drop(name)?;
            }
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "UID,Name,Age,Gender,Race,Date,City,State,Manner_of_death,Armed,Mental_illness,Flee,Year\n\
        1,A,34,Male,White,2015-01-02,Houston,TX,Shot,Gun,False,Car,2015\n\
        2,B,22,Female,Black,2016-03-04,Columbus, OH ,Shot,Knife,False,Foot,2016\n\
        3,C,,Male,Hispanic,2016-05-06,Los Angeles,California,Shot,Unarmed,True,Not fleeing,2016\n";

    #[test]
    fn drops_uid_and_normalizes_states() {
        let ds = DataLoader::default()
            .load_bytes(SAMPLE.as_bytes().to_vec())
            .unwrap();
        let names: Vec<String> = ds
            .frame()
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(!names.contains(&"UID".to_string()));
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.states().unwrap(), vec!["California", "Ohio", "Texas"]);
    }

    #[test]
    fn year_and_age_are_typed() {
        let ds = DataLoader::default()
            .load_bytes(SAMPLE.as_bytes().to_vec())
            .unwrap();
        assert_eq!(ds.frame().column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(ds.frame().column("Age").unwrap().dtype(), &DataType::Float64);
        assert_eq!(ds.years().unwrap(), vec![2015, 2016]);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "UID,Year,State,City,Race,Gender\n1,2015,TX,Houston,White,Male\n";
        let err = DataLoader::default()
            .load_bytes(csv.as_bytes().to_vec())
            .unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "Age"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DataLoader::default()
            .load_file(Path::new("definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::IoError { .. }));
    }
}
