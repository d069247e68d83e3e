use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a [`Dataset`](crate::models::Dataset) from the input file.
///
/// Always fatal at startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The input file does not exist.
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),

    /// The input file exists but could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file (bad encoding, broken quoting, ...).
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column the loader cannot work without is absent from the header.
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// The file has no header row at all.
    #[error("Data file is empty: {0}")]
    Empty(PathBuf),
}

/// A user-supplied filter value that does not name a valid choice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterValidationError {
    #[error("Unknown daypart '{0}' (expected Morning, Afternoon, Evening or Night)")]
    UnknownDaypart(String),

    #[error("Unknown day type '{0}' (expected Weekend or Weekday)")]
    UnknownDayType(String),

    /// An item filter that is blank after trimming.
    #[error("Item filter must not be empty")]
    EmptyItem,

    #[error("Top-N value {value} is outside {min}..={max}")]
    TopNOutOfRange { value: usize, min: usize, max: usize },
}
