use crate::assets::Asset;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or incomplete historical dataset.
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("failed to read dataset '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected '{column}' column, found {found:?}")]
    MissingColumn { column: String, found: Vec<String> },
    #[error("line {line}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },
    #[error("period {period} appears more than once")]
    DuplicatePeriod { period: i64 },
    #[error("{asset} has {rows} historical rows; at least 2 are required to fit a trend")]
    InsufficientRows { asset: Asset, rows: usize },
}

/// Top-level error type for the allocation pipeline.
#[derive(Debug, Error)]
pub enum AllocError {
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    #[error("return multiplier must be finite, got {0}")]
    InvalidMultiplier(f64),

    #[error("portfolio weights are undefined: predicted returns times baseline weights sum to zero")]
    DivisionUndefined,
}

pub type Result<T, E = AllocError> = std::result::Result<T, E>;
