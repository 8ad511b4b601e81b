use std::path::PathBuf;
use tracing::{info, warn};

/// Name of the period (independent variable) column in the historical dataset.
pub const PERIOD_COLUMN: &str = "Year";

/// Risk-free rate used in Sharpe calculations.
pub const RISK_FREE_RATE: f64 = 0.04;

/// Decimal places final weights are rounded to.
pub const WEIGHT_DECIMALS: i32 = 3;

/// Absolute drift from 1.0 that a rounded final portfolio may carry.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.004;

/// Dataset shipped with the project, relative to the manifest directory.
pub const DEFAULT_DATA_FILE: &str = "data/market_returns.csv";

/// Environment variable overriding the dataset location.
pub const DATA_PATH_ENV: &str = "TRENDALLOC_DATA";

pub const DEFAULT_PORT: u16 = 8080;

pub fn project_root_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn project_file_path(file_name: &str) -> PathBuf {
    project_root_path().join(file_name)
}

/// Resolves the dataset path: explicit flag, then `TRENDALLOC_DATA`, then the
/// bundled default.
pub fn resolve_data_path(requested: Option<PathBuf>) -> PathBuf {
    if let Some(path) = requested {
        info!("Using dataset from --data: {}", path.display());
        return path;
    }

    if let Ok(path) = std::env::var(DATA_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            info!("Using dataset from {}: {}", DATA_PATH_ENV, trimmed);
            return PathBuf::from(trimmed);
        }
        warn!("{} is set but empty; falling back to the bundled dataset.", DATA_PATH_ENV);
    }

    let path = project_file_path(DEFAULT_DATA_FILE);
    info!("Using bundled dataset: {}", path.display());
    path
}
