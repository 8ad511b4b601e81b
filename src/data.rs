//! Historical return dataset: one period column plus one return column per
//! asset, loaded from CSV.

use crate::assets::{Asset, AssetMap};
use crate::config::PERIOD_COLUMN;
use crate::error::DataFormatError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// (period, value) pairs for one asset, strictly increasing in period.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalSeries {
    points: Vec<(i64, f64)>,
}

impl HistoricalSeries {
    /// Orders the points by period. Two points sharing a period are rejected.
    pub fn new(mut points: Vec<(i64, f64)>) -> Result<Self, DataFormatError> {
        points.sort_by_key(|&(period, _)| period);
        if let Some(w) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DataFormatError::DuplicatePeriod { period: w[0].0 });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(i64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_period(&self) -> Option<i64> {
        self.points.last().map(|&(period, _)| period)
    }
}

/// Read-only historical input to the forecaster.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalDataset {
    series: AssetMap<HistoricalSeries>,
}

impl HistoricalDataset {
    pub fn from_series(series: AssetMap<HistoricalSeries>) -> Self {
        Self { series }
    }

    pub fn series(&self, asset: Asset) -> &HistoricalSeries {
        self.series.get(asset)
    }

    /// Latest period observed for any asset. A blank trailing cell does not
    /// pull the dataset's horizon back.
    pub fn last_period(&self) -> Option<i64> {
        self.series.values().filter_map(HistoricalSeries::last_period).max()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DataFormatError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataFormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (dataset, records) = Self::read_records(file)?;
        info!("Loaded historical dataset from {} ({} records)", path.display(), records);
        Ok(dataset)
    }

    /// Parses CSV with a header row. Header names and cells are trimmed.
    /// Blank asset cells are skipped for that asset only.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataFormatError> {
        Self::read_records(reader).map(|(dataset, _)| dataset)
    }

    /// Returns the dataset and the number of CSV records read.
    fn read_records<R: Read>(reader: R) -> Result<(Self, usize), DataFormatError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();

        let period_idx = column_index(&headers, PERIOD_COLUMN)?;
        let asset_idx = AssetMap::try_from_fn(|asset| column_index(&headers, asset.as_str()))?;

        let mut points: AssetMap<Vec<(i64, f64)>> = AssetMap::from_fn(|_| Vec::new());
        let mut records = 0usize;

        for record in reader.records() {
            let record = record?;
            records += 1;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw_period = record.get(period_idx).unwrap_or("");
            let period: i64 = raw_period
                .parse()
                .map_err(|_| invalid_value(line, PERIOD_COLUMN, raw_period))?;

            for asset in Asset::ALL {
                let raw = record.get(asset_idx[asset]).unwrap_or("");
                if raw.is_empty() {
                    debug!("line {}: blank {} cell skipped", line, asset);
                    continue;
                }
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| invalid_value(line, asset.as_str(), raw))?;
                points[asset].push((period, value));
            }
        }

        let series = AssetMap::try_from_fn(|asset| {
            HistoricalSeries::new(std::mem::take(&mut points[asset]))
        })?;
        debug!("Parsed {} CSV records", records);
        Ok((Self { series }, records))
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, DataFormatError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataFormatError::MissingColumn {
            column: name.to_string(),
            found: headers.iter().map(String::from).collect(),
        })
}

fn invalid_value(line: u64, column: &str, value: &str) -> DataFormatError {
    DataFormatError::InvalidValue {
        line,
        column: column.to_string(),
        value: value.to_string(),
    }
}
