use crate::assets::{Asset, AssetMap, PredictedReturns};
use crate::data::{HistoricalDataset, HistoricalSeries};
use crate::error::{DataFormatError, Result};
use tracing::debug;

/// Ordinary least-squares line `value = slope * period + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Fits the trend over every point of the series. Needs at least two
    /// points; periods are distinct by construction of the series.
    pub fn fit(asset: Asset, series: &HistoricalSeries) -> Result<Self, DataFormatError> {
        let points = series.points();
        if points.len() < 2 {
            return Err(DataFormatError::InsufficientRows {
                asset,
                rows: points.len(),
            });
        }

        // Constant series: exact zero slope, no accumulated rounding.
        let first = points[0].1;
        if points.iter().all(|&(_, v)| v == first) {
            return Ok(Self {
                slope: 0.0,
                intercept: first,
            });
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(p, _)| p as f64).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, v)| v).sum::<f64>() / n;

        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(p, v)| {
            let dx = p as f64 - mean_x;
            (sxy + dx * (v - mean_y), sxx + dx * dx)
        });

        let slope = sxy / sxx;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, period: i64) -> f64 {
        self.slope * period as f64 + self.intercept
    }
}

/// Extrapolates every asset's trend to one period past the dataset's latest
/// period, so all forecasts share a horizon.
pub fn predict_returns(dataset: &HistoricalDataset) -> Result<PredictedReturns> {
    let next = dataset.last_period().unwrap_or_default() + 1;
    let returns = AssetMap::try_from_fn(|asset| {
        let series = dataset.series(asset);
        let trend = LinearTrend::fit(asset, series)?;
        let forecast = trend.predict(next);
        debug!(
            "{}: slope={:.6}, intercept={:.6}, forecast[{}]={:.6}",
            asset, trend.slope, trend.intercept, next, forecast
        );
        Ok::<_, DataFormatError>(forecast)
    })?;
    Ok(returns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocError;

    fn dataset(csv: &str) -> HistoricalDataset {
        HistoricalDataset::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_exact_linear_series_extrapolates() {
        let data = dataset(
            "Year,Equity,Bonds,Gold,Cash\n\
             2020,0.10,0.05,0.08,0.02\n\
             2021,0.12,0.04,0.07,0.02\n\
             2022,0.14,0.03,0.06,0.02\n",
        );
        let returns = predict_returns(&data).unwrap();
        assert!((returns[Asset::Equity] - 0.16).abs() < 1e-9);
        assert!((returns[Asset::Bonds] - 0.02).abs() < 1e-9);
        assert!((returns[Asset::Gold] - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_blank_last_cell_keeps_common_horizon() {
        let data = dataset(
            "Year,Equity,Bonds,Gold,Cash\n\
             2019,0.10,0.05,0.08,0.02\n\
             2020,0.12,0.04,0.07,0.02\n\
             2021,0.14,0.03,0.06,0.02\n\
             2022,,0.02,0.05,0.02\n",
        );
        let returns = predict_returns(&data).unwrap();
        // Equity stops at 2021 but is still forecast for 2023.
        assert!((returns[Asset::Equity] - 0.18).abs() < 1e-9);
        assert!((returns[Asset::Bonds] - 0.01).abs() < 1e-9);
        assert!((returns[Asset::Gold] - 0.04).abs() < 1e-9);
        assert_eq!(returns[Asset::Cash], 0.02);
    }

    #[test]
    fn test_constant_series_forecasts_the_constant() {
        let data = dataset(
            "Year,Equity,Bonds,Gold,Cash\n\
             2015,0.1,0.3,-0.07,0.02\n\
             2016,0.1,0.3,-0.07,0.02\n\
             2019,0.1,0.3,-0.07,0.02\n",
        );
        let returns = predict_returns(&data).unwrap();
        assert_eq!(returns[Asset::Equity], 0.1);
        assert_eq!(returns[Asset::Bonds], 0.3);
        assert_eq!(returns[Asset::Gold], -0.07);
        assert_eq!(returns[Asset::Cash], 0.02);
    }

    #[test]
    fn test_fit_matches_closed_form() {
        let series = HistoricalSeries::new(vec![(1, 1.0), (2, 3.0), (3, 2.0), (4, 5.0)]).unwrap();
        let trend = LinearTrend::fit(Asset::Gold, &series).unwrap();
        // mean_x = 2.5, mean_y = 2.75, sxy = 5.5, sxx = 5
        assert!((trend.slope - 1.1).abs() < 1e-12);
        assert!(trend.intercept.abs() < 1e-12);
        assert!((trend.predict(5) - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_declining_trend_can_go_negative() {
        let data = dataset(
            "Year,Equity,Bonds,Gold,Cash\n\
             2020,0.04,0.05,0.08,0.02\n\
             2021,0.01,0.04,0.07,0.02\n\
             2022,-0.02,0.03,0.06,0.02\n",
        );
        let returns = predict_returns(&data).unwrap();
        assert!((returns[Asset::Equity] + 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_single_row_is_insufficient() {
        let data = dataset("Year,Equity,Bonds,Gold,Cash\n2020,0.1,0.1,0.1,0.1\n");
        let err = predict_returns(&data).unwrap_err();
        assert!(matches!(
            err,
            AllocError::DataFormat(DataFormatError::InsufficientRows { asset: Asset::Equity, rows: 1 })
        ));
    }

    #[test]
    fn test_insufficient_rows_reported_per_asset() {
        let data = dataset(
            "Year,Equity,Bonds,Gold,Cash\n\
             2020,0.1,0.1,,0.1\n\
             2021,0.1,0.1,0.2,0.1\n",
        );
        let err = predict_returns(&data).unwrap_err();
        assert!(matches!(
            err,
            AllocError::DataFormat(DataFormatError::InsufficientRows { asset: Asset::Gold, rows: 1 })
        ));
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let csv = "Year,Equity,Bonds,Gold,Cash\n2018,0.07,0.03,0.11,0.01\n2019,0.21,0.06,0.02,0.015\n2020,0.13,0.05,0.19,0.005\n";
        let first = predict_returns(&dataset(csv)).unwrap();
        let second = predict_returns(&dataset(csv)).unwrap();
        assert_eq!(first, second);
    }
}
