//! Trend-following allocation across Equity, Bonds, Gold and Cash.
//!
//! The pipeline fits a linear trend to each asset's historical returns,
//! looks up the baseline weights for a risk tier, optionally scales the
//! forecasts by a market scenario, and blends forecasts with baseline
//! weights into a normalized portfolio.

pub mod assets;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod pipeline;
pub mod portfolio;
pub mod report;
pub mod risk;
pub mod scenario;
pub mod server;

pub use assets::{Asset, AssetMap, BaselineWeights, FinalPortfolio, PredictedReturns};
pub use data::{HistoricalDataset, HistoricalSeries};
pub use error::{AllocError, DataFormatError};
pub use forecast::{LinearTrend, predict_returns};
pub use pipeline::{AllocationReport, AllocationRequest, FallbackPolicy, run_pipeline};
pub use portfolio::{PortfolioMetrics, compute_metrics, optimize_portfolio};
pub use risk::{RiskTier, get_risk_profile, get_risk_profile_for_label};
pub use scenario::{MarketScenario, adjust};
