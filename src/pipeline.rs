//! Forecast → risk profile → scenario adjustment → blend, as one pure call.

use crate::assets::{AssetMap, BaselineWeights, FinalPortfolio, PredictedReturns};
use crate::data::HistoricalDataset;
use crate::error::{AllocError, Result};
use crate::forecast::predict_returns;
use crate::portfolio::{PortfolioMetrics, allocate_amount, compute_metrics, optimize_portfolio};
use crate::risk::{RiskTier, get_risk_profile};
use crate::scenario::adjust;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the caller wants when the blend is undefined (zero denominator).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Propagate `DivisionUndefined`.
    #[default]
    Fail,
    /// 25% in every asset.
    EqualWeight,
    /// The tier's baseline weights, unadjusted.
    Baseline,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AllocationRequest {
    pub tier: RiskTier,
    pub multiplier: f64,
    pub investment_amount: Option<f64>,
    pub fallback: FallbackPolicy,
}

impl AllocationRequest {
    pub fn new(tier: RiskTier) -> Self {
        Self {
            tier,
            multiplier: 1.0,
            investment_amount: None,
            fallback: FallbackPolicy::Fail,
        }
    }
}

/// Everything a presentation layer needs from one pipeline run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AllocationReport {
    pub tier: RiskTier,
    pub multiplier: f64,
    /// Trend forecast before the scenario multiplier.
    pub predicted_returns: PredictedReturns,
    /// Returns actually blended.
    pub adjusted_returns: PredictedReturns,
    pub baseline_weights: BaselineWeights,
    pub portfolio: FinalPortfolio,
    pub metrics: PortfolioMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amounts: Option<AssetMap<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_applied: Option<FallbackPolicy>,
}

/// Runs the full pipeline. Holds no state between calls: identical inputs
/// produce identical reports. A non-finite multiplier is rejected up front.
pub fn run_pipeline(dataset: &HistoricalDataset, request: &AllocationRequest) -> Result<AllocationReport> {
    if !request.multiplier.is_finite() {
        return Err(AllocError::InvalidMultiplier(request.multiplier));
    }
    info!(
        "Allocating: tier={}, multiplier={:.2}, amount={:?}",
        request.tier, request.multiplier, request.investment_amount
    );

    let predicted_returns = predict_returns(dataset)?;
    let baseline_weights = get_risk_profile(request.tier);
    let adjusted_returns = adjust(&predicted_returns, request.multiplier);

    let (portfolio, fallback_applied) = match optimize_portfolio(&adjusted_returns, &baseline_weights) {
        Ok(weights) => (weights, None),
        Err(AllocError::DivisionUndefined) if request.fallback != FallbackPolicy::Fail => {
            warn!(
                "Blend undefined for tier {}; applying {:?} fallback.",
                request.tier, request.fallback
            );
            let weights = match request.fallback {
                FallbackPolicy::EqualWeight => AssetMap::uniform(0.25),
                _ => baseline_weights.clone(),
            };
            (weights, Some(request.fallback))
        }
        Err(e) => return Err(e),
    };

    let metrics = compute_metrics(&portfolio, &adjusted_returns);
    let amounts = request
        .investment_amount
        .map(|amount| allocate_amount(&portfolio, amount));

    info!(
        "Expected return {:.2}%, volatility {:.2}%, Sharpe {:.2}",
        metrics.expected_return * 100.0,
        metrics.volatility * 100.0,
        metrics.sharpe_ratio
    );

    Ok(AllocationReport {
        tier: request.tier,
        multiplier: request.multiplier,
        predicted_returns,
        adjusted_returns,
        baseline_weights,
        portfolio,
        metrics,
        investment_amount: request.investment_amount,
        amounts,
        fallback_applied,
    })
}
