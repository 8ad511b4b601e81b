use crate::assets::{AssetMap, BaselineWeights, FinalPortfolio, PredictedReturns};
use crate::config::{RISK_FREE_RATE, WEIGHT_DECIMALS};
use crate::error::{AllocError, Result};
use serde::Serialize;
use tracing::{debug, info};

// ──────────────────────────────────────────────────────────────────────────────
// Data Structures
// ──────────────────────────────────────────────────────────────────────────────

/// Summary statistics of a final portfolio against the returns it was built
/// from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub expected_return: f64,
    /// Dispersion proxy: weighted deviation of each asset's return from the
    /// cross-asset mean.
    pub volatility: f64,
    pub sharpe_ratio: f64,
}

// ──────────────────────────────────────────────────────────────────────────────
// Blender
// ──────────────────────────────────────────────────────────────────────────────

/// Blends predicted returns with baseline weights and normalizes the result.
///
///   1. raw weight = predicted return × baseline weight, per asset
///   2. divide each raw weight by the sum of raw weights
///   3. round to `WEIGHT_DECIMALS` places
///
/// Rounding can leave the weights a few thousandths away from 1.0; that
/// drift is kept. A zero or non-finite sum is `DivisionUndefined`, and so is
/// a sum so close to zero that any weight overflows to a non-finite value.
/// Choosing a substitute allocation is the caller's decision.
pub fn optimize_portfolio(
    predicted_returns: &PredictedReturns,
    baseline_weights: &BaselineWeights,
) -> Result<FinalPortfolio> {
    let raw = predicted_returns.weighted_by(baseline_weights);
    let denominator = raw.sum();

    if denominator == 0.0 || !denominator.is_finite() {
        return Err(AllocError::DivisionUndefined);
    }

    for (asset, w) in raw.iter() {
        debug!("{}: raw weight {:.6}", asset, w);
    }

    let weights = raw.map(|_, w| round_weight(w / denominator));
    if weights.values().any(|w| !w.is_finite()) {
        debug!("Raw sum {:e} too close to zero; weights overflow", denominator);
        return Err(AllocError::DivisionUndefined);
    }
    info!(
        "Blended portfolio (raw sum {:.6}, weight sum {:.3})",
        denominator,
        weights.sum()
    );
    Ok(weights)
}

/// Rounds half to even, so x.xxx5 ties do not all drift upward.
fn round_weight(w: f64) -> f64 {
    let scale = 10f64.powi(WEIGHT_DECIMALS);
    (w * scale).round_ties_even() / scale
}

// ──────────────────────────────────────────────────────────────────────────────
// Metrics
// ──────────────────────────────────────────────────────────────────────────────

fn portfolio_return(weights: &AssetMap<f64>, returns: &AssetMap<f64>) -> f64 {
    weights.weighted_by(returns).sum()
}

fn portfolio_volatility(weights: &AssetMap<f64>, returns: &AssetMap<f64>) -> f64 {
    let mean = returns.mean();
    let var: f64 = weights
        .iter()
        .map(|(asset, w)| w * (returns[asset] - mean).powi(2))
        .sum();
    // Negative weights can push the sum below zero.
    var.max(0.0).sqrt()
}

/// Expected return, volatility proxy and Sharpe ratio of `weights` held
/// against `returns`.
pub fn compute_metrics(weights: &FinalPortfolio, returns: &PredictedReturns) -> PortfolioMetrics {
    let expected_return = portfolio_return(weights, returns);
    let volatility = portfolio_volatility(weights, returns);
    let sharpe_ratio = if volatility == 0.0 {
        0.0
    } else {
        (expected_return - RISK_FREE_RATE) / volatility
    };

    PortfolioMetrics {
        expected_return,
        volatility,
        sharpe_ratio,
    }
}

/// Splits `amount` across assets by weight.
pub fn allocate_amount(weights: &FinalPortfolio, amount: f64) -> AssetMap<f64> {
    weights.map(|_, w| amount * w)
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
