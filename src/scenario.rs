use crate::assets::PredictedReturns;
use serde::{Deserialize, Serialize};

/// Named market conditions, each a uniform multiplier on predicted returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MarketScenario {
    Bull,
    #[default]
    Normal,
    Bear,
}

impl MarketScenario {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Bull => 1.15,
            Self::Normal => 1.0,
            Self::Bear => 0.85,
        }
    }
}

/// Scales every predicted return by `multiplier`.
pub fn adjust(returns: &PredictedReturns, multiplier: f64) -> PredictedReturns {
    returns.map(|_, r| r * multiplier)
}
