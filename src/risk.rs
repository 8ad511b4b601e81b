use crate::assets::{AssetMap, BaselineWeights};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Investor risk-tolerance bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

// Equity, Bonds, Gold, Cash
const LOW_PROFILE: BaselineWeights = AssetMap::new([0.2, 0.5, 0.2, 0.1]);
const MEDIUM_PROFILE: BaselineWeights = AssetMap::new([0.4, 0.3, 0.2, 0.1]);
const HIGH_PROFILE: BaselineWeights = AssetMap::new([0.6, 0.2, 0.1, 0.1]);

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Resolves a user-supplied label. Only the exact strings `"Low"` and
    /// `"Medium"` select those tiers; every other input, including case or
    /// whitespace variants, resolves to `High`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            other => {
                warn!("Unrecognized risk level {:?}; using the High risk profile.", other);
                Self::High
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Baseline allocation for a tier.
pub fn get_risk_profile(tier: RiskTier) -> BaselineWeights {
    match tier {
        RiskTier::Low => LOW_PROFILE,
        RiskTier::Medium => MEDIUM_PROFILE,
        RiskTier::High => HIGH_PROFILE,
    }
}

pub fn get_risk_profile_for_label(label: &str) -> BaselineWeights {
    get_risk_profile(RiskTier::from_label(label))
}
