//! Churn factor records and risk tiers

use serde::{Deserialize, Serialize};

/// One named risk factor with its observed churn rate and sample size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnFactor {
    pub name: String,
    /// Percentage in [0, 100]
    pub churn_rate: f64,
    pub sample_size: u32,
}

impl ChurnFactor {
    pub fn new(name: impl Into<String>, churn_rate: f64, sample_size: u32) -> Self {
        Self {
            name: name.into(),
            churn_rate,
            sample_size,
        }
    }

    /// Risk tier for this factor. Derived, never stored.
    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_rate(self.churn_rate)
    }
}

/// Risk classification by churn-rate thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    LowMedium,
    Medium,
    High,
}

impl RiskTier {
    /// ≥30 high, ≥20 medium, ≥10 low-medium, else low
    pub fn from_rate(churn_rate: f64) -> Self {
        if churn_rate >= 30.0 {
            RiskTier::High
        } else if churn_rate >= 20.0 {
            RiskTier::Medium
        } else if churn_rate >= 10.0 {
            RiskTier::LowMedium
        } else {
            RiskTier::Low
        }
    }

    /// Legend label for this tier
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "High Risk (≥30%)",
            RiskTier::Medium => "Medium Risk (20-30%)",
            RiskTier::LowMedium => "Low-Medium (10-20%)",
            RiskTier::Low => "Low Risk (<10%)",
        }
    }
}
