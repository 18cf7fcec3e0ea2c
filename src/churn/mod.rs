//! Churn-factor ranking and risk classification

mod data;
pub mod chart;
pub mod generator;

pub use chart::churn_figure;
pub use data::{ChurnFactor, RiskTier};
pub use generator::{ChurnTable, OVERALL_CHURN_RATE_PCT};
