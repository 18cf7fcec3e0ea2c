//! Visual analytics dashboard
//!
//! Generates two illustrative charts from fixed synthetic data and
//! serves them on a single static HTML page:
//! - a retail demand forecast (historical series plus 12-month forecast
//!   with a widening confidence band)
//! - a churn diagnostic (risk factors ranked and bucketed into tiers)
//!
//! Generation is pure and deterministic; rendering goes through a
//! neutral figure representation so the plotting backend stays swappable.

pub mod churn;
pub mod error;
pub mod figure;
pub mod forecast;
pub mod render;
pub mod server;

pub use churn::{ChurnFactor, ChurnTable, RiskTier, OVERALL_CHURN_RATE_PCT};
pub use error::DashboardError;
pub use forecast::{ForecastParams, ForecastSeries, ForecastTemplate, HistoricalSeries};
