//! Synthetic demand series and forward forecast

mod data;
pub mod chart;
pub mod generator;

pub use chart::forecast_figure;
pub use data::{ForecastPoint, ForecastSeries, HistoricalSeries, TimePoint};
pub use generator::{ForecastParams, ForecastTemplate};
