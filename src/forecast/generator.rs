//! Synthetic forecast-series generator
//!
//! Builds the historical demand series and the forward forecast from
//! fixed constants:
//! - linear trend across the historical range
//! - seasonal offset keyed by calendar month
//! - seeded normal noise (historical only), clamped to a floor
//! - forecast trend/seasonal with a linearly widening confidence band
//!
//! The noise generator is constructed fresh per call from a fixed seed,
//! so repeated generations are identical and concurrent calls share
//! no state.

use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use super::{ForecastPoint, ForecastSeries, HistoricalSeries, TimePoint};
use crate::error::DashboardError;

/// Parameters for series generation. All default to the fixed constants
/// the dashboard ships with; the struct exists so tests can substitute
/// tables and ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastParams {
    /// First historical month as (year, month)
    #[serde(default = "default_history_start")]
    pub history_start: (i32, u32),

    /// Last historical month as (year, month), inclusive
    #[serde(default = "default_history_end")]
    pub history_end: (i32, u32),

    /// Trend level at the first historical month
    #[serde(default = "default_trend_start")]
    pub trend_start: f64,

    /// Trend level at the last historical month
    #[serde(default = "default_trend_end")]
    pub trend_end: f64,

    /// Standard deviation of the historical noise term
    #[serde(default = "default_noise_std_dev")]
    pub noise_std_dev: f64,

    /// Fixed seed for the noise generator
    #[serde(default = "default_noise_seed")]
    pub noise_seed: u64,

    /// Minimum historical value after noise
    #[serde(default = "default_value_floor")]
    pub value_floor: f64,

    /// Number of forecast months after the historical end
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    /// Forecast trend level at the first forecast month
    #[serde(default = "default_forecast_trend_start")]
    pub forecast_trend_start: f64,

    /// Forecast trend level at the last forecast month
    #[serde(default = "default_forecast_trend_end")]
    pub forecast_trend_end: f64,

    /// Confidence half-width before the widening multiplier
    #[serde(default = "default_base_half_width")]
    pub base_half_width: f64,

    /// Band multiplier at the first forecast month
    #[serde(default = "default_band_mult_start")]
    pub band_mult_start: f64,

    /// Band multiplier at the last forecast month
    #[serde(default = "default_band_mult_end")]
    pub band_mult_end: f64,
}

fn default_history_start() -> (i32, u32) { (2020, 1) }
fn default_history_end() -> (i32, u32) { (2024, 12) }
fn default_trend_start() -> f64 { 100.0 }
fn default_trend_end() -> f64 { 160.0 }
fn default_noise_std_dev() -> f64 { 8.0 }
fn default_noise_seed() -> u64 { 42 }
fn default_value_floor() -> f64 { 50.0 }
fn default_horizon_months() -> u32 { 12 }
fn default_forecast_trend_start() -> f64 { 160.0 }
fn default_forecast_trend_end() -> f64 { 175.0 }
fn default_base_half_width() -> f64 { 15.0 }
fn default_band_mult_start() -> f64 { 1.0 }
fn default_band_mult_end() -> f64 { 2.5 }

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            history_start: default_history_start(),
            history_end: default_history_end(),
            trend_start: default_trend_start(),
            trend_end: default_trend_end(),
            noise_std_dev: default_noise_std_dev(),
            noise_seed: default_noise_seed(),
            value_floor: default_value_floor(),
            horizon_months: default_horizon_months(),
            forecast_trend_start: default_forecast_trend_start(),
            forecast_trend_end: default_forecast_trend_end(),
            base_half_width: default_base_half_width(),
            band_mult_start: default_band_mult_start(),
            band_mult_end: default_band_mult_end(),
        }
    }
}

/// Historical seasonal offsets indexed by calendar month (January = 0).
/// November/December carry the holiday peak; January dips after it.
fn build_historical_seasonal() -> [f64; 12] {
    let mut table = [0.0; 12];
    table[0] = -15.0; // January
    table[1] = -10.0; // February
    table[5] = 15.0; // June
    table[6] = 15.0; // July
    table[10] = 35.0; // November
    table[11] = 55.0; // December
    table
}

/// Forecast seasonal offsets. Intentionally a separate table from the
/// historical one: the forecast assumes an intensifying seasonal pattern.
fn build_forecast_seasonal() -> [f64; 12] {
    let mut table = [0.0; 12];
    table[0] = -15.0; // January
    table[1] = -10.0; // February
    table[5] = 18.0; // June
    table[6] = 18.0; // July
    table[10] = 40.0; // November
    table[11] = 60.0; // December
    table
}

/// Pre-built generator holding the parameter set and seasonal tables
pub struct ForecastTemplate {
    params: ForecastParams,
    historical_seasonal: [f64; 12],
    forecast_seasonal: [f64; 12],
}

impl ForecastTemplate {
    /// Template with the shipped constants
    pub fn new() -> Self {
        Self::with_params(ForecastParams::default())
    }

    pub fn with_params(params: ForecastParams) -> Self {
        Self {
            params,
            historical_seasonal: build_historical_seasonal(),
            forecast_seasonal: build_forecast_seasonal(),
        }
    }

    pub fn params(&self) -> &ForecastParams {
        &self.params
    }

    /// Generate the historical series and its forward forecast
    pub fn generate(&self) -> Result<(HistoricalSeries, ForecastSeries), DashboardError> {
        let history = self.generate_history()?;
        let last_date = history.last_date().ok_or_else(|| {
            DashboardError::invariant("historical range produced no months")
        })?;
        let forecast = self.generate_forecast(last_date)?;
        Ok((history, forecast))
    }

    fn generate_history(&self) -> Result<HistoricalSeries, DashboardError> {
        let dates = month_end_range(self.params.history_start, self.params.history_end)?;
        let n = dates.len();

        let trend = linspace(self.params.trend_start, self.params.trend_end, n);
        let seasonal: Vec<f64> = dates
            .iter()
            .map(|d| self.historical_seasonal[d.month0() as usize])
            .collect();
        let noise = self.draw_noise(n)?;

        check_lengths(
            n,
            &[
                ("trend", trend.len()),
                ("seasonal", seasonal.len()),
                ("noise", noise.len()),
            ],
        )?;

        let points = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| TimePoint {
                date,
                value: (trend[i] + seasonal[i] + noise[i]).max(self.params.value_floor),
            })
            .collect();

        Ok(HistoricalSeries { points })
    }

    /// Forecast is fully deterministic: trend + seasonal, no noise, with
    /// bounds at predicted ± base_half_width × widening multiplier.
    fn generate_forecast(&self, history_end: NaiveDate) -> Result<ForecastSeries, DashboardError> {
        let n = self.params.horizon_months as usize;
        let dates = months_following(history_end, n)?;

        let trend = linspace(
            self.params.forecast_trend_start,
            self.params.forecast_trend_end,
            n,
        );
        let seasonal: Vec<f64> = dates
            .iter()
            .map(|d| self.forecast_seasonal[d.month0() as usize])
            .collect();
        let multipliers = linspace(self.params.band_mult_start, self.params.band_mult_end, n);

        check_lengths(
            n,
            &[
                ("forecast trend", trend.len()),
                ("forecast seasonal", seasonal.len()),
                ("band multipliers", multipliers.len()),
            ],
        )?;

        let points = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let predicted = trend[i] + seasonal[i];
                let half_width = self.params.base_half_width * multipliers[i];
                ForecastPoint {
                    date,
                    predicted,
                    lower: predicted - half_width,
                    upper: predicted + half_width,
                }
            })
            .collect();

        Ok(ForecastSeries { points })
    }

    fn draw_noise(&self, n: usize) -> Result<Vec<f64>, DashboardError> {
        let normal = Normal::new(0.0, self.params.noise_std_dev).map_err(|e| {
            DashboardError::invalid_input(format!("bad noise distribution parameters: {e}"))
        })?;
        let mut rng = StdRng::seed_from_u64(self.params.noise_seed);
        Ok((0..n).map(|_| normal.sample(&mut rng)).collect())
    }
}

impl Default for ForecastTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// Evenly spaced values from start to end inclusive
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / ((n - 1) as f64);
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Last calendar day of the given month
fn month_end(year: i32, month: u32) -> Result<NaiveDate, DashboardError> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| DashboardError::invalid_input(format!("invalid month {year}-{month:02}")))?;
    Ok(first_of_next - Duration::days(1))
}

/// Month-end dates from start through end inclusive
fn month_end_range(
    start: (i32, u32),
    end: (i32, u32),
) -> Result<Vec<NaiveDate>, DashboardError> {
    let (start_year, start_month) = start;
    let (end_year, end_month) = end;
    if !(1..=12).contains(&start_month) || !(1..=12).contains(&end_month) {
        return Err(DashboardError::invalid_input(format!(
            "month out of range: start {start_month}, end {end_month}"
        )));
    }
    if (start_year, start_month) > (end_year, end_month) {
        return Err(DashboardError::invalid_input(format!(
            "historical range is reversed: {start_year}-{start_month:02} after {end_year}-{end_month:02}"
        )));
    }

    let mut dates = Vec::new();
    let (mut year, mut month) = (start_year, start_month);
    loop {
        dates.push(month_end(year, month)?);
        if (year, month) == (end_year, end_month) {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    Ok(dates)
}

/// Month-end dates for `count` months immediately after the given month
fn months_following(after: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, DashboardError> {
    let mut year = after.year();
    let mut month = after.month();
    let mut dates = Vec::with_capacity(count);
    for _ in 0..count {
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
        dates.push(month_end(year, month)?);
    }
    Ok(dates)
}

fn check_lengths(expected: usize, actual: &[(&str, usize)]) -> Result<(), DashboardError> {
    for (name, len) in actual {
        if *len != expected {
            return Err(DashboardError::invariant(format!(
                "{name} array has {len} entries, expected {expected}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_historical_shape() {
        let (history, _) = ForecastTemplate::new().generate().expect("generation failed");

        // 2020-01 through 2024-12 is 60 months
        assert_eq!(history.len(), 60);

        // Month-end dates, strictly increasing, no duplicate months
        for pair in history.points.windows(2) {
            assert!(pair[1].date > pair[0].date);
            assert!(
                (pair[0].date.year(), pair[0].date.month())
                    != (pair[1].date.year(), pair[1].date.month())
            );
        }
        assert_eq!(history.points[0].date, NaiveDate::from_ymd_opt(2020, 1, 31).unwrap());
        assert_eq!(history.last_date(), NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_historical_floor() {
        let template = ForecastTemplate::new();
        let (history, _) = template.generate().expect("generation failed");
        let floor = template.params().value_floor;
        assert!(history.points.iter().all(|p| p.value >= floor));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let template = ForecastTemplate::new();
        let (first, _) = template.generate().expect("generation failed");
        let (second, _) = template.generate().expect("generation failed");

        assert_eq!(first.len(), second.len());
        for (a, b) in first.points.iter().zip(second.points.iter()) {
            assert_eq!(a.date, b.date);
            assert_relative_eq!(a.value, b.value, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_different_seed_changes_noise() {
        let base = ForecastTemplate::new().generate().expect("generation failed").0;
        let reseeded = ForecastTemplate::with_params(ForecastParams {
            noise_seed: 43,
            ..Default::default()
        })
        .generate()
        .expect("generation failed")
        .0;

        let differing = base
            .points
            .iter()
            .zip(reseeded.points.iter())
            .filter(|(a, b)| (a.value - b.value).abs() > 1e-9)
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn test_forecast_horizon_and_bounds() {
        let (history, forecast) = ForecastTemplate::new().generate().expect("generation failed");

        assert_eq!(forecast.len(), 12);
        // Forecast starts the month after the historical end
        assert_eq!(
            forecast.points[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert!(forecast.points[0].date > history.last_date().unwrap());

        for p in &forecast.points {
            assert!(p.lower <= p.predicted);
            assert!(p.predicted <= p.upper);
        }
    }

    #[test]
    fn test_band_widens_monotonically() {
        let (_, forecast) = ForecastTemplate::new().generate().expect("generation failed");

        for pair in forecast.points.windows(2) {
            assert!(pair[1].half_width() >= pair[0].half_width());
        }
        assert_relative_eq!(forecast.points[0].half_width(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.points[11].half_width(), 37.5, epsilon = 1e-9);
    }

    #[test]
    fn test_forecast_december_peak() {
        let (_, forecast) = ForecastTemplate::new().generate().expect("generation failed");

        // December 2025: trend end 175 plus forecast seasonal +60
        let december = forecast.points.last().unwrap();
        assert_eq!(december.date.month(), 12);
        assert_relative_eq!(december.predicted, 235.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let (_, first) = ForecastTemplate::new().generate().expect("generation failed");
        let (_, second) = ForecastTemplate::new().generate().expect("generation failed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_linspace_endpoints() {
        let values = linspace(100.0, 160.0, 60);
        assert_eq!(values.len(), 60);
        assert_relative_eq!(values[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(values[59], 160.0, epsilon = 1e-9);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_month_end_handles_leap_year() {
        assert_eq!(
            month_end(2020, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
        assert_eq!(
            month_end(2021, 2).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_reversed_range_rejected() {
        let result = month_end_range((2024, 12), (2020, 1));
        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[test]
    fn test_historical_and_forecast_seasonal_tables_differ() {
        let historical = build_historical_seasonal();
        let forecast = build_forecast_seasonal();

        // Same dip months, intensified peak months
        assert_eq!(historical[0], forecast[0]);
        assert_eq!(historical[10], 35.0);
        assert_eq!(forecast[10], 40.0);
        assert_eq!(historical[11], 55.0);
        assert_eq!(forecast[11], 60.0);
    }
}
