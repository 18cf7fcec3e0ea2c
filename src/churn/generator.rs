//! Churn ranking generator
//!
//! Holds the fixed table of observed churn factors and produces the
//! ranked ordering consumed by the diagnostic chart. Pure function of
//! the table; no I/O.

use super::ChurnFactor;
use crate::error::DashboardError;

/// Blended churn rate across all segments, drawn as a reference marker
pub const OVERALL_CHURN_RATE_PCT: f64 = 26.5;

/// Build the fixed factor table from the churn study.
/// Format: (factor name, churn rate %, sample size)
fn build_churn_factors() -> Vec<ChurnFactor> {
    let rows: &[(&str, f64, u32)] = &[
        ("Month-to-month contract", 42.7, 3875),
        ("3+ support calls (60 days)", 38.2, 892),
        ("Tenure < 6 months", 34.5, 1456),
        ("Electronic check payment", 33.1, 2365),
        ("Fiber optic internet", 30.8, 3096),
        ("No online security add-on", 28.4, 3498),
        ("No tech support add-on", 26.1, 3473),
        ("Paperless billing", 24.3, 4171),
        ("Senior citizen", 21.6, 1142),
        ("1-year contract", 11.3, 1473),
        ("Bank transfer payment", 8.7, 1286),
        ("2-year contract", 2.8, 1695),
    ];

    rows.iter()
        .map(|&(name, churn_rate, sample_size)| ChurnFactor::new(name, churn_rate, sample_size))
        .collect()
}

/// The factor table plus its ranking operation
pub struct ChurnTable {
    factors: Vec<ChurnFactor>,
}

impl ChurnTable {
    /// Table with the shipped study data
    pub fn new() -> Self {
        Self {
            factors: build_churn_factors(),
        }
    }

    /// Substitute table, used by tests
    pub fn with_factors(factors: Vec<ChurnFactor>) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &[ChurnFactor] {
        &self.factors
    }

    /// Factors sorted ascending by churn rate. The sort is stable, so
    /// ties keep their table order.
    pub fn ranked(&self) -> Result<Vec<ChurnFactor>, DashboardError> {
        if self.factors.is_empty() {
            return Err(DashboardError::invalid_input(
                "churn factor table is empty",
            ));
        }
        let mut ranked = self.factors.clone();
        ranked.sort_by(|a, b| a.churn_rate.total_cmp(&b.churn_rate));
        Ok(ranked)
    }
}

impl Default for ChurnTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::churn::RiskTier;
    use std::collections::HashSet;

    #[test]
    fn test_table_shape() {
        let table = ChurnTable::new();
        assert_eq!(table.factors().len(), 12);

        // No two factors share a name
        let names: HashSet<&str> = table.factors().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), 12);

        // Rates are valid percentages, samples positive
        assert!(table
            .factors()
            .iter()
            .all(|f| (0.0..=100.0).contains(&f.churn_rate) && f.sample_size > 0));
    }

    #[test]
    fn test_ranking_is_ascending() {
        let ranked = ChurnTable::new().ranked().expect("ranking failed");
        for pair in ranked.windows(2) {
            assert!(pair[0].churn_rate <= pair[1].churn_rate);
        }
        assert_eq!(ranked[0].name, "2-year contract");
        assert_eq!(ranked[11].name, "Month-to-month contract");
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let table = ChurnTable::with_factors(vec![
            ChurnFactor::new("first at 20", 20.0, 100),
            ChurnFactor::new("below", 5.0, 100),
            ChurnFactor::new("second at 20", 20.0, 100),
        ]);
        let ranked = table.ranked().expect("ranking failed");
        assert_eq!(ranked[0].name, "below");
        assert_eq!(ranked[1].name, "first at 20");
        assert_eq!(ranked[2].name, "second at 20");
    }

    #[test]
    fn test_empty_table_is_invalid_input() {
        let result = ChurnTable::with_factors(Vec::new()).ranked();
        assert!(matches!(result, Err(DashboardError::InvalidInput(_))));
    }

    #[test]
    fn test_known_tier_assignments() {
        let ranked = ChurnTable::new().ranked().expect("ranking failed");

        let high: Vec<&str> = ranked
            .iter()
            .filter(|f| f.risk_tier() == RiskTier::High)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            high,
            vec![
                "Fiber optic internet",
                "Electronic check payment",
                "Tenure < 6 months",
                "3+ support calls (60 days)",
                "Month-to-month contract",
            ]
        );

        assert!(ranked
            .iter()
            .filter(|f| f.churn_rate >= 30.0)
            .all(|f| f.risk_tier() == RiskTier::High));
    }
}
