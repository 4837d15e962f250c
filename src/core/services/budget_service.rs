use serde::Serialize;

use crate::ledger::{Product, Settings};

/// Outcome of comparing a month's installment load against the monthly profit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetEvaluation {
    pub total_installment_load: f64,
    pub used_percent: f64,
    pub left_percent: f64,
    pub within_safe_threshold: bool,
}

pub struct BudgetService;

impl BudgetService {
    /// Sums the parcels of `active` and checks what share of `monthly_profit` stays free.
    ///
    /// A profit of zero (unset) or below reports 0% used instead of dividing by it.
    pub fn evaluate<'a, I>(active: I, monthly_profit: f64, safe_percentage: f64) -> BudgetEvaluation
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let total_installment_load: f64 = active.into_iter().map(|product| product.parcel).sum();
        let used_percent = if monthly_profit > 0.0 {
            total_installment_load / monthly_profit * 100.0
        } else {
            0.0
        };
        let left_percent = 100.0 - used_percent;
        BudgetEvaluation {
            total_installment_load,
            used_percent,
            left_percent,
            within_safe_threshold: left_percent >= safe_percentage,
        }
    }

    pub fn evaluate_with_settings<'a, I>(active: I, settings: &Settings) -> BudgetEvaluation
    where
        I: IntoIterator<Item = &'a Product>,
    {
        Self::evaluate(active, settings.monthly_profit, settings.safe_percentage)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn with_parcels(parcels: &[f64]) -> Vec<Product> {
        let created = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z").unwrap();
        parcels
            .iter()
            .map(|parcel| Product::new("Item", *parcel, 1, created))
            .collect()
    }

    #[test]
    fn over_committed_month_fails_the_threshold() {
        let products = with_parcels(&[400.0, 300.0, 200.0]);
        let eval = BudgetService::evaluate(&products, 1000.0, 70.0);
        assert_eq!(eval.total_installment_load, 900.0);
        assert!((eval.used_percent - 90.0).abs() < 1e-9);
        assert!((eval.left_percent - 10.0).abs() < 1e-9);
        assert!(!eval.within_safe_threshold);
    }

    #[test]
    fn light_month_passes_the_threshold() {
        let products = with_parcels(&[100.0, 150.0]);
        let eval = BudgetService::evaluate(&products, 1000.0, 70.0);
        assert_eq!(eval.used_percent, 25.0);
        assert_eq!(eval.left_percent, 75.0);
        assert!(eval.within_safe_threshold);
    }

    #[test]
    fn unset_profit_reports_nothing_used() {
        let products = with_parcels(&[400.0, 300.0]);
        for profit in [0.0, -10.0] {
            let eval = BudgetService::evaluate(&products, profit, 70.0);
            assert_eq!(eval.used_percent, 0.0);
            assert_eq!(eval.left_percent, 100.0);
            assert!(eval.within_safe_threshold);
        }
    }

    #[test]
    fn no_active_products_is_a_clean_month() {
        let eval = BudgetService::evaluate(&[] as &[Product], 1000.0, 70.0);
        assert_eq!(eval.total_installment_load, 0.0);
        assert_eq!(eval.left_percent, 100.0);
        assert!(eval.within_safe_threshold);
    }

    #[test]
    fn settings_shortcut_matches_explicit_call() {
        let products = with_parcels(&[650.0]);
        let settings = Settings {
            monthly_profit: 1000.0,
            ..Settings::default()
        };
        let eval = BudgetService::evaluate_with_settings(&products, &settings);
        assert_eq!(eval, BudgetService::evaluate(&products, 1000.0, 70.0));
        assert!(!eval.within_safe_threshold);
    }
}
