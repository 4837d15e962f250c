use chrono::NaiveDate;
use tracing::info;

use crate::errors::{LedgerError, Result};
use crate::ledger::Ledger;

pub struct SettingsService;

impl SettingsService {
    /// Replaces the monthly profit. Zero is accepted and means "not configured".
    pub fn set_monthly_profit(ledger: &mut Ledger, profit: f64, today: NaiveDate) -> Result<()> {
        if !profit.is_finite() || profit < 0.0 {
            return Err(LedgerError::Validation(format!(
                "monthly profit must be zero or positive, got {profit}"
            )));
        }
        ledger.settings.monthly_profit = profit;
        ledger.touch(today);
        info!(profit, "monthly profit updated");
        Ok(())
    }

    /// Replaces the share of profit that must stay free of installments.
    pub fn set_safe_percentage(ledger: &mut Ledger, percentage: f64) -> Result<()> {
        if !(percentage > 0.0 && percentage <= 100.0) {
            return Err(LedgerError::Validation(format!(
                "safe percentage must be within (0, 100], got {percentage}"
            )));
        }
        ledger.settings.safe_percentage = percentage;
        info!(percentage, "safe percentage updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    #[test]
    fn profit_update_touches_the_ledger() {
        let mut ledger = Ledger::default();
        SettingsService::set_monthly_profit(&mut ledger, 3500.0, today()).unwrap();
        assert_eq!(ledger.settings.monthly_profit, 3500.0);
        assert_eq!(ledger.settings.month, Some(7));
        assert_eq!(ledger.settings.year, Some(2025));
    }

    #[test]
    fn negative_or_non_finite_profit_is_rejected() {
        let mut ledger = Ledger::default();
        for bad in [-1.0, f64::INFINITY, f64::NAN] {
            assert!(SettingsService::set_monthly_profit(&mut ledger, bad, today()).is_err());
        }
        assert_eq!(ledger.settings.monthly_profit, 0.0);
    }

    #[test]
    fn safe_percentage_must_be_in_range() {
        let mut ledger = Ledger::default();
        for bad in [0.0, -5.0, 100.5, f64::NAN] {
            assert!(SettingsService::set_safe_percentage(&mut ledger, bad).is_err());
        }
        SettingsService::set_safe_percentage(&mut ledger, 100.0).unwrap();
        assert_eq!(ledger.settings.safe_percentage, 100.0);
    }
}
