use chrono::NaiveDate;
use tracing::info;

use crate::core::time::Clock;
use crate::errors::{LedgerError, Result};
use crate::ledger::{Ledger, Product, MAX_INSTALLMENTS};

/// Replacement values for [`ProductService::edit`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub total_value: Option<f64>,
    pub installments: Option<u32>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.total_value.is_none() && self.installments.is_none()
    }
}

/// Price of paying `count` upcoming installments ahead of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnticipationQuote {
    pub index: usize,
    pub count: u32,
    pub remaining: u32,
    pub amount: f64,
}

pub struct ProductService;

impl ProductService {
    /// Registers a purchase dated `clock.now()` and returns its position.
    pub fn add(
        ledger: &mut Ledger,
        name: &str,
        total_value: f64,
        installments: u32,
        clock: &dyn Clock,
    ) -> Result<usize> {
        let name = Self::validate_name(name)?;
        Self::validate_total(total_value)?;
        Self::validate_installments(installments)?;

        let product = Product::new(name, total_value, installments, clock.now());
        let parcel = product.parcel;
        let index = ledger.add_product(product);
        ledger.touch(clock.today());
        info!(index, parcel, installments, "product added");
        Ok(index)
    }

    /// Applies `update` and recomputes the parcel from the resulting total and count.
    pub fn edit(ledger: &mut Ledger, index: usize, update: ProductUpdate) -> Result<&Product> {
        let name = update.name.as_deref().map(Self::validate_name).transpose()?;
        if let Some(total) = update.total_value {
            Self::validate_total(total)?;
        }
        if let Some(installments) = update.installments {
            Self::validate_installments(installments)?;
        }

        let product = Self::product_mut(ledger, index)?;
        if let Some(name) = name {
            product.name = name;
        }
        if let Some(total) = update.total_value {
            product.total_value = total;
        }
        if let Some(installments) = update.installments {
            product.installments = installments;
        }
        product.recompute_parcel();
        info!(index, parcel = product.parcel, "product updated");
        Ok(&*product)
    }

    /// Removes the product at `index`, shifting later products down by one.
    pub fn remove(ledger: &mut Ledger, index: usize) -> Result<Product> {
        let count = ledger.product_count();
        let removed = ledger
            .remove_product(index)
            .ok_or(LedgerError::ProductNotFound {
                number: index + 1,
                count,
            })?;
        info!(index, name = %removed.name, "product removed");
        Ok(removed)
    }

    /// Installments still open on `today`, counting the current one.
    ///
    /// Elapsed months are approximated as 30-day blocks since the purchase date.
    pub fn remaining_installments(product: &Product, today: NaiveDate) -> u32 {
        let days = (today - product.created_on()).num_days().max(0);
        let total = product.installments as i64;
        let elapsed = (days / 30 + 1).min(total);
        (total - elapsed + 1).clamp(0, total) as u32
    }

    /// Validates an anticipation of `count` installments and prices it.
    pub fn anticipation_quote(
        ledger: &Ledger,
        index: usize,
        count: u32,
        today: NaiveDate,
    ) -> Result<AnticipationQuote> {
        let product = ledger.product(index).ok_or(LedgerError::ProductNotFound {
            number: index + 1,
            count: ledger.product_count(),
        })?;
        let remaining = Self::remaining_installments(product, today);
        if remaining == 0 {
            return Err(LedgerError::InvalidOperation(format!(
                "`{}` is already fully paid",
                product.name
            )));
        }
        if count < 1 || count > remaining {
            return Err(LedgerError::Validation(format!(
                "can anticipate between 1 and {remaining} installments, got {count}"
            )));
        }
        Ok(AnticipationQuote {
            index,
            count,
            remaining,
            amount: count as f64 * product.parcel,
        })
    }

    /// Pays `count` installments ahead of time. The parcel stays the same; the
    /// installment count shrinks.
    pub fn anticipate(
        ledger: &mut Ledger,
        index: usize,
        count: u32,
        today: NaiveDate,
    ) -> Result<AnticipationQuote> {
        let quote = Self::anticipation_quote(ledger, index, count, today)?;
        let product = Self::product_mut(ledger, index)?;
        product.installments -= quote.count;
        info!(
            index,
            anticipated = quote.count,
            amount = quote.amount,
            left = product.installments,
            "installments anticipated"
        );
        Ok(quote)
    }

    fn product_mut(ledger: &mut Ledger, index: usize) -> Result<&mut Product> {
        let count = ledger.product_count();
        ledger.product_mut(index).ok_or(LedgerError::ProductNotFound {
            number: index + 1,
            count,
        })
    }

    fn validate_name(candidate: &str) -> Result<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::Validation("product name is empty".into()));
        }
        if is_numeric(trimmed) {
            return Err(LedgerError::Validation(format!(
                "product name `{trimmed}` cannot be just a number"
            )));
        }
        Ok(trimmed.to_string())
    }

    fn validate_total(total: f64) -> Result<()> {
        if total.is_finite() && total > 0.0 {
            Ok(())
        } else {
            Err(LedgerError::Validation(format!(
                "total value must be greater than zero, got {total}"
            )))
        }
    }

    fn validate_installments(installments: u32) -> Result<()> {
        if (1..=MAX_INSTALLMENTS).contains(&installments) {
            Ok(())
        } else {
            Err(LedgerError::Validation(format!(
                "installment count must be between 1 and {MAX_INSTALLMENTS}, got {installments}"
            )))
        }
    }
}

fn is_numeric(value: &str) -> bool {
    let body = value.strip_prefix(['+', '-']).unwrap_or(value);
    body.chars().any(|ch| ch.is_ascii_digit())
        && body.chars().all(|ch| ch.is_ascii_digit() || ch == '.' || ch == ',')
}

#[cfg(test)]
mod tests {
    use crate::core::time::FixedClock;

    use super::*;

    fn clock() -> FixedClock {
        FixedClock::on(2024, 3, 10).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_stamps_product_and_touches_settings() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "  Laptop ", 1200.0, 12, &clock()).unwrap();
        let product = ledger.product(idx).unwrap();
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.parcel, 100.0);
        assert_eq!(product.created_on(), date(2024, 3, 10));
        assert_eq!(ledger.settings.month, Some(3));
        assert_eq!(ledger.settings.year, Some(2024));
    }

    #[test]
    fn add_rejects_bad_input() {
        let mut ledger = Ledger::default();
        for (name, total, installments) in [
            ("", 100.0, 1),
            ("123", 100.0, 1),
            ("-4,5", 100.0, 1),
            ("Chair", 0.0, 1),
            ("Chair", f64::NAN, 1),
            ("Chair", 100.0, 0),
            ("Chair", 100.0, MAX_INSTALLMENTS + 1),
            ("Chair", 100.0, i32::MAX as u32),
        ] {
            let result = ProductService::add(&mut ledger, name, total, installments, &clock());
            assert!(matches!(result, Err(LedgerError::Validation(_))), "{name}");
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn names_with_digits_and_letters_are_fine() {
        let mut ledger = Ledger::default();
        assert!(ProductService::add(&mut ledger, "iPhone 15", 5000.0, 10, &clock()).is_ok());
    }

    #[test]
    fn edit_recomputes_parcel_and_keeps_unset_fields() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "TV", 1200.0, 12, &clock()).unwrap();
        let update = ProductUpdate {
            installments: Some(6),
            ..ProductUpdate::default()
        };
        let product = ProductService::edit(&mut ledger, idx, update).unwrap();
        assert_eq!(product.name, "TV");
        assert_eq!(product.total_value, 1200.0);
        assert_eq!(product.parcel, 200.0);
    }

    #[test]
    fn installment_cap_applies_to_add_and_edit() {
        let mut ledger = Ledger::default();
        let idx =
            ProductService::add(&mut ledger, "House", 600_000.0, MAX_INSTALLMENTS, &clock()).unwrap();
        let update = ProductUpdate {
            installments: Some(3_000_000_000),
            ..ProductUpdate::default()
        };
        assert!(matches!(
            ProductService::edit(&mut ledger, idx, update),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(ledger.product(idx).unwrap().installments, MAX_INSTALLMENTS);
    }

    #[test]
    fn edit_with_invalid_value_changes_nothing() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "TV", 1200.0, 12, &clock()).unwrap();
        let update = ProductUpdate {
            name: Some("Big TV".into()),
            total_value: Some(-1.0),
            installments: None,
        };
        assert!(ProductService::edit(&mut ledger, idx, update).is_err());
        assert_eq!(ledger.product(idx).unwrap().name, "TV");
    }

    #[test]
    fn remove_reports_missing_product_number() {
        let mut ledger = Ledger::default();
        ProductService::add(&mut ledger, "TV", 1200.0, 12, &clock()).unwrap();
        let err = ProductService::remove(&mut ledger, 3).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ProductNotFound {
                number: 4,
                count: 1
            }
        ));
        assert_eq!(ProductService::remove(&mut ledger, 0).unwrap().name, "TV");
    }

    #[test]
    fn remaining_installments_count_thirty_day_blocks() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "Bike", 600.0, 6, &clock()).unwrap();
        let product = ledger.product(idx).unwrap();
        assert_eq!(ProductService::remaining_installments(product, date(2024, 3, 10)), 6);
        assert_eq!(ProductService::remaining_installments(product, date(2024, 4, 9)), 5);
        assert_eq!(ProductService::remaining_installments(product, date(2024, 2, 1)), 6);
        assert_eq!(ProductService::remaining_installments(product, date(2030, 1, 1)), 1);
    }

    #[test]
    fn anticipate_shrinks_installments_but_keeps_parcel() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "Bike", 600.0, 6, &clock()).unwrap();
        let quote = ProductService::anticipate(&mut ledger, idx, 2, date(2024, 3, 15)).unwrap();
        assert_eq!(quote.amount, 200.0);
        assert_eq!(quote.remaining, 6);
        let product = ledger.product(idx).unwrap();
        assert_eq!(product.installments, 4);
        assert_eq!(product.parcel, 100.0);
        assert_eq!(product.total_value, 600.0);
    }

    #[test]
    fn anticipate_rejects_counts_beyond_remaining() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "Bike", 600.0, 6, &clock()).unwrap();
        for count in [0, 7] {
            let err = ProductService::anticipation_quote(&ledger, idx, count, date(2024, 3, 15));
            assert!(matches!(err, Err(LedgerError::Validation(_))));
        }
        assert_eq!(ledger.product(idx).unwrap().installments, 6);
    }

    #[test]
    fn fully_anticipated_product_cannot_be_anticipated_again() {
        let mut ledger = Ledger::default();
        let idx = ProductService::add(&mut ledger, "Bike", 600.0, 2, &clock()).unwrap();
        ProductService::anticipate(&mut ledger, idx, 2, date(2024, 3, 15)).unwrap();
        let err = ProductService::anticipation_quote(&ledger, idx, 1, date(2024, 3, 15));
        assert!(matches!(err, Err(LedgerError::InvalidOperation(_))));
    }
}
