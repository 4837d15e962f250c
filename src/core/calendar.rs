//! Maps a product's purchase date and installment count onto calendar buckets.

use std::iter;

use crate::ledger::{Product, YearMonth};

/// Every bucket the product is charged in, oldest first. Exactly `installments` entries.
pub fn occupied_periods(product: &Product) -> Vec<YearMonth> {
    iter::successors(Some(product.start_period()), |period| Some(period.next()))
        .take(product.installments as usize)
        .collect()
}

/// Last bucket the product is charged in, or `None` when it has no installments.
pub fn end_period(product: &Product) -> Option<YearMonth> {
    let remaining = product.installments.checked_sub(1)?;
    product.start_period().offset(i64::from(remaining))
}

/// 1-based installment number charged in `year`/`month`.
///
/// Queries outside the product's window are clamped: months before the purchase
/// report installment 1 and months after the last charge report the final one.
pub fn installment_number_at(product: &Product, year: i32, month: u32) -> u32 {
    let start = product.start_period();
    let offset = (year as i64 * 12 + month as i64) - start.ordinal() + 1;
    let last = product.installments.max(1) as i64;
    offset.clamp(1, last) as u32
}

/// Whether `year`/`month` falls inside the product's charging window.
///
/// Compares the target bucket against the start and end buckets rather than
/// enumerating [`occupied_periods`].
pub fn is_active_in_period(product: &Product, year: i32, month: u32) -> bool {
    let Some(target) = YearMonth::new(year, month) else {
        return false;
    };
    let Some(end) = end_period(product) else {
        return false;
    };
    (product.start_period()..=end).contains(&target)
}
