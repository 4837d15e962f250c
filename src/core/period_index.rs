//! Year -> month -> product lookup built from the current product collection.

use std::collections::BTreeMap;

use crate::ledger::{Product, YearMonth};

use super::calendar::occupied_periods;

/// Read-only index of which products are charged in which calendar month.
///
/// Entries are positions into the product slice the index was built from. The
/// index is never updated in place; build a new one after mutating the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodIndex {
    buckets: BTreeMap<i32, BTreeMap<u32, Vec<usize>>>,
}

impl PeriodIndex {
    pub fn build(products: &[Product]) -> Self {
        let mut buckets: BTreeMap<i32, BTreeMap<u32, Vec<usize>>> = BTreeMap::new();
        for (idx, product) in products.iter().enumerate() {
            for period in occupied_periods(product) {
                let entries = buckets
                    .entry(period.year)
                    .or_default()
                    .entry(period.month)
                    .or_default();
                if !entries.contains(&idx) {
                    entries.push(idx);
                }
            }
        }
        tracing::debug!(products = products.len(), years = buckets.len(), "built period index");
        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Distinct years with at least one charge, ascending.
    pub fn years_present(&self) -> Vec<i32> {
        self.buckets.keys().copied().collect()
    }

    /// Distinct months of `year` with at least one charge, ascending.
    pub fn months_present_in(&self, year: i32) -> Vec<u32> {
        self.buckets
            .get(&year)
            .map(|months| months.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Product positions charged in the bucket, in insertion order, without repeats.
    pub fn products_in(&self, year: i32, month: u32) -> &[usize] {
        self.buckets
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every populated bucket in chronological order.
    pub fn periods(&self) -> impl Iterator<Item = YearMonth> + '_ {
        self.buckets.iter().flat_map(|(year, months)| {
            months.keys().map(move |month| YearMonth {
                year: *year,
                month: *month,
            })
        })
    }
}
