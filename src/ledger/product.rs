use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::period::YearMonth;

/// Upper bound on installments per product (fifty years of monthly charges).
pub const MAX_INSTALLMENTS: u32 = 600;

/// An installment purchase tracked against the monthly profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Per-installment amount; always `total_value / installments`.
    pub parcel: f64,
    pub total_value: f64,
    pub installments: u32,
    pub created_at: DateTime<FixedOffset>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        total_value: f64,
        installments: u32,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        let mut product = Self {
            name: name.into(),
            parcel: 0.0,
            total_value,
            installments,
            created_at,
        };
        product.recompute_parcel();
        product
    }

    /// Keeps `parcel * installments == total_value`. A zero installment count leaves
    /// the parcel at zero instead of dividing by it.
    pub fn recompute_parcel(&mut self) {
        self.parcel = if self.installments == 0 {
            0.0
        } else {
            self.total_value / self.installments as f64
        };
    }

    /// Calendar date of purchase in the offset it was recorded with.
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn start_period(&self) -> YearMonth {
        YearMonth::of(self.created_on())
    }
}
