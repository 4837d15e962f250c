use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{period::YearMonth, product::Product};

pub const DEFAULT_SAFE_PERCENTAGE: f64 = 70.0;

/// Global knobs the budget check is evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Zero means the profit has not been configured yet.
    #[serde(default)]
    pub monthly_profit: f64,
    /// Minimum share of the profit (0-100) that must stay free of installments.
    #[serde(default = "Settings::safe_percentage_default")]
    pub safe_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl Settings {
    pub fn safe_percentage_default() -> f64 {
        DEFAULT_SAFE_PERCENTAGE
    }

    pub fn has_profit(&self) -> bool {
        self.monthly_profit > 0.0
    }

    pub fn last_touched(&self) -> Option<YearMonth> {
        YearMonth::new(self.year?, self.month?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_profit: 0.0,
            safe_percentage: DEFAULT_SAFE_PERCENTAGE,
            month: None,
            year: None,
        }
    }
}

/// The persisted unit: every product in insertion order plus the settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub settings: Settings,
}

impl Ledger {
    pub fn new(settings: Settings) -> Self {
        Self {
            products: Vec::new(),
            settings,
        }
    }

    /// Appends a product and returns its 0-based position.
    pub fn add_product(&mut self, product: Product) -> usize {
        self.products.push(product);
        self.products.len() - 1
    }

    pub fn product(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn product_mut(&mut self, index: usize) -> Option<&mut Product> {
        self.products.get_mut(index)
    }

    pub fn remove_product(&mut self, index: usize) -> Option<Product> {
        (index < self.products.len()).then(|| self.products.remove(index))
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Records `today` as the last month the ledger was touched.
    pub fn touch(&mut self, today: NaiveDate) {
        self.settings.month = Some(today.month());
        self.settings.year = Some(today.year());
    }

    /// Older data files were written before the safe percentage existed and carry 0.
    pub fn normalize(&mut self) {
        let safe = self.settings.safe_percentage;
        if safe.is_nan() || safe <= 0.0 {
            self.settings.safe_percentage = DEFAULT_SAFE_PERCENTAGE;
        }
    }
}
