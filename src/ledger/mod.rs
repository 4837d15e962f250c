//! Ledger models: products, settings, and calendar buckets.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod product;

pub use ledger::{Ledger, Settings, DEFAULT_SAFE_PERCENTAGE};
pub use period::{month_name, YearMonth};
pub use product::{Product, MAX_INSTALLMENTS};
