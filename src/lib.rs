#![doc(test(attr(deny(warnings))))]

//! Spending Checker tracks purchases paid in monthly installments and tells you
//! whether a month's installments fit within a safe share of your monthly profit.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("spending_checker tracing initialized");
    });
}
