#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use spending_checker::ledger::{Ledger, Product, Settings};

/// Purchase timestamp at 10:00 UTC on the given day.
pub fn created(year: i32, month: u32, day: u32) -> DateTime<FixedOffset> {
    let raw = format!("{year:04}-{month:02}-{day:02}T10:00:00Z");
    DateTime::parse_from_rfc3339(&raw).expect("valid test timestamp")
}

pub fn ledger_with_profit(monthly_profit: f64) -> Ledger {
    Ledger::new(Settings {
        monthly_profit,
        ..Settings::default()
    })
}

/// One-installment product whose parcel equals `parcel`, bought on 2024-03-05.
pub fn single_parcel(name: &str, parcel: f64) -> Product {
    Product::new(name, parcel, 1, created(2024, 3, 5))
}
