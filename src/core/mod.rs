//! Installment-period engine: calendar mapping, period indexing, budget checks and
//! the services that mutate or summarise a [`Ledger`](crate::ledger::Ledger).

pub mod calendar;
pub mod period_index;
pub mod services;
pub mod time;
pub mod utils;

pub use calendar::{end_period, installment_number_at, is_active_in_period, occupied_periods};
pub use period_index::PeriodIndex;
pub use time::{Clock, FixedClock, SystemClock};
