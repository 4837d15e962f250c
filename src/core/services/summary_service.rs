use crate::core::calendar::{installment_number_at, is_active_in_period};
use crate::core::period_index::PeriodIndex;
use crate::core::time::Clock;
use crate::ledger::{Ledger, Product, YearMonth};

use super::budget_service::{BudgetEvaluation, BudgetService};
use super::set_aside_service::{SetAsideService, SetAsideSuggestion};

/// A product charged in a given month together with the installment that falls due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveProduct<'a> {
    /// Position in the ledger's product collection.
    pub index: usize,
    pub product: &'a Product,
    pub installment_number: u32,
}

/// Everything needed to render one month of commitments.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary<'a> {
    pub period: YearMonth,
    pub monthly_profit: f64,
    pub safe_percentage: f64,
    pub entries: Vec<ActiveProduct<'a>>,
    pub evaluation: BudgetEvaluation,
    /// Present only when the month fails the safe threshold and the excess is positive.
    /// Positions refer to `entries`.
    pub suggestion: Option<SetAsideSuggestion<'a>>,
}

impl MonthSummary<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn month_summary(ledger: &Ledger, period: YearMonth) -> MonthSummary<'_> {
        let entries: Vec<ActiveProduct<'_>> = ledger
            .products
            .iter()
            .enumerate()
            .filter(|(_, product)| is_active_in_period(product, period.year, period.month))
            .map(|(index, product)| ActiveProduct {
                index,
                product,
                installment_number: installment_number_at(product, period.year, period.month),
            })
            .collect();

        let settings = &ledger.settings;
        let active: Vec<&Product> = entries.iter().map(|entry| entry.product).collect();
        let evaluation = BudgetService::evaluate_with_settings(active.iter().copied(), settings);
        let suggestion = if evaluation.within_safe_threshold {
            None
        } else {
            SetAsideService::suggest(&active, settings.monthly_profit, settings.safe_percentage)
        };

        tracing::debug!(
            %period,
            active = entries.len(),
            load = evaluation.total_installment_load,
            within = evaluation.within_safe_threshold,
            "month summary computed"
        );

        MonthSummary {
            period,
            monthly_profit: settings.monthly_profit,
            safe_percentage: settings.safe_percentage,
            entries,
            evaluation,
            suggestion,
        }
    }

    pub fn current_month_summary<'a>(ledger: &'a Ledger, clock: &dyn Clock) -> MonthSummary<'a> {
        Self::month_summary(ledger, YearMonth::of(clock.today()))
    }

    /// Products listed under an index bucket, each with its installment number.
    pub fn period_products<'a>(
        ledger: &'a Ledger,
        index: &PeriodIndex,
        period: YearMonth,
    ) -> Vec<ActiveProduct<'a>> {
        index
            .products_in(period.year, period.month)
            .iter()
            .filter_map(|&idx| {
                let product = ledger.product(idx)?;
                Some(ActiveProduct {
                    index: idx,
                    product,
                    installment_number: installment_number_at(product, period.year, period.month),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::core::time::FixedClock;
    use crate::ledger::Settings;

    fn product(name: &str, raw_date: &str, total: f64, installments: u32) -> Product {
        let created = DateTime::parse_from_rfc3339(raw_date).unwrap();
        Product::new(name, total, installments, created)
    }

    fn ledger(profit: f64) -> Ledger {
        let mut ledger = Ledger::new(Settings {
            monthly_profit: profit,
            ..Settings::default()
        });
        ledger.add_product(product("Laptop", "2024-01-05T10:00:00Z", 4800.0, 12));
        ledger.add_product(product("Phone", "2024-03-15T10:00:00Z", 900.0, 3));
        ledger.add_product(product("Desk", "2024-03-20T10:00:00Z", 200.0, 1));
        ledger
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn summary_lists_active_products_with_installment_numbers() {
        let ledger = ledger(1000.0);
        let summary = SummaryService::month_summary(&ledger, ym(2024, 3));
        let rows: Vec<(usize, u32)> = summary
            .entries
            .iter()
            .map(|entry| (entry.index, entry.installment_number))
            .collect();
        assert_eq!(rows, vec![(0, 3), (1, 1), (2, 1)]);
        assert_eq!(summary.evaluation.total_installment_load, 900.0);
        assert!(!summary.evaluation.within_safe_threshold);
    }

    #[test]
    fn failing_month_carries_a_suggestion() {
        let ledger = ledger(1000.0);
        let summary = SummaryService::month_summary(&ledger, ym(2024, 3));
        let suggestion = summary.suggestion.expect("suggestion");
        // load 900, allowed 700 -> the 400 laptop parcel alone covers it
        assert_eq!(suggestion.products.len(), 1);
        assert_eq!(suggestion.products[0].name, "Laptop");
        assert_eq!(summary.entries[suggestion.positions[0]].index, 0);
    }

    #[test]
    fn passing_month_has_no_suggestion() {
        let ledger = ledger(5000.0);
        let summary = SummaryService::month_summary(&ledger, ym(2024, 6));
        assert_eq!(summary.entries.len(), 1);
        assert!(summary.evaluation.within_safe_threshold);
        assert!(summary.suggestion.is_none());
    }

    #[test]
    fn month_without_products_is_empty_and_passes() {
        let ledger = ledger(1000.0);
        let summary = SummaryService::month_summary(&ledger, ym(2023, 12));
        assert!(summary.is_empty());
        assert_eq!(summary.evaluation.left_percent, 100.0);
        assert!(summary.suggestion.is_none());
    }

    #[test]
    fn current_month_follows_the_clock() {
        let ledger = ledger(1000.0);
        let clock = FixedClock::on(2024, 5, 1).unwrap();
        let summary = SummaryService::current_month_summary(&ledger, &clock);
        assert_eq!(summary.period, ym(2024, 5));
        let names: Vec<&str> = summary.entries.iter().map(|e| e.product.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Phone"]);
    }

    #[test]
    fn longest_allowed_product_is_summarised() {
        let mut ledger = ledger(1000.0);
        ledger.add_product(product(
            "House",
            "2024-03-10T10:00:00Z",
            60_000.0,
            crate::ledger::MAX_INSTALLMENTS,
        ));
        let summary = SummaryService::month_summary(&ledger, ym(2074, 2));
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].installment_number, crate::ledger::MAX_INSTALLMENTS);
        assert!(SummaryService::month_summary(&ledger, ym(2074, 3)).is_empty());
    }

    #[test]
    fn period_products_follow_the_index_bucket() {
        let ledger = ledger(1000.0);
        let index = PeriodIndex::build(&ledger.products);
        let rows = SummaryService::period_products(&ledger, &index, ym(2024, 4));
        let rows: Vec<(&str, u32)> = rows
            .iter()
            .map(|entry| (entry.product.name.as_str(), entry.installment_number))
            .collect();
        assert_eq!(rows, vec![("Laptop", 4), ("Phone", 2)]);
    }
}
