//! Plain-text rendering of summaries and listings. Styling is left to `output`.

use std::fmt::Write;

use crate::core::calendar::end_period;
use crate::core::period_index::PeriodIndex;
use crate::core::services::{ActiveProduct, AnticipationQuote, MonthSummary, SetAsideSuggestion};
use crate::ledger::{month_name, Ledger, YearMonth};

const DIVIDER_WIDTH: usize = 60;

pub fn money(symbol: &str, value: f64) -> String {
    format!("{symbol}{value:.2}")
}

fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

pub fn month_title(period: YearMonth) -> String {
    format!(
        "MONTH SUMMARY ({:02}/{} - {})",
        period.month,
        period.year,
        period.month_name()
    )
}

/// Headline numbers plus the verdict; the product rows are rendered separately.
pub fn render_month_summary(summary: &MonthSummary<'_>, symbol: &str) -> String {
    let eval = &summary.evaluation;
    let mut out = String::new();
    let _ = writeln!(out, "Monthly profit: {}", money(symbol, summary.monthly_profit));
    let _ = writeln!(
        out,
        "Installments due: {}",
        money(symbol, eval.total_installment_load)
    );
    let _ = writeln!(
        out,
        "Used: {:.2}% | Left to reinvest: {:.2}%",
        eval.used_percent, eval.left_percent
    );
    let _ = writeln!(out, "Safe percentage: {:.0}%", summary.safe_percentage);
    if summary.monthly_profit <= 0.0 {
        let _ = writeln!(out, "Monthly profit is not set. Run `profit <value>` first.");
    } else if eval.within_safe_threshold {
        let _ = writeln!(out, "OK: installments fit within your profit.");
    } else {
        let _ = writeln!(
            out,
            "NOT RECOMMENDED: set some products aside in a separate reserve."
        );
    }
    if let Some(suggestion) = &summary.suggestion {
        out.push_str(&render_suggestion(suggestion, symbol));
    }
    out
}

pub fn render_suggestion(suggestion: &SetAsideSuggestion<'_>, symbol: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", divider());
    match suggestion.products.as_slice() {
        [] => {}
        [only] => {
            let _ = writeln!(
                out,
                "Suggestion: move '{}' (parcel {}) to a separate reserve.",
                only.name,
                money(symbol, only.parcel)
            );
        }
        many => {
            let _ = writeln!(out, "Suggestion: move these products to a separate reserve:");
            for (pos, product) in many.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {} (parcel {})",
                    pos + 1,
                    product.name,
                    money(symbol, product.parcel)
                );
            }
            let _ = writeln!(out, "  Total to set aside: {}", money(symbol, suggestion.total));
        }
    }
    let _ = writeln!(out, "{}", divider());
    out
}

/// Numbered rows of products charged in a month.
pub fn render_active_products(rows: &[ActiveProduct<'_>], symbol: &str) -> String {
    let mut out = String::new();
    for (pos, row) in rows.iter().enumerate() {
        let product = row.product;
        let _ = writeln!(
            out,
            "{}. {} | Total: {} | Parcel: {} ({}/{}) | Added: {}",
            pos + 1,
            product.name,
            money(symbol, product.total_value),
            money(symbol, product.parcel),
            row.installment_number,
            product.installments,
            product.created_on().format("%d/%m/%Y")
        );
    }
    out
}

/// Every product with its ledger number, used to pick targets for edit/remove.
pub fn render_product_list(ledger: &Ledger, symbol: &str) -> String {
    let mut out = String::new();
    for (idx, product) in ledger.products.iter().enumerate() {
        let last = end_period(product)
            .map(|period| period.to_string())
            .unwrap_or_else(|| "paid".into());
        let _ = writeln!(
            out,
            "#{} {} | Total: {} | Parcel: {} x {} | {} -> {}",
            idx + 1,
            product.name,
            money(symbol, product.total_value),
            money(symbol, product.parcel),
            product.installments,
            product.start_period(),
            last
        );
    }
    out
}

/// Years and months that have at least one installment, ascending.
pub fn render_periods(index: &PeriodIndex) -> String {
    let mut out = String::new();
    for year in index.years_present() {
        let months: Vec<String> = index
            .months_present_in(year)
            .into_iter()
            .map(|month| format!("{month:02} {}", month_name(month)))
            .collect();
        let _ = writeln!(out, "{year}: {}", months.join(", "));
    }
    out
}

pub fn render_quote(quote: &AnticipationQuote, symbol: &str) -> String {
    format!(
        "Anticipating {} of {} remaining installments costs {}",
        quote.count,
        quote.remaining,
        money(symbol, quote.amount)
    )
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::core::services::SummaryService;
    use crate::ledger::{Product, Settings};

    fn ledger() -> Ledger {
        let created = DateTime::parse_from_rfc3339("2024-03-02T10:00:00Z").unwrap();
        let mut ledger = Ledger::new(Settings {
            monthly_profit: 1000.0,
            ..Settings::default()
        });
        ledger.add_product(Product::new("Laptop", 4800.0, 12, created));
        ledger.add_product(Product::new("Phone", 900.0, 3, created));
        ledger.add_product(Product::new("Desk", 200.0, 1, created));
        ledger
    }

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    #[test]
    fn failing_summary_mentions_single_suggestion() {
        let ledger = ledger();
        let summary = SummaryService::month_summary(&ledger, march());
        let text = render_month_summary(&summary, "R$");
        assert!(text.contains("Installments due: R$900.00"));
        assert!(text.contains("Used: 90.00% | Left to reinvest: 10.00%"));
        assert!(text.contains("NOT RECOMMENDED"));
        assert!(text.contains("move 'Laptop' (parcel R$400.00)"));
    }

    #[test]
    fn unset_profit_is_mentioned_once() {
        let mut ledger = ledger();
        ledger.settings.monthly_profit = 0.0;
        let summary = SummaryService::month_summary(&ledger, march());
        let text = render_month_summary(&summary, "R$");
        assert_eq!(text.matches("Monthly profit is not set").count(), 1);
        assert!(!text.contains("OK:"));
    }

    #[test]
    fn active_rows_show_installment_progress() {
        let ledger = ledger();
        let summary = SummaryService::month_summary(&ledger, march());
        let text = render_active_products(&summary.entries, "$");
        assert!(text.starts_with("1. Laptop | Total: $4800.00 | Parcel: $400.00 (1/12)"));
        assert!(text.contains("3. Desk"));
        assert!(text.contains("Added: 02/03/2024"));
    }

    #[test]
    fn periods_are_grouped_by_year() {
        let ledger = ledger();
        let index = PeriodIndex::build(&ledger.products);
        let text = render_periods(&index);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("2024: 03 March, 04 April, 05 May, 06 June, 07 July, 08 August, 09 September, 10 October, 11 November, 12 December")
        );
        assert_eq!(lines.next(), Some("2025: 01 January, 02 February"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn product_list_shows_window() {
        let text = render_product_list(&ledger(), "R$");
        assert!(text.contains("#2 Phone | Total: R$900.00 | Parcel: R$300.00 x 3 | 03/2024 -> 05/2024"));
    }
}
