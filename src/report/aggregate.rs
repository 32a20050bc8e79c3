//! Filters records into a window and totals them per category.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::transaction::{TransactionKind, TransactionRecord};

use super::range::DateWindow;

/// Top-level report selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ReportTab {
    #[default]
    Expense,
    Income,
    Balance,
}

impl ReportTab {
    pub fn includes(self, kind: TransactionKind) -> bool {
        match self {
            ReportTab::Balance => true,
            ReportTab::Expense => kind == TransactionKind::Expense,
            ReportTab::Income => kind == TransactionKind::Income,
        }
    }
}

impl fmt::Display for ReportTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportTab::Expense => "Expense",
            ReportTab::Income => "Income",
            ReportTab::Balance => "Balance",
        };
        f.write_str(label)
    }
}

impl FromStr for ReportTab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" => Ok(ReportTab::Expense),
            "income" => Ok(ReportTab::Income),
            "balance" | "net" => Ok(ReportTab::Balance),
            other => Err(format!("unknown report tab `{other}`")),
        }
    }
}

/// Per-category aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    /// Sum of signed contributions (expenses negative).
    pub signed: f64,
    /// Absolute value of `signed`, used for proportions and legends.
    pub magnitude: f64,
}

impl CategoryTotal {
    /// Percentage of `total` this category represents, or `None` when the
    /// total is zero and no proportion exists.
    pub fn share_of(&self, total: f64) -> Option<f64> {
        if total == 0.0 {
            return None;
        }
        Some(self.magnitude / total.abs() * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportResult {
    pub tab: ReportTab,
    pub window: DateWindow,
    pub filtered: Vec<TransactionRecord>,
    /// Categories in first-seen order.
    pub by_category: Vec<CategoryTotal>,
    pub total: f64,
}

impl ReportResult {
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryTotal> {
        self.by_category.iter().find(|entry| entry.category == name)
    }

    /// Sum of per-category magnitudes. Equals `|total|` whenever every counted
    /// record shares one sign; under `Balance` with mixed signs it can exceed it.
    pub fn magnitude_sum(&self) -> f64 {
        self.by_category.iter().map(|entry| entry.magnitude).sum()
    }
}

pub fn aggregate(
    transactions: &[TransactionRecord],
    tab: ReportTab,
    window: DateWindow,
) -> ReportResult {
    let filtered: Vec<TransactionRecord> = transactions
        .iter()
        .filter(|record| tab.includes(record.kind) && window.contains(record.date))
        .cloned()
        .collect();

    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut total = 0.0;
    let mut skipped = 0usize;

    for record in &filtered {
        let Some(signed) = record.signed_amount() else {
            skipped += 1;
            continue;
        };
        let index = *positions.entry(record.category.as_str()).or_insert_with(|| {
            by_category.push(CategoryTotal {
                category: record.category.clone(),
                signed: 0.0,
                magnitude: 0.0,
            });
            by_category.len() - 1
        });
        by_category[index].signed += signed;

        total += match tab {
            ReportTab::Balance => signed,
            ReportTab::Expense | ReportTab::Income => signed.abs(),
        };
    }

    for entry in &mut by_category {
        entry.magnitude = entry.signed.abs();
    }

    if skipped > 0 {
        debug!(skipped, "records with unparseable amounts left out of totals");
    }

    ReportResult {
        tab,
        window,
        filtered,
        by_category,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> DateWindow {
        DateWindow::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap()
    }

    fn record(amount: &str, kind: TransactionKind, category: &str, date: NaiveDate) -> TransactionRecord {
        TransactionRecord::new(amount, kind, category, date)
    }

    fn mixed() -> Vec<TransactionRecord> {
        vec![
            record("100", TransactionKind::Expense, "Food", day(2024, 3, 5)),
            record("50", TransactionKind::Income, "Bonus", day(2024, 3, 10)),
        ]
    }

    #[test]
    fn expense_tab_excludes_income() {
        let result = aggregate(&mixed(), ReportTab::Expense, march());
        assert_eq!(result.by_category.len(), 1);
        assert_eq!(result.by_category[0].category, "Food");
        assert_eq!(result.by_category[0].magnitude, 100.0);
        assert_eq!(result.total, 100.0);
        assert_eq!(result.filtered.len(), 1);
    }

    #[test]
    fn income_tab_total_is_positive() {
        let result = aggregate(&mixed(), ReportTab::Income, march());
        assert_eq!(result.total, 50.0);
        assert_eq!(result.category("Bonus").map(|c| c.signed), Some(50.0));
    }

    #[test]
    fn balance_total_is_signed_sum() {
        let result = aggregate(&mixed(), ReportTab::Balance, march());
        assert_eq!(result.total, -50.0);
        assert_eq!(result.category("Food").map(|c| c.signed), Some(-100.0));
        assert_eq!(result.category("Food").map(|c| c.magnitude), Some(100.0));
    }

    #[test]
    fn expense_total_never_negative() {
        let records = vec![
            record("30", TransactionKind::Expense, "Food", day(2024, 3, 1)),
            record("20", TransactionKind::Expense, "Rent", day(2024, 3, 31)),
        ];
        let result = aggregate(&records, ReportTab::Expense, march());
        assert_eq!(result.total, 50.0);
        assert!(result.by_category.iter().all(|c| c.signed < 0.0));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let records = vec![
            record("1", TransactionKind::Expense, "A", day(2024, 2, 29)),
            record("2", TransactionKind::Expense, "B", day(2024, 3, 1)),
            record("3", TransactionKind::Expense, "C", day(2024, 3, 31)),
            record("4", TransactionKind::Expense, "D", day(2024, 4, 1)),
        ];
        let result = aggregate(&records, ReportTab::Expense, march());
        let names: Vec<&str> = result.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["B", "C"]);
        assert_eq!(result.total, 5.0);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let records = vec![
            record("1", TransactionKind::Expense, "Rent", day(2024, 3, 2)),
            record("1", TransactionKind::Expense, "Food", day(2024, 3, 3)),
            record("1", TransactionKind::Expense, "Rent", day(2024, 3, 4)),
            record("1", TransactionKind::Expense, "Bus", day(2024, 3, 5)),
        ];
        let result = aggregate(&records, ReportTab::Expense, march());
        let names: Vec<&str> = result.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["Rent", "Food", "Bus"]);
        assert_eq!(result.category("Rent").map(|c| c.magnitude), Some(2.0));
    }

    #[test]
    fn unparseable_amount_contributes_nothing() {
        let records = vec![
            record("abc", TransactionKind::Expense, "Ghost", day(2024, 3, 2)),
            record("10", TransactionKind::Expense, "Food", day(2024, 3, 3)),
        ];
        let result = aggregate(&records, ReportTab::Expense, march());
        assert!(result.category("Ghost").is_none());
        assert_eq!(result.total, 10.0);
        assert_eq!(result.filtered.len(), 2);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let result = aggregate(&[], ReportTab::Balance, march());
        assert!(result.is_empty());
        assert_eq!(result.total, 0.0);
        assert!(result.filtered.is_empty());
    }

    #[test]
    fn magnitude_sum_matches_total_for_single_sign_tabs() {
        let records = vec![
            record("12.5", TransactionKind::Expense, "Food", day(2024, 3, 2)),
            record("7.5", TransactionKind::Expense, "Bus", day(2024, 3, 3)),
            record("5", TransactionKind::Expense, "Food", day(2024, 3, 4)),
        ];
        let result = aggregate(&records, ReportTab::Expense, march());
        assert!((result.magnitude_sum() - result.total.abs()).abs() < 1e-9);
        let shares: f64 = result
            .by_category
            .iter()
            .filter_map(|c| c.share_of(result.total))
            .sum();
        assert!((shares - 100.0).abs() < 1e-9);
    }

    #[test]
    fn balance_magnitudes_match_total_only_when_signs_agree() {
        let single_sign = vec![
            record("40", TransactionKind::Income, "Salary", day(2024, 3, 2)),
            record("10", TransactionKind::Income, "Bonus", day(2024, 3, 3)),
        ];
        let result = aggregate(&single_sign, ReportTab::Balance, march());
        assert_eq!(result.total, 50.0);
        assert!((result.magnitude_sum() - result.total.abs()).abs() < 1e-9);

        let result = aggregate(&mixed(), ReportTab::Balance, march());
        assert_eq!(result.total, -50.0);
        assert_eq!(result.magnitude_sum(), 150.0);
        assert_ne!(result.magnitude_sum(), result.total.abs());
    }

    #[test]
    fn share_of_zero_total_is_undefined() {
        let records = vec![
            record("20", TransactionKind::Income, "Swap", day(2024, 3, 2)),
            record("20", TransactionKind::Expense, "Swap", day(2024, 3, 3)),
        ];
        let result = aggregate(&records, ReportTab::Balance, march());
        assert_eq!(result.total, 0.0);
        assert_eq!(result.by_category[0].share_of(result.total), None);
    }

    #[test]
    fn tab_parses_labels() {
        assert_eq!("net".parse::<ReportTab>(), Ok(ReportTab::Balance));
        assert!("transfers".parse::<ReportTab>().is_err());
    }
}
