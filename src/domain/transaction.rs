//! Income and expense records as they are logged and stored.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{parse_amount, Displayable, Identifiable};

/// Direction of money for a logged record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Multiplier applied to the parsed amount: expenses count negative.
    pub fn sign(self) -> f64 {
        match self {
            TransactionKind::Expense => -1.0,
            TransactionKind::Income => 1.0,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "expense" | "out" => Ok(TransactionKind::Expense),
            "income" | "in" => Ok(TransactionKind::Income),
            other => Err(format!("unknown transaction type `{other}`")),
        }
    }
}

/// A single logged income or expense.
///
/// `amount` keeps the text exactly as entered; aggregation goes through
/// [`TransactionRecord::parsed_amount`] so malformed stored values degrade to
/// "no contribution" instead of failing a whole report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
}

impl TransactionRecord {
    pub fn new(
        amount: impl Into<String>,
        kind: TransactionKind,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: amount.into(),
            kind,
            category: category.into(),
            note: None,
            date,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
        self
    }

    pub fn parsed_amount(&self) -> Option<f64> {
        parse_amount(&self.amount)
    }

    /// Amount with the kind's sign applied, or `None` when the amount is unusable.
    pub fn signed_amount(&self) -> Option<f64> {
        self.parsed_amount().map(|value| value * self.kind.sign())
    }
}

impl Identifiable for TransactionRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for TransactionRecord {
    fn display_label(&self) -> String {
        let sign = match self.kind {
            TransactionKind::Expense => '-',
            TransactionKind::Income => '+',
        };
        format!("{} ({}) {}{}", self.category, self.date, sign, self.amount)
    }
}

/// Input collected by the logging flow before a record is created.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub amount: String,
    pub kind: Option<TransactionKind>,
    pub category: String,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn serializes_with_type_key_and_iso_date() {
        let record = TransactionRecord::new("100", TransactionKind::Expense, "Food", day(2024, 3, 5));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "Expense");
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["amount"], "100");
        assert!(json.get("note").is_none());
    }

    #[test]
    fn signed_amount_flips_expenses() {
        let expense = TransactionRecord::new("40", TransactionKind::Expense, "Food", day(2024, 1, 1));
        let income = TransactionRecord::new("40", TransactionKind::Income, "Salary", day(2024, 1, 1));
        assert_eq!(expense.signed_amount(), Some(-40.0));
        assert_eq!(income.signed_amount(), Some(40.0));
    }

    #[test]
    fn unparseable_amount_has_no_value() {
        let record = TransactionRecord::new("abc", TransactionKind::Income, "Bonus", day(2024, 1, 1));
        assert_eq!(record.signed_amount(), None);
    }

    #[test]
    fn blank_note_is_dropped() {
        let record = TransactionRecord::new("1", TransactionKind::Income, "Bonus", day(2024, 1, 1))
            .with_note("   ");
        assert!(record.note.is_none());
    }

    #[test]
    fn label_shows_category_date_and_sign() {
        let record = TransactionRecord::new("12", TransactionKind::Expense, "Food", day(2024, 4, 2));
        assert_eq!(record.display_label(), "Food (2024-04-02) -12");
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("EXPENSE".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert_eq!("in".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
