//! User-managed category lists, one per transaction kind.

use serde::{Deserialize, Serialize};

use crate::domain::transaction::TransactionKind;
use crate::errors::LedgerError;

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Rent",
    "Entertainment",
    "Shopping",
    "Education",
];

pub const DEFAULT_INCOME_CATEGORIES: [&str; 4] = ["Salary", "Bonus", "Investment", "Other"];

/// Ordered category labels for expenses and incomes.
///
/// Both lists are kept non-empty: removing the final label is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBook {
    pub expense: Vec<String>,
    pub income: Vec<String>,
}

impl Default for CategoryBook {
    fn default() -> Self {
        Self {
            expense: DEFAULT_EXPENSE_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            income: DEFAULT_INCOME_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CategoryBook {
    pub fn list(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Expense => &self.expense,
            TransactionKind::Income => &self.income,
        }
    }

    fn list_mut(&mut self, kind: TransactionKind) -> &mut Vec<String> {
        match kind {
            TransactionKind::Expense => &mut self.expense,
            TransactionKind::Income => &mut self.income,
        }
    }

    /// First label of the kind, used as the selection when the kind switches.
    pub fn default_for(&self, kind: TransactionKind) -> Option<&str> {
        self.list(kind).first().map(String::as_str)
    }

    pub fn contains(&self, kind: TransactionKind, name: &str) -> bool {
        self.list(kind).iter().any(|existing| existing == name)
    }

    /// Appends a trimmed label and returns it.
    pub fn add(&mut self, kind: TransactionKind, name: &str) -> Result<String, LedgerError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::Validation("category name is empty".into()));
        }
        if self.contains(kind, trimmed) {
            return Err(LedgerError::Duplicate(format!("category `{trimmed}`")));
        }
        self.list_mut(kind).push(trimmed.to_string());
        Ok(trimmed.to_string())
    }

    /// Removes a label and returns the new default selection for the kind.
    pub fn remove(&mut self, kind: TransactionKind, name: &str) -> Result<String, LedgerError> {
        let list = self.list_mut(kind);
        let Some(position) = list.iter().position(|existing| existing == name) else {
            return Err(LedgerError::NotFound(format!("category `{name}`")));
        };
        if list.len() == 1 {
            return Err(LedgerError::Validation(
                "at least one category is required".into(),
            ));
        }
        list.remove(position);
        Ok(list[0].clone())
    }
}
