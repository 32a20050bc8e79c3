use std::sync::Arc;

use tracing::info;

use crate::domain::category::CategoryBook;
use crate::domain::transaction::TransactionKind;
use crate::storage::{keys, load_value, save_value, KeyValueStore};

use super::ServiceResult;

fn storage_key(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => keys::EXPENSE_CATEGORIES,
        TransactionKind::Income => keys::INCOME_CATEGORIES,
    }
}

/// Category lists per kind plus the last category used when logging.
pub struct CategoryService {
    store: Arc<dyn KeyValueStore>,
    book: CategoryBook,
}

impl CategoryService {
    /// Loads both lists; a list that is absent or empty in storage keeps its defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut book = CategoryBook::default();
        for kind in [TransactionKind::Expense, TransactionKind::Income] {
            let stored: Option<Vec<String>> = load_value(store.as_ref(), storage_key(kind));
            if let Some(list) = stored.filter(|list| !list.is_empty()) {
                match kind {
                    TransactionKind::Expense => book.expense = list,
                    TransactionKind::Income => book.income = list,
                }
            }
        }
        Self { store, book }
    }

    pub fn book(&self) -> &CategoryBook {
        &self.book
    }

    pub fn categories(&self, kind: TransactionKind) -> &[String] {
        self.book.list(kind)
    }

    pub fn default_for(&self, kind: TransactionKind) -> Option<&str> {
        self.book.default_for(kind)
    }

    pub fn contains(&self, kind: TransactionKind, name: &str) -> bool {
        self.book.contains(kind, name)
    }

    /// Adds a label and returns it as the new selection.
    pub fn add(&mut self, kind: TransactionKind, name: &str) -> ServiceResult<String> {
        let added = self.book.add(kind, name)?;
        info!(%kind, category = %added, "category added");
        self.persist(kind);
        Ok(added)
    }

    /// Removes a label and returns the selection to fall back to.
    pub fn remove(&mut self, kind: TransactionKind, name: &str) -> ServiceResult<String> {
        let fallback = self.book.remove(kind, name)?;
        info!(%kind, category = %name, "category removed");
        self.persist(kind);
        Ok(fallback)
    }

    pub fn last_category(&self) -> Option<String> {
        load_value(self.store.as_ref(), keys::LAST_CATEGORY)
    }

    pub fn remember(&self, name: &str) -> bool {
        save_value(self.store.as_ref(), keys::LAST_CATEGORY, name)
    }

    /// Selection to preload for `kind`: the remembered category if it belongs
    /// to the kind, otherwise the kind's first label.
    pub fn initial_selection(&self, kind: TransactionKind) -> Option<String> {
        self.last_category()
            .filter(|last| self.contains(kind, last))
            .or_else(|| self.default_for(kind).map(str::to_string))
    }

    fn persist(&self, kind: TransactionKind) -> bool {
        save_value(self.store.as_ref(), storage_key(kind), self.book.list(kind))
    }
}
