use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::domain::common::{match_id, parse_amount};
use crate::domain::transaction::{TransactionDraft, TransactionKind, TransactionRecord};
use crate::errors::LedgerError;
use crate::storage::{keys, load_collection, save_value, KeyValueStore};

use super::ServiceResult;

/// Logged transactions, newest first, mirrored to the store on every change.
pub struct TransactionService {
    store: Arc<dyn KeyValueStore>,
    transactions: Vec<TransactionRecord>,
}

impl TransactionService {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let transactions = load_collection(store.as_ref(), keys::TRANSACTIONS);
        Self {
            store,
            transactions,
        }
    }

    pub fn list(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&TransactionRecord> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Resolves a full id or unique id prefix.
    pub fn find_id(&self, needle: &str) -> Option<Uuid> {
        match_id(&self.transactions, needle)
    }

    /// Creates a record from form input. The date defaults to `today`.
    pub fn add(&mut self, draft: TransactionDraft, today: NaiveDate) -> ServiceResult<&TransactionRecord> {
        let amount = draft.amount.trim();
        check_amount(amount)?;
        let record = TransactionRecord::new(
            amount,
            draft.kind.unwrap_or(TransactionKind::Expense),
            draft.category.trim(),
            draft.date.unwrap_or(today),
        );
        if record.category.is_empty() {
            return Err(LedgerError::Validation("category is required".into()).into());
        }
        let record = match draft.note {
            Some(note) => record.with_note(note),
            None => record,
        };

        info!(id = %record.id, kind = %record.kind, category = %record.category, "transaction added");
        save_value(self.store.as_ref(), keys::LAST_CATEGORY, &record.category);
        self.transactions.insert(0, record);
        self.persist();
        Ok(&self.transactions[0])
    }

    pub fn delete(&mut self, id: Uuid) -> ServiceResult<TransactionRecord> {
        let position = self
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {id}")))?;
        let removed = self.transactions.remove(position);
        info!(id = %removed.id, "transaction deleted");
        self.persist();
        Ok(removed)
    }

    /// Drops every record. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.transactions.len();
        self.transactions.clear();
        info!(removed, "transactions cleared");
        self.persist();
        removed
    }

    fn persist(&self) -> bool {
        save_value(self.store.as_ref(), keys::TRANSACTIONS, &self.transactions)
    }
}

/// Amounts are magnitudes; the kind carries the sign.
fn check_amount(amount: &str) -> Result<(), LedgerError> {
    match parse_amount(amount) {
        Some(value) if value < 0.0 => Err(LedgerError::Validation(format!(
            "`{amount}` is negative; log it as the other kind instead"
        ))),
        Some(_) => Ok(()),
        None if amount.is_empty() => Err(LedgerError::Validation("amount is required".into())),
        None => Err(LedgerError::Validation(format!("`{amount}` is not a number"))),
    }
}
