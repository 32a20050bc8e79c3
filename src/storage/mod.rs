pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::LedgerError;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Keys under which each collection is stored.
pub mod keys {
    pub const TRANSACTIONS: &str = "transactions";
    pub const EXPENSE_CATEGORIES: &str = "expenseCategories";
    pub const INCOME_CATEGORIES: &str = "incomeCategories";
    pub const LAST_CATEGORY: &str = "lastCategory";
    pub const ACCOUNTS: &str = "accounts";
    pub const GROUPS: &str = "groups";
    pub const SPLIT_MEMBERS: &str = "splitMembers";
}

/// String blobs addressed by key. Absence of a key is not an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and decodes a JSON value. Missing keys yield `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Loads a stored list, falling back to `None` on absence or failure.
///
/// Failures are logged; callers keep working with defaults.
pub fn load_value<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match read_json(store, key) {
        Ok(value) => {
            debug!(key, found = value.is_some(), "loaded stored value");
            value
        }
        Err(err) => {
            error!(key, error = %err, "failed to load stored value");
            None
        }
    }
}

pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    load_value(store, key).unwrap_or_default()
}

/// Persists a value. Returns `false` after logging when the write fails; the
/// in-memory copy stays authoritative for the session.
pub fn save_value<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    match write_json(store, key, value) {
        Ok(()) => true,
        Err(err) => {
            error!(key, error = %err, "failed to save stored value");
            false
        }
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(LedgerError::Storage("disk unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(LedgerError::Storage("disk unavailable".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(LedgerError::Storage("disk unavailable".into()))
        }
    }

    #[test]
    fn failures_degrade_to_defaults() {
        let store = BrokenStore;
        let loaded: Vec<String> = load_collection(&store, keys::GROUPS);
        assert!(loaded.is_empty());
        assert!(!save_value(&store, keys::GROUPS, &loaded));
    }

    #[test]
    fn corrupt_blob_loads_as_empty() {
        let store = MemoryStore::new();
        store.set(keys::TRANSACTIONS, "{not json").unwrap();
        let loaded: Vec<u32> = load_collection(&store, keys::TRANSACTIONS);
        assert!(loaded.is_empty());
        assert!(read_json::<Vec<u32>>(&store, keys::TRANSACTIONS).is_err());
    }

    #[test]
    fn json_helpers_round_trip_through_store() {
        let store = MemoryStore::new();
        assert!(save_value(&store, keys::LAST_CATEGORY, "Food"));
        let value: Option<String> = load_value(&store, keys::LAST_CATEGORY);
        assert_eq!(value.as_deref(), Some("Food"));
    }
}
