#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use pocket_ledger::{
    config::ConfigManager,
    domain::{TransactionKind, TransactionRecord},
    storage::{JsonFileStore, KeyValueStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// File-backed store and config manager rooted in an isolated directory.
pub fn setup_test_env() -> (PathBuf, Arc<dyn KeyValueStore>, ConfigManager) {
    let base = temp_home();
    let store = JsonFileStore::new(Some(base.clone())).expect("create json store");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (base, Arc::new(store), config_manager)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

pub fn expense(amount: &str, category: &str, date: NaiveDate) -> TransactionRecord {
    TransactionRecord::new(amount, TransactionKind::Expense, category, date)
}

pub fn income(amount: &str, category: &str, date: NaiveDate) -> TransactionRecord {
    TransactionRecord::new(amount, TransactionKind::Income, category, date)
}
