#![doc(test(attr(deny(warnings))))]

//! Pocket Ledger keeps a personal income and expense log and turns it into
//! per-category reports over calendar windows. Accounts, groups and an even
//! bill splitter round out the toolkit; the `pocket_ledger_cli` shell drives it.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod report;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Pocket Ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
