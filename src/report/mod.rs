//! Report computation: resolve a window, filter, and aggregate.
//!
//! Everything here is pure. The caller passes the transaction snapshot, the
//! query, and the reference day; identical inputs always give identical output.

mod calendar;

pub mod aggregate;
pub mod navigator;
pub mod range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::transaction::TransactionRecord;

pub use aggregate::{aggregate, CategoryTotal, ReportResult, ReportTab};
pub use navigator::{shift, Direction, Navigation, NavigationUnit};
pub use range::{resolve, resolve_label, DateWindow, RangeMode, Resolution, UnresolvedReason};

/// Viewing-session state for the report screen. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ReportQuery {
    pub tab: ReportTab,
    pub range: RangeMode,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
    /// Unit that produced the current custom window through navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationUnit>,
}

impl ReportQuery {
    pub fn new(tab: ReportTab, range: RangeMode) -> Self {
        Self {
            tab,
            range,
            ..Self::default()
        }
    }

    pub fn custom(tab: ReportTab, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            tab,
            range: RangeMode::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
            navigation: None,
        }
    }

    pub fn set_tab(&mut self, tab: ReportTab) {
        self.tab = tab;
    }

    /// Explicit mode choice. Drops any navigation memory.
    pub fn set_range(&mut self, range: RangeMode) {
        self.range = range;
        self.navigation = None;
    }

    pub fn set_custom_start(&mut self, start: NaiveDate) {
        self.custom_start = Some(start);
        self.navigation = None;
    }

    pub fn set_custom_end(&mut self, end: NaiveDate) {
        self.custom_end = Some(end);
        self.navigation = None;
    }

    pub fn resolve(&self, now: NaiveDate) -> Resolution {
        resolve(self.range, now, self.custom_start, self.custom_end)
    }

    /// Steps the window one unit and stores the result as a custom range.
    ///
    /// Month and Year step by their own unit. A custom window that came out of
    /// an earlier step keeps stepping by that unit; any other custom range, and
    /// LastSixMonths, is left alone. Returns whether the query changed.
    pub fn navigate(&mut self, direction: Direction, now: NaiveDate) -> bool {
        let Some(window) = self.resolve(now).window() else {
            return false;
        };
        let (mode, unit) = match (self.range, self.navigation) {
            (RangeMode::Custom, Some(unit)) => (
                match unit {
                    NavigationUnit::Month => RangeMode::Month,
                    NavigationUnit::Year => RangeMode::Year,
                },
                unit,
            ),
            (mode, _) => match NavigationUnit::for_mode(mode) {
                Some(unit) => (mode, unit),
                None => return false,
            },
        };
        let outcome = shift(mode, window, direction);
        if !outcome.moved(window) {
            return false;
        }
        self.range = outcome.mode;
        self.custom_start = Some(outcome.window.start);
        self.custom_end = Some(outcome.window.end);
        self.navigation = Some(unit);
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Ready(ReportResult),
    /// Selection incomplete; render a prompt instead of a chart.
    Unresolved(UnresolvedReason),
}

impl ReportOutcome {
    pub fn ready(&self) -> Option<&ReportResult> {
        match self {
            ReportOutcome::Ready(result) => Some(result),
            ReportOutcome::Unresolved(_) => None,
        }
    }
}

pub fn compute(
    transactions: &[TransactionRecord],
    query: &ReportQuery,
    now: NaiveDate,
) -> ReportOutcome {
    match query.resolve(now) {
        Resolution::Window(window) => {
            ReportOutcome::Ready(aggregate(transactions, query.tab, window))
        }
        Resolution::Unresolved(reason) => ReportOutcome::Unresolved(reason),
    }
}
