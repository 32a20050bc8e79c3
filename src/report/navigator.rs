//! Steps the active window backward or forward by one month or year.

use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::calendar::{first_of_year, last_of_month, last_of_year, shift_month};
use super::range::{DateWindow, RangeMode};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn delta(self) -> i32 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prev" | "previous" | "<" => Ok(Direction::Previous),
            "next" | ">" => Ok(Direction::Next),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

/// Unit a navigable mode steps by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigationUnit {
    Month,
    Year,
}

impl NavigationUnit {
    pub fn for_mode(mode: RangeMode) -> Option<NavigationUnit> {
        match mode {
            RangeMode::Month => Some(NavigationUnit::Month),
            RangeMode::Year => Some(NavigationUnit::Year),
            RangeMode::LastSixMonths | RangeMode::Custom => None,
        }
    }

    /// Window one unit away from the one starting at `window.start`.
    pub fn step(self, window: DateWindow, direction: Direction) -> Option<DateWindow> {
        match self {
            NavigationUnit::Month => {
                let start = shift_month(window.start, direction.delta());
                DateWindow::new(start, last_of_month(start))
            }
            NavigationUnit::Year => {
                let year = window.start.year() + direction.delta();
                let (start, end) = first_of_year(year).zip(last_of_year(year))?;
                DateWindow::new(start, end)
            }
        }
    }
}

/// Mode and window after a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub mode: RangeMode,
    pub window: DateWindow,
}

impl Navigation {
    /// True when the request moved the window and promoted the mode to `Custom`.
    pub fn moved(&self, before: DateWindow) -> bool {
        self.mode == RangeMode::Custom && self.window != before
    }
}

/// Shifts `window` by one unit of `mode`.
///
/// Only `Month` and `Year` navigate; `LastSixMonths` and `Custom` return the
/// input unchanged. A successful shift reports the mode as `Custom` so the new
/// bounds are kept verbatim rather than re-derived from "now".
pub fn shift(mode: RangeMode, window: DateWindow, direction: Direction) -> Navigation {
    let unchanged = Navigation { mode, window };
    let Some(unit) = NavigationUnit::for_mode(mode) else {
        return unchanged;
    };
    match unit.step(window, direction) {
        Some(window) => Navigation {
            mode: RangeMode::Custom,
            window,
        },
        None => unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
        DateWindow::new(start, end).unwrap()
    }

    #[test]
    fn next_month_promotes_to_custom() {
        let result = shift(
            RangeMode::Month,
            window(day(2024, 3, 1), day(2024, 3, 31)),
            Direction::Next,
        );
        assert_eq!(result.mode, RangeMode::Custom);
        assert_eq!(result.window, window(day(2024, 4, 1), day(2024, 4, 30)));
    }

    #[test]
    fn previous_month_crosses_year_boundary() {
        let result = shift(
            RangeMode::Month,
            window(day(2024, 1, 1), day(2024, 1, 31)),
            Direction::Previous,
        );
        assert_eq!(result.window, window(day(2023, 12, 1), day(2023, 12, 31)));
    }

    #[test]
    fn month_end_follows_leap_february() {
        let result = shift(
            RangeMode::Month,
            window(day(2024, 3, 1), day(2024, 3, 31)),
            Direction::Previous,
        );
        assert_eq!(result.window, window(day(2024, 2, 1), day(2024, 2, 29)));
    }

    #[test]
    fn year_keeps_calendar_framing() {
        let result = shift(
            RangeMode::Year,
            window(day(2024, 1, 1), day(2024, 12, 31)),
            Direction::Previous,
        );
        assert_eq!(result.mode, RangeMode::Custom);
        assert_eq!(result.window, window(day(2023, 1, 1), day(2023, 12, 31)));
    }

    #[test]
    fn last_six_months_is_a_no_op() {
        let original = window(day(2023, 10, 1), day(2024, 3, 15));
        let result = shift(RangeMode::LastSixMonths, original, Direction::Next);
        assert_eq!(result.mode, RangeMode::LastSixMonths);
        assert_eq!(result.window, original);
        assert!(!result.moved(original));
    }

    #[test]
    fn custom_is_a_no_op() {
        let original = window(day(2024, 2, 3), day(2024, 2, 20));
        let result = shift(RangeMode::Custom, original, Direction::Previous);
        assert_eq!(result, Navigation {
            mode: RangeMode::Custom,
            window: original
        });
    }

    #[test]
    fn direction_parses_arrow_aliases() {
        assert_eq!("<".parse::<Direction>(), Ok(Direction::Previous));
        assert_eq!("NEXT".parse::<Direction>(), Ok(Direction::Next));
    }
}
