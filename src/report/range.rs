//! Turns a range selection into a concrete inclusive date window.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{first_of_month, first_of_year, last_of_month, last_of_year, shift_month};

/// Granularity of the reporting window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RangeMode {
    #[default]
    Month,
    LastSixMonths,
    Year,
    Custom,
}

impl RangeMode {
    pub const ALL: [RangeMode; 4] = [
        RangeMode::Month,
        RangeMode::LastSixMonths,
        RangeMode::Year,
        RangeMode::Custom,
    ];

    /// Parses a user-facing label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<RangeMode> {
        match label.trim().to_ascii_lowercase().as_str() {
            "month" | "m" => Some(RangeMode::Month),
            "last6" | "6m" | "last-six-months" | "lastsixmonths" => {
                Some(RangeMode::LastSixMonths)
            }
            "year" | "y" => Some(RangeMode::Year),
            "custom" | "c" => Some(RangeMode::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for RangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RangeMode::Month => "month",
            RangeMode::LastSixMonths => "last6",
            RangeMode::Year => "year",
            RangeMode::Custom => "custom",
        };
        f.write_str(label)
    }
}

impl FromStr for RangeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RangeMode::from_label(value).ok_or_else(|| format!("unknown range mode `{value}`"))
    }
}

/// Inclusive calendar-day window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Builds a window, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format("%Y/%m/%d"),
            self.end.format("%Y/%m/%d")
        )
    }
}

/// Why a window could not be produced. None of these are failures; the caller
/// prompts for a complete selection instead of rendering a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    MissingCustomBounds,
    InvertedCustomBounds,
    UnknownMode(String),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::MissingCustomBounds => {
                f.write_str("select both a start and an end date")
            }
            UnresolvedReason::InvertedCustomBounds => {
                f.write_str("the start date must not be after the end date")
            }
            UnresolvedReason::UnknownMode(label) => write!(f, "unknown range mode `{label}`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Window(DateWindow),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    pub fn window(&self) -> Option<DateWindow> {
        match self {
            Resolution::Window(window) => Some(*window),
            Resolution::Unresolved(_) => None,
        }
    }
}

pub fn resolve(
    mode: RangeMode,
    reference: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Resolution {
    let bounds = match mode {
        RangeMode::Month => Some((first_of_month(reference), last_of_month(reference))),
        RangeMode::LastSixMonths => {
            Some((first_of_month(shift_month(reference, -5)), reference))
        }
        RangeMode::Year => first_of_year(reference.year()).zip(last_of_year(reference.year())),
        RangeMode::Custom => {
            let (Some(start), Some(end)) = (custom_start, custom_end) else {
                return Resolution::Unresolved(UnresolvedReason::MissingCustomBounds);
            };
            Some((start, end))
        }
    };

    match bounds.and_then(|(start, end)| DateWindow::new(start, end)) {
        Some(window) => Resolution::Window(window),
        None => Resolution::Unresolved(UnresolvedReason::InvertedCustomBounds),
    }
}

/// Resolves a textual mode, treating unrecognized labels as unresolved.
pub fn resolve_label(
    label: &str,
    reference: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Resolution {
    match RangeMode::from_label(label) {
        Some(mode) => resolve(mode, reference, custom_start, custom_end),
        None => Resolution::Unresolved(UnresolvedReason::UnknownMode(label.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> Resolution {
        Resolution::Window(DateWindow { start, end })
    }

    #[test]
    fn month_covers_reference_month() {
        assert_eq!(
            resolve(RangeMode::Month, day(2024, 3, 15), None, None),
            window(day(2024, 3, 1), day(2024, 3, 31))
        );
    }

    #[test]
    fn year_covers_reference_year() {
        assert_eq!(
            resolve(RangeMode::Year, day(2024, 7, 1), None, None),
            window(day(2024, 1, 1), day(2024, 12, 31))
        );
    }

    #[test]
    fn last_six_months_ends_on_reference_day() {
        assert_eq!(
            resolve(RangeMode::LastSixMonths, day(2024, 3, 15), None, None),
            window(day(2023, 10, 1), day(2024, 3, 15))
        );
    }

    #[test]
    fn custom_passes_bounds_through() {
        assert_eq!(
            resolve(
                RangeMode::Custom,
                day(2030, 1, 1),
                Some(day(2024, 2, 3)),
                Some(day(2024, 2, 20))
            ),
            window(day(2024, 2, 3), day(2024, 2, 20))
        );
    }

    #[test]
    fn custom_without_bounds_is_unresolved() {
        let now = day(2024, 3, 15);
        assert_eq!(
            resolve(RangeMode::Custom, now, None, None),
            Resolution::Unresolved(UnresolvedReason::MissingCustomBounds)
        );
        assert_eq!(
            resolve(RangeMode::Custom, now, Some(now), None),
            Resolution::Unresolved(UnresolvedReason::MissingCustomBounds)
        );
    }

    #[test]
    fn inverted_custom_bounds_are_unresolved() {
        assert_eq!(
            resolve(
                RangeMode::Custom,
                day(2024, 3, 15),
                Some(day(2024, 3, 20)),
                Some(day(2024, 3, 1))
            ),
            Resolution::Unresolved(UnresolvedReason::InvertedCustomBounds)
        );
    }

    #[test]
    fn unknown_label_is_unresolved() {
        assert_eq!(
            resolve_label("fortnight", day(2024, 3, 15), None, None),
            Resolution::Unresolved(UnresolvedReason::UnknownMode("fortnight".into()))
        );
        assert_eq!(
            resolve_label("6m", day(2024, 3, 15), None, None).window(),
            Some(DateWindow {
                start: day(2023, 10, 1),
                end: day(2024, 3, 15)
            })
        );
    }

    #[test]
    fn window_contains_is_inclusive() {
        let w = DateWindow::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap();
        assert!(w.contains(day(2024, 3, 1)));
        assert!(w.contains(day(2024, 3, 31)));
        assert!(!w.contains(day(2024, 4, 1)));
        assert_eq!(w.to_string(), "2024/03/01 ~ 2024/03/31");
    }
}
