use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("Invalid start date format. Please use YYYY-MM-DD.")]
    InvalidStartDate(String),
    #[error("Invalid end date format. Please use YYYY-MM-DD.")]
    InvalidEndDate(String),
}

/// Inclusive date bounds. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct DateRange {
    pub(crate) start: Option<NaiveDate>,
    pub(crate) end: Option<NaiveDate>,
}

impl DateRange {
    pub(crate) fn all() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub(crate) fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (None, None) => write!(f, "All Time"),
            (Some(s), None) => write!(f, "from {s}"),
            (None, Some(e)) => write!(f, "until {e}"),
            (Some(s), Some(e)) => write!(f, "{s} to {e}"),
        }
    }
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse optional `start_date` / `end_date` inputs.
///
/// A bound that does not parse is reported and left open; it never aborts the
/// request.
pub(crate) fn parse_range(
    start: Option<&str>,
    end: Option<&str>,
) -> (DateRange, Vec<ValidationError>) {
    let mut range = DateRange::all();
    let mut errors = Vec::new();

    if let Some(raw) = start.filter(|s| !s.trim().is_empty()) {
        match parse_date(raw) {
            Some(d) => range.start = Some(d),
            None => errors.push(ValidationError::InvalidStartDate(raw.to_string())),
        }
    }
    if let Some(raw) = end.filter(|s| !s.trim().is_empty()) {
        match parse_date(raw) {
            Some(d) => range.end = Some(d),
            None => errors.push(ValidationError::InvalidEndDate(raw.to_string())),
        }
    }

    (range, errors)
}

/// A calendar month bucket. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Month {
    pub(crate) year: i32,
    pub(crate) month: u32,
}

impl Month {
    pub(crate) fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0; consecutive months differ by exactly one.
    pub(crate) fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub(crate) fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct WeekDay {
    pub(crate) name: String,
    pub(crate) day: u32,
    pub(crate) is_today: bool,
}

/// Monday through Sunday of the week containing `today`.
pub(crate) fn week_strip(today: NaiveDate) -> Vec<WeekDay> {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (0..7)
        .map(|i| {
            let day = monday + Duration::days(i);
            WeekDay {
                name: day.format("%a").to_string(),
                day: day.day(),
                is_today: day == today,
            }
        })
        .collect()
}

/// e.g. "October 2026".
pub(crate) fn month_label(today: NaiveDate) -> String {
    today.format("%B %Y").to_string()
}
