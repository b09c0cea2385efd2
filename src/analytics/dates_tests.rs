#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::dates::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ── parse_range ───────────────────────────────────────────────

#[test]
fn test_parse_range_both_bounds() {
    let (range, errors) = parse_range(Some("2024-01-01"), Some("2024-01-31"));
    assert!(errors.is_empty());
    assert_eq!(range.start, Some(date("2024-01-01")));
    assert_eq!(range.end, Some(date("2024-01-31")));
}

#[test]
fn test_parse_range_absent_and_empty() {
    let (range, errors) = parse_range(None, Some("  "));
    assert!(errors.is_empty());
    assert!(range.is_unbounded());
}

#[test]
fn test_parse_range_invalid_start_is_ignored() {
    let (range, errors) = parse_range(Some("2024-13-40"), Some("2024-02-01"));
    assert_eq!(
        errors,
        vec![ValidationError::InvalidStartDate("2024-13-40".into())]
    );
    assert_eq!(range.start, None);
    assert_eq!(range.end, Some(date("2024-02-01")));
}

#[test]
fn test_parse_range_invalid_end_message() {
    let (range, errors) = parse_range(None, Some("01/02/2024"));
    assert!(range.is_unbounded());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Invalid end date format. Please use YYYY-MM-DD."
    );
}

#[test]
fn test_parse_date_trims() {
    assert_eq!(parse_date(" 2024-02-29 "), Some(date("2024-02-29")));
    assert_eq!(parse_date("2023-02-29"), None);
    assert_eq!(parse_date("yesterday"), None);
}

// ── DateRange ─────────────────────────────────────────────────

#[test]
fn test_range_is_inclusive() {
    let range = DateRange {
        start: Some(date("2024-01-10")),
        end: Some(date("2024-01-20")),
    };
    assert!(range.contains(date("2024-01-10")));
    assert!(range.contains(date("2024-01-15")));
    assert!(range.contains(date("2024-01-20")));
    assert!(!range.contains(date("2024-01-09")));
    assert!(!range.contains(date("2024-01-21")));
}

#[test]
fn test_range_open_bounds() {
    let from = DateRange {
        start: Some(date("2024-01-10")),
        end: None,
    };
    assert!(from.contains(date("2099-12-31")));
    assert!(!from.contains(date("2024-01-09")));
    assert!(DateRange::all().contains(date("1970-01-01")));
}

#[test]
fn test_range_display() {
    assert_eq!(DateRange::all().to_string(), "All Time");
    let range = DateRange {
        start: Some(date("2024-01-01")),
        end: Some(date("2024-03-31")),
    };
    assert_eq!(range.to_string(), "2024-01-01 to 2024-03-31");
}

// ── Month ─────────────────────────────────────────────────────

#[test]
fn test_month_next_wraps_year() {
    let dec = Month::of(date("2023-12-05"));
    assert_eq!(dec.next().to_string(), "2024-01");
    assert_eq!(Month::of(date("2024-05-31")).next().to_string(), "2024-06");
}

#[test]
fn test_month_ordinal_is_consecutive() {
    let dec = Month::of(date("2023-12-31"));
    let jan = Month::of(date("2024-01-01"));
    assert_eq!(jan.ordinal() - dec.ordinal(), 1);
    assert_eq!(dec.next().ordinal(), jan.ordinal());
}

#[test]
fn test_month_ordering_is_chronological() {
    let mut months = vec![
        Month::of(date("2024-02-10")),
        Month::of(date("2023-11-30")),
        Month::of(date("2024-01-01")),
    ];
    months.sort();
    let keys: Vec<String> = months.iter().map(|m| m.to_string()).collect();
    assert_eq!(keys, vec!["2023-11", "2024-01", "2024-02"]);
}

// ── Week strip ────────────────────────────────────────────────

#[test]
fn test_week_strip_starts_monday() {
    // 2024-01-17 is a Wednesday
    let week = week_strip(date("2024-01-17"));
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].name, "Mon");
    assert_eq!(week[0].day, 15);
    assert_eq!(week[6].name, "Sun");
    assert_eq!(week[6].day, 21);
    let today: Vec<&WeekDay> = week.iter().filter(|d| d.is_today).collect();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].day, 17);
}

#[test]
fn test_week_strip_crosses_month() {
    // 2024-03-01 is a Friday
    let week = week_strip(date("2024-03-01"));
    let days: Vec<u32> = week.iter().map(|d| d.day).collect();
    assert_eq!(days, vec![26, 27, 28, 29, 1, 2, 3]);
}

#[test]
fn test_month_label() {
    assert_eq!(month_label(date("2026-10-18")), "October 2026");
}
