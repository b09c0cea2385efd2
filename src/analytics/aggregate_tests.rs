#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregate::{aggregate, total_on, Aggregate};
use super::*;
use crate::models::{MoneyRecord, RecordKind};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(day: &str, category: &str, amount: Decimal) -> MoneyRecord {
    MoneyRecord::new(
        1,
        RecordKind::Expense,
        format!("{category} on {day}"),
        amount,
        category.into(),
        date(day),
    )
}

fn sample() -> Vec<MoneyRecord> {
    vec![
        expense("2024-02-03", "Rent", dec!(900.00)),
        expense("2024-01-15", "Food", dec!(42.50)),
        expense("2024-01-31", "Food", dec!(7.50)),
        expense("2024-02-10", "food", dec!(5.00)),
        expense("2023-12-24", "Gifts", dec!(120.00)),
        expense("2024-02-14", "Food", dec!(25.00)),
    ]
}

#[test]
fn test_empty_input() {
    let agg = aggregate(&[], &DateRange::all());
    assert_eq!(agg.total, Decimal::ZERO);
    assert!(agg.category_totals.is_empty());
    assert!(agg.month_totals.is_empty());
}

#[test]
fn test_totals() {
    let agg = aggregate(&sample(), &DateRange::all());
    assert_eq!(agg.total, dec!(1100.00));
}

#[test]
fn test_partition_consistency() {
    let agg = aggregate(&sample(), &DateRange::all());
    let by_category: Decimal = agg.category_totals.iter().map(|c| c.total).sum();
    let by_month: Decimal = agg.month_totals.iter().map(|m| m.total).sum();
    assert_eq!(by_category, agg.total);
    assert_eq!(by_month, agg.total);
}

#[test]
fn test_categories_sorted_descending_and_case_sensitive() {
    let agg = aggregate(&sample(), &DateRange::all());
    let names: Vec<&str> = agg
        .category_totals
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["Rent", "Gifts", "Food", "food"]);
    assert_eq!(agg.category_totals[2].total, dec!(75.00));
    assert_eq!(agg.category_totals[3].total, dec!(5.00));
    for pair in agg.category_totals.windows(2) {
        assert!(pair[0].total >= pair[1].total);
    }
}

#[test]
fn test_category_ties_keep_first_seen_order() {
    let records = vec![
        expense("2024-01-01", "Books", dec!(10)),
        expense("2024-01-02", "Games", dec!(30)),
        expense("2024-01-03", "Apps", dec!(10)),
        expense("2024-01-04", "Music", dec!(10)),
    ];
    let agg = aggregate(&records, &DateRange::all());
    let names: Vec<&str> = agg
        .category_totals
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(names, vec!["Games", "Books", "Apps", "Music"]);
}

#[test]
fn test_months_sorted_ascending() {
    let agg = aggregate(&sample(), &DateRange::all());
    let months: Vec<(&str, Decimal)> = agg
        .month_totals
        .iter()
        .map(|m| (m.month.as_str(), m.total))
        .collect();
    assert_eq!(
        months,
        vec![
            ("2023-12", dec!(120.00)),
            ("2024-01", dec!(50.00)),
            ("2024-02", dec!(930.00)),
        ]
    );
}

#[test]
fn test_range_filter_inclusive_bounds() {
    let range = DateRange {
        start: Some(date("2024-01-15")),
        end: Some(date("2024-02-10")),
    };
    let agg = aggregate(&sample(), &range);
    // 42.50 (start day) + 7.50 + 900.00 + 5.00 (end day)
    assert_eq!(agg.total, dec!(955.00));
    assert_eq!(agg.month_totals.len(), 2);
}

#[test]
fn test_range_excluding_everything() {
    let range = DateRange {
        start: Some(date("2030-01-01")),
        end: None,
    };
    let agg = aggregate(&sample(), &range);
    assert_eq!(agg, Aggregate::default());
}

#[test]
fn test_input_order_does_not_change_totals() {
    let mut reversed = sample();
    reversed.reverse();
    let a = aggregate(&sample(), &DateRange::all());
    let b = aggregate(&reversed, &DateRange::all());
    assert_eq!(a.total, b.total);
    assert_eq!(a.month_totals, b.month_totals);
}

#[test]
fn test_total_on_day() {
    let records = sample();
    assert_eq!(total_on(&records, date("2024-02-14")), dec!(25.00));
    assert_eq!(total_on(&records, date("2024-02-15")), Decimal::ZERO);
}
