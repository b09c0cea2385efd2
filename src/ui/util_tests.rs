#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;
use crate::analytics::forecast::Prediction;
use crate::analytics::Forecast;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_fits() {
    assert_eq!(truncate("Coffee", 10), "Coffee");
    assert_eq!(truncate("Coffee", 6), "Coffee");
    assert_eq!(truncate("", 3), "");
}

#[test]
fn test_truncate_shortens() {
    assert_eq!(truncate("Groceries", 5), "Groc…");
    assert_eq!(truncate("Groceries", 1), "…");
    assert_eq!(truncate("Groceries", 0), "");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_grouping() {
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
    assert_eq!(format_amount(dec!(1234.5)), "$1,234.50");
    assert_eq!(format_amount(dec!(10000000)), "$10,000,000.00");
}

#[test]
fn test_format_amount_zero_and_negative() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
    assert_eq!(format_amount(dec!(-60.00)), "-$60.00");
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
}

// ── progress ──────────────────────────────────────────────────

#[test]
fn test_fill_ratio() {
    assert_eq!(fill_ratio(dec!(25), dec!(100)), 0.25);
    assert_eq!(fill_ratio(dec!(150), dec!(100)), 1.0);
    assert_eq!(fill_ratio(dec!(10), dec!(0)), 0.0);
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0.5, 4), "[██░░]");
    assert_eq!(progress_bar(0.0, 3), "[░░░]");
    assert_eq!(progress_bar(2.0, 2), "[██]");
}

// ── forecast_text ─────────────────────────────────────────────

#[test]
fn test_forecast_text() {
    let predicted = Forecast::Predicted(Prediction {
        month: "2024-03".into(),
        amount: dec!(1300.00),
        slope: dec!(100),
        months_observed: 2,
    });
    assert_eq!(forecast_text(&predicted), "$1,300.00 in 2024-03");

    let none = Forecast::InsufficientData { months_observed: 1 };
    assert!(forecast_text(&none).starts_with("Not enough data to predict"));
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!((index, scroll), (5, 3));

    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));

    scroll_to_bottom(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (9, 7));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1, 0);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!(index, 1);
}
