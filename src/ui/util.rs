use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::analytics::Forecast;

/// `1234567.89` → `"$1,234,567.89"`, negatives as `"-$42.50"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let formatted = format!("{:.2}", val.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{dec_part}")
}

/// Cut to at most `max` characters, ending in "…" when shortened.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}

/// `current / target` clamped to `0.0..=1.0`.
pub(crate) fn fill_ratio(current: Decimal, target: Decimal) -> f64 {
    if target <= Decimal::ZERO {
        return 0.0;
    }
    (current / target).to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
}

pub(crate) fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0)) * width as f64) as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// One-line summary of a forecast for cards and the CLI.
pub(crate) fn forecast_text(forecast: &Forecast) -> String {
    match forecast {
        Forecast::Predicted(p) => format!("{} in {}", format_amount(p.amount), p.month),
        Forecast::InsufficientData { .. } => forecast.reason().unwrap_or_default(),
    }
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page.saturating_sub(1));
        }
    }
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}
