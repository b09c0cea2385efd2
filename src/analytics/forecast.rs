//! Next-month spending forecast.
//!
//! Monthly expense totals are fitted with an ordinary least squares line
//! (`y = slope * x + intercept`, x = months since the first observed month) and
//! the line is evaluated one calendar month past the last observation. The
//! arithmetic stays in `Decimal` so that exact inputs give exact predictions.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::dates::Month;
use crate::models::MoneyRecord;

/// Distinct months needed before a line can be fitted.
pub(crate) const MIN_MONTHS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Prediction {
    /// "YYYY-MM" of the predicted month.
    pub(crate) month: String,
    /// Rounded to cents, half away from zero. May be zero or negative.
    pub(crate) amount: Decimal,
    /// Change in monthly spending per month.
    pub(crate) slope: Decimal,
    pub(crate) months_observed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum Forecast {
    Predicted(Prediction),
    InsufficientData { months_observed: usize },
}

impl Forecast {
    pub(crate) fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Predicted(p) => Some(p.amount),
            Self::InsufficientData { .. } => None,
        }
    }

    /// Human-readable explanation when no prediction is available.
    pub(crate) fn reason(&self) -> Option<String> {
        match self {
            Self::Predicted(_) => None,
            Self::InsufficientData { months_observed: 0 } => {
                Some("Not enough data to predict: no expenses recorded yet.".to_string())
            }
            Self::InsufficientData { months_observed } => Some(format!(
                "Not enough data to predict: expenses span {months_observed} month, at least {MIN_MONTHS} are needed."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Line {
    pub(crate) slope: Decimal,
    pub(crate) intercept: Decimal,
}

impl Line {
    pub(crate) fn at(&self, x: Decimal) -> Decimal {
        self.slope * x + self.intercept
    }
}

/// Least squares fit over `(x, y)` points. `None` when every x is the same.
pub(crate) fn fit_line(points: &[(Decimal, Decimal)]) -> Option<Line> {
    if points.is_empty() {
        return None;
    }
    let n = Decimal::from(points.len());
    let sum_x: Decimal = points.iter().map(|p| p.0).sum();
    let sum_y: Decimal = points.iter().map(|p| p.1).sum();
    let sum_xx: Decimal = points.iter().map(|p| p.0 * p.0).sum();
    let sum_xy: Decimal = points.iter().map(|p| p.0 * p.1).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.is_zero() {
        return None;
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(Line { slope, intercept })
}

/// Sum amounts per calendar month, oldest first.
pub(crate) fn monthly_totals(records: &[MoneyRecord]) -> Vec<(Month, Decimal)> {
    let mut buckets: BTreeMap<Month, Decimal> = BTreeMap::new();
    for rec in records {
        *buckets.entry(Month::of(rec.occurred_on)).or_insert(Decimal::ZERO) += rec.amount;
    }
    buckets.into_iter().collect()
}

/// Predict next month's spending from an owner's full expense history.
///
/// Input order does not matter. Callers pass the unfiltered history, not the
/// date-filtered view.
pub(crate) fn predict_next_month(records: &[MoneyRecord]) -> Forecast {
    let buckets = monthly_totals(records);
    let months_observed = buckets.len();
    if months_observed < MIN_MONTHS {
        return Forecast::InsufficientData { months_observed };
    }

    let (first, last) = match (buckets.first(), buckets.last()) {
        (Some(f), Some(l)) => (f.0, l.0),
        _ => return Forecast::InsufficientData { months_observed },
    };

    let points: Vec<(Decimal, Decimal)> = buckets
        .iter()
        .map(|(month, total)| (Decimal::from(month.ordinal() - first.ordinal()), *total))
        .collect();

    let Some(line) = fit_line(&points) else {
        return Forecast::InsufficientData { months_observed };
    };

    let next = last.next();
    let x = Decimal::from(next.ordinal() - first.ordinal());
    let mut amount = line
        .at(x)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(2);

    tracing::debug!(
        month = %next,
        %amount,
        slope = %line.slope,
        months_observed,
        "Forecast computed"
    );

    Forecast::Predicted(Prediction {
        month: next.to_string(),
        amount,
        slope: line.slope,
        months_observed,
    })
}
