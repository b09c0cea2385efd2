use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use super::dates::{DateRange, Month};
use crate::models::MoneyRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MonthTotal {
    /// "YYYY-MM"
    pub(crate) month: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct Aggregate {
    pub(crate) total: Decimal,
    pub(crate) category_totals: Vec<CategoryTotal>,
    pub(crate) month_totals: Vec<MonthTotal>,
}

/// Sum the records that fall inside `range`, overall, per category and per month.
///
/// Categories are matched exactly (no case folding) and come back largest first;
/// equal totals keep the order in which the categories were first seen. Months
/// come back oldest first.
pub(crate) fn aggregate(records: &[MoneyRecord], range: &DateRange) -> Aggregate {
    let mut total = Decimal::ZERO;
    let mut category_totals: Vec<CategoryTotal> = Vec::new();
    let mut category_index: HashMap<&str, usize> = HashMap::new();
    let mut months: BTreeMap<Month, Decimal> = BTreeMap::new();

    for rec in records.iter().filter(|r| range.contains(r.occurred_on)) {
        total += rec.amount;

        match category_index.get(rec.category.as_str()) {
            Some(&i) => category_totals[i].total += rec.amount,
            None => {
                category_index.insert(rec.category.as_str(), category_totals.len());
                category_totals.push(CategoryTotal {
                    category: rec.category.clone(),
                    total: rec.amount,
                });
            }
        }

        *months.entry(Month::of(rec.occurred_on)).or_insert(Decimal::ZERO) += rec.amount;
    }

    // sort_by is stable: ties stay in first-seen order
    category_totals.sort_by(|a, b| b.total.cmp(&a.total));

    let month_totals = months
        .into_iter()
        .map(|(month, total)| MonthTotal {
            month: month.to_string(),
            total,
        })
        .collect();

    Aggregate {
        total,
        category_totals,
        month_totals,
    }
}

/// Total of the records dated exactly `day`.
pub(crate) fn total_on(records: &[MoneyRecord], day: chrono::NaiveDate) -> Decimal {
    records
        .iter()
        .filter(|r| r.occurred_on == day)
        .map(|r| r.amount)
        .sum()
}
