use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{aggregate, total_on, CategoryTotal, MonthTotal};
use super::dates::{self, DateRange, WeekDay};
use super::forecast::{predict_next_month, Forecast};
use super::RecordRepository;
use crate::models::{MoneyRecord, RecordKind};

/// Parallel label/value arrays, the shape chart widgets expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct ChartSeries {
    pub(crate) labels: Vec<String>,
    pub(crate) data: Vec<f64>,
}

impl ChartSeries {
    pub(crate) fn from_categories(totals: &[CategoryTotal]) -> Self {
        Self {
            labels: totals.iter().map(|t| t.category.clone()).collect(),
            data: totals.iter().map(|t| t.total.to_f64().unwrap_or(0.0)).collect(),
        }
    }

    pub(crate) fn from_months(totals: &[MonthTotal]) -> Self {
        Self {
            labels: totals.iter().map(|t| t.month.clone()).collect(),
            data: totals.iter().map(|t| t.total.to_f64().unwrap_or(0.0)).collect(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DashboardRequest<'a> {
    pub(crate) owner_id: i64,
    pub(crate) start_date: Option<&'a str>,
    pub(crate) end_date: Option<&'a str>,
    pub(crate) today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Dashboard {
    pub(crate) range: DateRange,
    /// Non-fatal validation messages for the user.
    pub(crate) messages: Vec<String>,
    pub(crate) total_spent: Decimal,
    pub(crate) total_income: Decimal,
    pub(crate) balance: Decimal,
    pub(crate) expense_count: usize,
    pub(crate) income_count: usize,
    pub(crate) category_totals: Vec<CategoryTotal>,
    pub(crate) month_totals: Vec<MonthTotal>,
    pub(crate) category_chart: ChartSeries,
    pub(crate) month_chart: ChartSeries,
    pub(crate) forecast: Forecast,
    pub(crate) forecast_reason: Option<String>,
    pub(crate) today_spent: Decimal,
    pub(crate) today_income: Decimal,
    pub(crate) today_records: Vec<MoneyRecord>,
    pub(crate) week: Vec<WeekDay>,
    pub(crate) month_label: String,
}

/// Assemble everything the dashboard shows for one owner.
///
/// Only repository failures are errors. Bad date bounds become messages and
/// are left open; an owner with no records gets zero totals and an
/// insufficient-data forecast.
pub(crate) fn build<R: RecordRepository + ?Sized>(
    repo: &R,
    req: &DashboardRequest<'_>,
) -> Result<Dashboard> {
    let (range, errors) = dates::parse_range(req.start_date, req.end_date);
    for err in &errors {
        tracing::warn!(owner_id = req.owner_id, "{err}");
    }

    let expenses = repo.find_records(req.owner_id, RecordKind::Expense, &DateRange::all())?;
    let incomes = repo.find_records(req.owner_id, RecordKind::Income, &DateRange::all())?;

    let spent = aggregate(&expenses, &range);
    let earned = aggregate(&incomes, &range);
    let forecast = predict_next_month(&expenses);

    let today_records: Vec<MoneyRecord> = expenses
        .iter()
        .chain(incomes.iter())
        .filter(|r| r.occurred_on == req.today)
        .cloned()
        .collect();

    let expense_count = expenses.iter().filter(|r| range.contains(r.occurred_on)).count();
    let income_count = incomes.iter().filter(|r| range.contains(r.occurred_on)).count();

    tracing::debug!(
        owner_id = req.owner_id,
        %range,
        expense_count,
        income_count,
        total_spent = %spent.total,
        total_income = %earned.total,
        "Dashboard built"
    );

    Ok(Dashboard {
        range,
        messages: errors.iter().map(|e| e.to_string()).collect(),
        total_spent: spent.total,
        total_income: earned.total,
        balance: earned.total - spent.total,
        expense_count,
        income_count,
        category_chart: ChartSeries::from_categories(&spent.category_totals),
        month_chart: ChartSeries::from_months(&spent.month_totals),
        category_totals: spent.category_totals,
        month_totals: spent.month_totals,
        forecast_reason: forecast.reason(),
        forecast,
        today_spent: total_on(&expenses, req.today),
        today_income: total_on(&incomes, req.today),
        today_records,
        week: dates::week_strip(req.today),
        month_label: dates::month_label(req.today),
    })
}
