//! Parsing and validation of user-entered records and goals.
//!
//! Both front-ends funnel their input through here, so the CLI and the TUI
//! accept exactly the same syntax:
//!
//! ```text
//! [YYYY-MM-DD] <amount> <category> <title...>     records
//! <target> <name...>                               goals
//! ```
//!
//! A category containing spaces can be double-quoted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::analytics::dates::parse_date;

pub(crate) const MAX_TEXT_LEN: usize = 255;
pub(crate) const MAX_DECIMAL_PLACES: u32 = 2;
pub(crate) const MAX_DIGITS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum FormError {
    #[error("{0} is required.")]
    Missing(&'static str),
    #[error("{field} must be at most 255 characters.")]
    TooLong { field: &'static str },
    #[error("Enter a number for {field} (got '{value}').")]
    InvalidAmount { field: &'static str, value: String },
    #[error("{field} cannot be negative.")]
    Negative { field: &'static str },
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,
    #[error("Ensure that there are no more than 10 digits in total.")]
    TooManyDigits,
    #[error("Invalid date '{0}'. Please use YYYY-MM-DD.")]
    InvalidDate(String),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordForm {
    pub(crate) title: String,
    pub(crate) amount: Decimal,
    pub(crate) category: String,
    pub(crate) occurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GoalForm {
    pub(crate) name: String,
    pub(crate) target_amount: Decimal,
    pub(crate) current_amount: Decimal,
    pub(crate) due_date: Option<NaiveDate>,
    pub(crate) completed: bool,
}

/// Parse a money amount with at most 10 digits, 2 of them after the point.
/// `$` and thousands separators are tolerated.
pub(crate) fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, FormError> {
    let cleaned = raw.trim().replace(['$', ','], "");
    if cleaned.is_empty() {
        return Err(FormError::Missing(field));
    }
    let amount = Decimal::from_str(&cleaned).map_err(|_| FormError::InvalidAmount {
        field,
        value: raw.trim().to_string(),
    })?;
    check_amount(field, amount)
}

/// Sign, scale and digit limits shared by parsed input and computed sums.
pub(crate) fn check_amount(field: &'static str, amount: Decimal) -> Result<Decimal, FormError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(FormError::Negative { field });
    }
    if amount.scale() > MAX_DECIMAL_PLACES {
        return Err(FormError::TooManyDecimalPlaces);
    }
    let whole_digits_limit = Decimal::from(10_i64.pow(MAX_DIGITS - MAX_DECIMAL_PLACES));
    if amount >= whole_digits_limit {
        return Err(FormError::TooManyDigits);
    }
    Ok(amount)
}

pub(crate) fn validate_text(field: &'static str, raw: &str) -> Result<String, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::Missing(field));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(FormError::TooLong { field });
    }
    Ok(value.to_string())
}

pub(crate) fn parse_form_date(raw: &str) -> Result<NaiveDate, FormError> {
    parse_date(raw).ok_or_else(|| FormError::InvalidDate(raw.trim().to_string()))
}

/// Split off the first token, honouring a leading double-quoted span.
fn next_token(input: &str) -> Option<(String, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    if let Some(rest) = input.strip_prefix('"') {
        return match rest.find('"') {
            Some(end) => Some((rest[..end].to_string(), &rest[end + 1..])),
            None => Some((rest.to_string(), "")),
        };
    }
    match input.find(char::is_whitespace) {
        Some(end) => Some((input[..end].to_string(), &input[end..])),
        None => Some((input.to_string(), "")),
    }
}

fn looks_like_date(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-'
}

/// `[YYYY-MM-DD] <amount> <category> <title...>`; the date defaults to `today`.
pub(crate) fn parse_record_args(args: &str, today: NaiveDate) -> Result<RecordForm, FormError> {
    let (first, mut rest) = next_token(args).ok_or(FormError::Missing("Amount"))?;

    let (occurred_on, amount_raw) = if looks_like_date(&first) {
        let date = parse_form_date(&first)?;
        let (amount, after) = next_token(rest).ok_or(FormError::Missing("Amount"))?;
        rest = after;
        (date, amount)
    } else {
        (today, first)
    };
    let amount = parse_amount("Amount", &amount_raw)?;

    let (category_raw, rest) = next_token(rest).ok_or(FormError::Missing("Category"))?;
    let category = validate_text("Category", &category_raw)?;
    let title = validate_text("Title", rest)?;

    Ok(RecordForm {
        title,
        amount,
        category,
        occurred_on,
    })
}

/// `<target> <name...>`. The current amount starts at zero.
pub(crate) fn parse_goal_args(args: &str) -> Result<GoalForm, FormError> {
    let (target_raw, rest) = next_token(args).ok_or(FormError::Missing("Target amount"))?;
    let target_amount = parse_amount("Target amount", &target_raw)?;
    let name = validate_text("Name", rest)?;
    Ok(GoalForm {
        name,
        target_amount,
        current_amount: Decimal::ZERO,
        due_date: None,
        completed: false,
    })
}

#[cfg(test)]
#[path = "forms_tests.rs"]
mod forms_tests;
