mod aggregate;
pub(crate) mod dashboard;
pub(crate) mod dates;
pub(crate) mod forecast;

use anyhow::Result;

use crate::models::{MoneyRecord, RecordKind};

pub(crate) use dashboard::{Dashboard, DashboardRequest};
pub(crate) use dates::DateRange;
pub(crate) use forecast::Forecast;

/// Source of an owner's records.
///
/// Implementations must only ever return records whose `owner_id` matches the
/// requested owner. Ordering is free; the analytics functions do not rely on it.
pub(crate) trait RecordRepository {
    fn find_records(
        &self,
        owner_id: i64,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<MoneyRecord>>;
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod dates_tests;

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod aggregate_tests;
