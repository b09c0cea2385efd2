use anyhow::{Context, Result};
use std::path::Path;

use crate::analytics::dates::DATE_FORMAT;
use crate::models::MoneyRecord;

const HEADER: [&str; 5] = ["Date", "Kind", "Title", "Category", "Amount"];

/// Write records to `path` as CSV, one row per record, in the order given.
/// Returns the number of rows written.
pub(crate) fn export_records(path: &Path, records: &[MoneyRecord]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    wtr.write_record(HEADER)?;

    for rec in records {
        wtr.write_record([
            rec.occurred_on.format(DATE_FORMAT).to_string(),
            rec.kind.to_string(),
            rec.title.clone(),
            rec.category.clone(),
            format!("{:.2}", rec.amount),
        ])?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = records.len(), "Records exported");
    Ok(records.len())
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::RecordKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(kind: RecordKind, day: &str, title: &str, category: &str) -> MoneyRecord {
        MoneyRecord::new(
            1,
            kind,
            title.into(),
            dec!(12.5),
            category.into(),
            NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(),
        )
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![
            record(RecordKind::Expense, "2024-02-01", "Lunch, with Sam", "Food"),
            record(RecordKind::Income, "2024-01-31", "Paycheck", "Salary"),
        ];

        let count = export_records(&path, &records).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Date,Kind,Title,Category,Amount");
        assert_eq!(lines[1], "2024-02-01,Expense,\"Lunch, with Sam\",Food,12.50");
        assert_eq!(lines[2], "2024-01-31,Income,Paycheck,Salary,12.50");
    }

    #[test]
    fn test_export_empty_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        assert_eq!(export_records(&path, &[]).unwrap(), 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "Date,Kind,Title,Category,Amount");
    }

    #[test]
    fn test_export_bad_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(export_records(&path, &[]).is_err());
    }

    #[test]
    fn test_shellexpand_passthrough() {
        assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
        assert_eq!(shellexpand("out.csv"), "out.csv");
    }
}
