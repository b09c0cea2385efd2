mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::analytics::{DateRange, RecordRepository};
use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

const RECORD_COLUMNS: &str =
    "id, owner_id, kind, title, amount, category, occurred_on, created_at";

const GOAL_COLUMNS: &str =
    "id, owner_id, name, target_amount, current_amount, due_date, completed, created_at";

/// Stored amounts are TEXT; an unreadable one is logged and read as zero.
fn parse_stored_amount(raw: &str, table: &str, column: &str) -> Decimal {
    Decimal::from_str(raw).unwrap_or_else(|_| {
        tracing::warn!(table, column, value = raw, "Unreadable amount, using 0");
        Decimal::ZERO
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MoneyRecord> {
    let kind_str: String = row.get(2)?;
    let kind = RecordKind::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown record kind: {kind_str}").into(),
        )
    })?;
    let amount_str: String = row.get(4)?;
    Ok(MoneyRecord {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        kind,
        title: row.get(3)?,
        amount: parse_stored_amount(&amount_str, "records", "amount"),
        category: row.get(5)?,
        occurred_on: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<Goal> {
    let target_str: String = row.get(3)?;
    let current_str: String = row.get(4)?;
    Ok(Goal {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: parse_stored_amount(&target_str, "goals", "target_amount"),
        current_amount: parse_stored_amount(&current_str, "goals", "current_amount"),
        due_date: row.get(5)?,
        completed: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::info!(path = %path.display(), "Database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "Schema migrated");
        }

        Ok(())
    }

    // ── Owners ────────────────────────────────────────────────

    /// Look up an owner by name, creating it on first use.
    pub(crate) fn ensure_owner(&self, name: &str) -> Result<Owner> {
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("Owner name cannot be empty");
        }
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO owners (name, created_at) VALUES (?1, ?2)",
            params![name, chrono::Utc::now().to_rfc3339()],
        )?;
        if inserted > 0 {
            tracing::info!(owner = name, "Owner created");
        }
        let owner = self.conn.query_row(
            "SELECT id, name, created_at FROM owners WHERE name = ?1",
            params![name],
            |row| {
                Ok(Owner {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )?;
        Ok(owner)
    }

    pub(crate) fn get_owners(&self) -> Result<Vec<Owner>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM owners ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Owner {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Records ───────────────────────────────────────────────

    pub(crate) fn insert_record(&self, rec: &MoneyRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO records (owner_id, kind, title, amount, category, occurred_on, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                rec.owner_id,
                rec.kind.as_str(),
                rec.title,
                rec.amount.to_string(),
                rec.category,
                rec.occurred_on,
                rec.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, owner_id = rec.owner_id, kind = rec.kind.as_str(), "Record added");
        Ok(id)
    }

    pub(crate) fn get_record(&self, id: i64) -> Result<Option<MoneyRecord>> {
        let result = self.conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
            params![id],
            record_from_row,
        );
        match result {
            Ok(r) => Ok(Some(r)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the editable fields of a stored record. Ownership and kind
    /// are never changed.
    pub(crate) fn update_record(&self, rec: &MoneyRecord) -> Result<()> {
        let id = rec
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a record without an id"))?;
        self.conn.execute(
            "UPDATE records SET title = ?1, amount = ?2, category = ?3, occurred_on = ?4
             WHERE id = ?5",
            params![
                rec.title,
                rec.amount.to_string(),
                rec.category,
                rec.occurred_on,
                id,
            ],
        )?;
        tracing::info!(id, "Record updated");
        Ok(())
    }

    pub(crate) fn delete_record(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM records WHERE id = ?1", params![id])?;
        tracing::info!(id, "Record deleted");
        Ok(())
    }

    /// One owner's records of one kind, newest first.
    pub(crate) fn find_records(
        &self,
        owner_id: i64,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<MoneyRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records
             WHERE owner_id = ?1 AND kind = ?2
               AND (?3 IS NULL OR occurred_on >= ?3)
               AND (?4 IS NULL OR occurred_on <= ?4)
             ORDER BY occurred_on DESC, id DESC"
        ))?;
        let rows = stmt.query_map(
            params![owner_id, kind.as_str(), range.start, range.end],
            record_from_row,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_record_count(&self, owner_id: i64) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )?)
    }

    // ── Goals ─────────────────────────────────────────────────

    pub(crate) fn insert_goal(&self, goal: &Goal) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO goals (owner_id, name, target_amount, current_amount, due_date, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.owner_id,
                goal.name,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.due_date,
                goal.completed,
                goal.created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, owner_id = goal.owner_id, "Goal added");
        Ok(id)
    }

    pub(crate) fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        let result = self.conn.query_row(
            &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
            params![id],
            goal_from_row,
        );
        match result {
            Ok(g) => Ok(Some(g)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Goals ordered by due date; goals without one come last.
    pub(crate) fn get_goals(&self, owner_id: i64) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE owner_id = ?1
             ORDER BY due_date IS NULL, due_date, id"
        ))?;
        let rows = stmt.query_map(params![owner_id], goal_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_goal(&self, goal: &Goal) -> Result<()> {
        let id = goal
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a goal without an id"))?;
        self.conn.execute(
            "UPDATE goals SET name = ?1, target_amount = ?2, current_amount = ?3,
                              due_date = ?4, completed = ?5
             WHERE id = ?6",
            params![
                goal.name,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.due_date,
                goal.completed,
                id,
            ],
        )?;
        tracing::info!(id, "Goal updated");
        Ok(())
    }

    pub(crate) fn delete_goal(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM goals WHERE id = ?1", params![id])?;
        tracing::info!(id, "Goal deleted");
        Ok(())
    }
}

impl RecordRepository for Database {
    fn find_records(
        &self,
        owner_id: i64,
        kind: RecordKind,
        range: &DateRange,
    ) -> Result<Vec<MoneyRecord>> {
        Database::find_records(self, owner_id, kind, range)
    }
}
