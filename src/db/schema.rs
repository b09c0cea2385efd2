pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS owners (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS records (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id     INTEGER NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
    kind         TEXT NOT NULL CHECK (kind IN ('expense', 'income')),
    title        TEXT NOT NULL,
    amount       TEXT NOT NULL,
    category     TEXT NOT NULL,
    occurred_on  TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_owner_kind_date ON records(owner_id, kind, occurred_on);

CREATE TABLE IF NOT EXISTS goals (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id        INTEGER NOT NULL REFERENCES owners(id) ON DELETE CASCADE,
    name            TEXT NOT NULL,
    target_amount   TEXT NOT NULL,
    current_amount  TEXT NOT NULL DEFAULT '0',
    due_date        TEXT,
    completed       BOOLEAN NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_goals_owner ON goals(owner_id);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
