//! SQLite store for local runs and tests.

use super::{
    AccountQuery, AccountRow, AlertStore, InsertedAlert, NewAlert, ACCOUNTS_TABLE, ALERTS_TABLE,
};
use crate::error::{SeedError, SeedResult};
use rusqlite::{params, params_from_iter, Connection};

pub struct SqliteStore {
    conn: Connection,
}

/// A persisted alert as read back from SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRow {
    pub id: i64,
    pub stripe_account_id: String,
    pub alert_type: String,
    pub severity: String,
    pub resolved: bool,
}

impl SqliteStore {
    pub fn open(path: &str) -> SeedResult<Self> {
        let conn = Connection::open(path)?;
        // WAL only matters for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SeedResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create the local tables if they do not exist yet.
    pub fn migrate(&self) -> SeedResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_seeder_local.sql"))?;
        Ok(())
    }

    // ── Connected accounts ────────────────────────────────────

    pub fn insert_connected_account(
        &self,
        stripe_account_id: &str,
        status: &str,
    ) -> SeedResult<()> {
        self.conn.execute(
            "INSERT INTO connected_accounts (stripe_account_id, status) VALUES (?1, ?2)",
            params![stripe_account_id, status],
        )?;
        Ok(())
    }

    // ── Alerts ────────────────────────────────────────────────

    pub fn alert_count(&self) -> SeedResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM alerts", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn alerts_for_account(&self, stripe_account_id: &str) -> SeedResult<Vec<AlertRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stripe_account_id, alert_type, severity, resolved
             FROM alerts WHERE stripe_account_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![stripe_account_id], read_alert_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn all_alerts(&self) -> SeedResult<Vec<AlertRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, stripe_account_id, alert_type, severity, resolved
             FROM alerts ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map([], read_alert_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn select_accounts_inner(&self, query: &AccountQuery) -> rusqlite::Result<Vec<AccountRow>> {
        let mut clauses = Vec::new();
        let mut values: Vec<&str> = Vec::new();

        if let Some(status) = &query.status {
            values.push(status);
            clauses.push(format!("status = ?{}", values.len()));
        }
        if let Some(ids) = &query.ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders: Vec<String> = ids
                .iter()
                .map(|id| {
                    values.push(id);
                    format!("?{}", values.len())
                })
                .collect();
            clauses.push(format!("stripe_account_id IN ({})", placeholders.join(", ")));
        }

        let mut sql = String::from("SELECT stripe_account_id, status FROM connected_accounts");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(AccountRow {
                    stripe_account_id: row.get(0)?,
                    status: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn insert_alert_inner(&self, alert: &NewAlert) -> rusqlite::Result<Vec<InsertedAlert>> {
        let changed = self.conn.execute(
            "INSERT INTO alerts (stripe_account_id, alert_type, severity, resolved)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                alert.stripe_account_id,
                alert.alert_type.as_str(),
                alert.severity.as_str(),
                alert.resolved,
            ],
        )?;
        if changed == 0 {
            return Ok(Vec::new());
        }
        let row = self.conn.query_row(
            "SELECT id, stripe_account_id, alert_type, severity, resolved
             FROM alerts WHERE id = ?1",
            params![self.conn.last_insert_rowid()],
            read_alert_row,
        )?;
        Ok(vec![InsertedAlert {
            id: Some(row.id.into()),
            stripe_account_id: Some(row.stripe_account_id),
            alert_type: Some(row.alert_type),
            severity: Some(row.severity),
            resolved: Some(row.resolved),
        }])
    }
}

impl AlertStore for SqliteStore {
    fn select_accounts(&self, query: &AccountQuery) -> SeedResult<Vec<AccountRow>> {
        self.select_accounts_inner(query).map_err(|e| SeedError::Query {
            table: ACCOUNTS_TABLE,
            cause: e.to_string(),
        })
    }

    fn insert_alert(&self, alert: &NewAlert) -> SeedResult<Vec<InsertedAlert>> {
        self.insert_alert_inner(alert).map_err(|e| SeedError::Insert {
            table: ALERTS_TABLE,
            cause: e.to_string(),
        })
    }
}

fn read_alert_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRow> {
    Ok(AlertRow {
        id:                row.get(0)?,
        stripe_account_id: row.get(1)?,
        alert_type:        row.get(2)?,
        severity:          row.get(3)?,
        resolved:          row.get::<_, i64>(4)? != 0,
    })
}
