//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! RULE: The fairness ledger and saved rotas change only through
//! `commit_rota` (and `delete_rota` for rotas). Preview generation never
//! holds a write path.

use crate::{
    error::{RotaError, RotaResult},
    types::ShiftType,
};
use chrono::NaiveDate;
use rusqlite::Connection;

mod history;
mod rota;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct RotaStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl RotaStore {
    pub fn open(path: &str) -> RotaResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RotaResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Path this store was opened from; `None` for in-memory stores.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RotaResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_rotas.sql"))?;
        Ok(())
    }
}

fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_from_sql(raw: &str) -> RotaResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| RotaError::Other(anyhow::anyhow!("bad stored date '{raw}': {e}")))
}

fn shift_from_sql(raw: &str) -> RotaResult<ShiftType> {
    ShiftType::parse(raw)
        .ok_or_else(|| RotaError::Other(anyhow::anyhow!("bad stored shift '{raw}'")))
}
