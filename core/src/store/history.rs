//! Fairness ledger queries.

use super::RotaStore;
use crate::{
    error::RotaResult,
    fairness::AssignmentHistory,
    types::{month_key, StaffId},
};
use chrono::NaiveDate;
use rusqlite::params;

impl RotaStore {
    /// Areas a staff member worked in `month`, oldest first.
    pub fn history_for(&self, staff_id: StaffId, month: &str) -> RotaResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT area FROM assignment_history
             WHERE staff_id = ?1 AND month_key = ?2
             ORDER BY id ASC",
        )?;
        let areas = stmt
            .query_map(params![staff_id, month], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(areas)
    }

    pub fn was_assigned_this_month(
        &self,
        staff_id: StaffId,
        area:     &str,
        date:     NaiveDate,
    ) -> RotaResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM assignment_history
             WHERE staff_id = ?1 AND month_key = ?2 AND area = ?3",
            params![staff_id, month_key(date), area],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Read-only snapshot of one month's ledger, ready for the engine.
    pub fn history_for_month(&self, month: &str) -> RotaResult<AssignmentHistory> {
        let mut stmt = self.conn.prepare(
            "SELECT staff_id, month_key, area FROM assignment_history
             WHERE month_key = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![month], |row| {
            Ok((row.get::<_, StaffId>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;
        let history = collect_history(rows)?;
        Ok(history)
    }

    /// Full ledger across all months.
    pub fn load_history(&self) -> RotaResult<AssignmentHistory> {
        let mut stmt = self.conn.prepare(
            "SELECT staff_id, month_key, area FROM assignment_history ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, StaffId>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;
        let history = collect_history(rows)?;
        Ok(history)
    }

    /// Number of ledger rows (for tests).
    pub fn history_entry_count(&self) -> RotaResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM assignment_history",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn collect_history(
    rows: impl Iterator<Item = rusqlite::Result<(StaffId, String, String)>>,
) -> RotaResult<AssignmentHistory> {
    let mut history = AssignmentHistory::new();
    for row in rows {
        let (staff_id, month, area) = row?;
        history.append(staff_id, month, area);
    }
    Ok(history)
}
