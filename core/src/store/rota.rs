//! Saved rotas and the commit path.

use super::{date_from_sql, date_to_sql, shift_from_sql, RotaStore};
use crate::{
    error::{RotaError, RotaResult},
    rota::{Assignment, Rota, RotaWarning},
    types::{month_key, ShiftType},
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension};

/// Raw `rota` row before JSON decoding.
type RotaRow = (String, String, String, String, String, String);

impl RotaStore {
    /// Commit an assignment for (date, shift).
    ///
    /// In one transaction: append a ledger row for every filled slot, then
    /// replace any rota already saved for the same key. Either everything
    /// lands or nothing does.
    pub fn commit_rota(
        &self,
        assignment: &Assignment,
        warnings:   &[RotaWarning],
        date:       NaiveDate,
        shift:      ShiftType,
    ) -> RotaResult<Rota> {
        let rota = Rota {
            rota_id:    uuid::Uuid::new_v4().to_string(),
            date,
            shift,
            assignment: assignment.clone(),
            warnings:   warnings.to_vec(),
            created_at: Utc::now(),
        };
        let assignment_json = serde_json::to_string(&rota.assignment)?;
        let warnings_json = serde_json::to_string(&rota.warnings)?;
        let date_sql = date_to_sql(date);
        let month = month_key(date);

        let tx = self.conn.unchecked_transaction()?;
        let mut recorded = 0usize;
        for (area, _position, staff) in assignment.filled_slots() {
            tx.execute(
                "INSERT INTO assignment_history (staff_id, month_key, area, work_date, shift)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![staff.id, month, area, date_sql, shift.as_str()],
            )?;
            recorded += 1;
        }
        tx.execute(
            "DELETE FROM rota WHERE rota_date = ?1 AND shift = ?2",
            params![date_sql, shift.as_str()],
        )?;
        tx.execute(
            "INSERT INTO rota
                 (rota_date, shift, rota_id, assignment_json, warnings_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                date_sql,
                shift.as_str(),
                rota.rota_id,
                assignment_json,
                warnings_json,
                rota.created_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        log::info!(
            "Committed rota {} for {date} {shift}: {recorded} assignments recorded, {} warnings",
            rota.rota_id,
            rota.warnings.len()
        );
        Ok(rota)
    }

    /// The saved rota for (date, shift), if one exists.
    pub fn rota_for(&self, date: NaiveDate, shift: ShiftType) -> RotaResult<Option<Rota>> {
        let row: Option<RotaRow> = self
            .conn
            .query_row(
                "SELECT rota_id, rota_date, shift, assignment_json, warnings_json, created_at
                 FROM rota WHERE rota_date = ?1 AND shift = ?2",
                params![date_to_sql(date), shift.as_str()],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?)),
            )
            .optional()?;
        row.map(decode_rota).transpose()
    }

    /// All saved rotas, by date then shift.
    pub fn list_rotas(&self) -> RotaResult<Vec<Rota>> {
        let mut stmt = self.conn.prepare(
            "SELECT rota_id, rota_date, shift, assignment_json, warnings_json, created_at
             FROM rota ORDER BY rota_date ASC, shift ASC",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
            })?
            .collect::<Result<Vec<RotaRow>, _>>()?;
        rows.into_iter().map(decode_rota).collect()
    }

    /// Remove the saved rota for (date, shift). The fairness ledger is
    /// left untouched.
    pub fn delete_rota(&self, date: NaiveDate, shift: ShiftType) -> RotaResult<()> {
        let removed = self.conn.execute(
            "DELETE FROM rota WHERE rota_date = ?1 AND shift = ?2",
            params![date_to_sql(date), shift.as_str()],
        )?;
        if removed == 0 {
            return Err(RotaError::RotaNotFound { date: date_to_sql(date), shift });
        }
        log::info!("Deleted rota for {date} {shift}");
        Ok(())
    }

    /// Number of saved rotas (for tests).
    pub fn rota_count(&self) -> RotaResult<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM rota", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn decode_rota(row: RotaRow) -> RotaResult<Rota> {
    let (rota_id, date, shift, assignment_json, warnings_json, created_at) = row;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| RotaError::Other(anyhow::anyhow!("bad stored timestamp '{created_at}': {e}")))?
        .with_timezone(&Utc);
    Ok(Rota {
        rota_id,
        date: date_from_sql(&date)?,
        shift: shift_from_sql(&shift)?,
        assignment: serde_json::from_str(&assignment_json)?,
        warnings: serde_json::from_str(&warnings_json)?,
        created_at,
    })
}
