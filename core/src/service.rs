//! The rota service, the single owner of persisted rota state.
//!
//! RULES:
//!   - `preview` is pure. It reads a snapshot of the month's ledger and may
//!     be called any number of times; discarded previews leave no trace.
//!   - `commit_rota` is the only way the fairness ledger and the saved
//!     rotas change (`delete_rota` removes a rota but never ledger rows).
//!   - Single writer. A later commit for the same (date, shift) replaces
//!     the earlier one; concurrent commits are not reconciled.

use crate::{
    availability::AvailabilitySnapshot,
    config::FloorConfig,
    engine::{generate_rota, RotaPreview},
    error::RotaResult,
    plan::PlanBook,
    rota::{Assignment, Rota, RotaWarning},
    staff::StaffMember,
    store::RotaStore,
    types::{month_key, ShiftType, StaffId},
};
use chrono::NaiveDate;

pub struct RotaService {
    store: RotaStore,
    floor: FloorConfig,
}

impl RotaService {
    pub fn new(store: RotaStore, floor: FloorConfig) -> Self {
        Self { store, floor }
    }

    /// In-memory store with the standard floor layout (used in tests).
    pub fn in_memory() -> RotaResult<Self> {
        let store = RotaStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, FloorConfig::default_floor()))
    }

    pub fn store(&self) -> &RotaStore {
        &self.store
    }

    /// Build a preview for (date, shift). Reads the ledger, writes nothing.
    pub fn preview(
        &self,
        date:         NaiveDate,
        shift:        ShiftType,
        roster:       &[StaffMember],
        availability: &AvailabilitySnapshot,
        plans:        &PlanBook,
    ) -> RotaResult<RotaPreview> {
        let history = self.store.history_for_month(&month_key(date))?;
        let plan = plans.plan_for(date, shift);
        Ok(generate_rota(date, shift, roster, availability, &plan, &history, &self.floor))
    }

    /// Commit an assignment produced by `preview` for this exact key.
    /// Committing it under any other (date, shift) is a caller error.
    pub fn commit_rota(
        &self,
        assignment: &Assignment,
        warnings:   &[RotaWarning],
        date:       NaiveDate,
        shift:      ShiftType,
    ) -> RotaResult<Rota> {
        self.store.commit_rota(assignment, warnings, date, shift)
    }

    /// Commit a preview under its own key.
    pub fn commit_preview(&self, preview: &RotaPreview) -> RotaResult<Rota> {
        self.commit_rota(&preview.assignments, &preview.warnings, preview.date, preview.shift)
    }

    pub fn was_assigned_this_month(
        &self,
        staff_id: StaffId,
        area:     &str,
        date:     NaiveDate,
    ) -> RotaResult<bool> {
        self.store.was_assigned_this_month(staff_id, area, date)
    }

    pub fn history_for(&self, staff_id: StaffId, month: &str) -> RotaResult<Vec<String>> {
        self.store.history_for(staff_id, month)
    }

    pub fn rota_for(&self, date: NaiveDate, shift: ShiftType) -> RotaResult<Option<Rota>> {
        self.store.rota_for(date, shift)
    }

    pub fn list_rotas(&self) -> RotaResult<Vec<Rota>> {
        self.store.list_rotas()
    }

    pub fn delete_rota(&self, date: NaiveDate, shift: ShiftType) -> RotaResult<()> {
        self.store.delete_rota(date, shift)
    }

    pub fn rota_count(&self) -> RotaResult<i64> {
        self.store.rota_count()
    }
}
