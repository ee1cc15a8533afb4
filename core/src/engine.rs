//! The assignment engine: turns a plan and a roster into a rota preview.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Pool construction: available staff split into pilot-eligible
//!      permanent (skap >= 4), regular permanent, and agency; each sorted
//!      by skap descending, roster order breaking ties.
//!   1. Pilot:     permanent pilot-eligible staff only.
//!   2. Can Line:  at least MIN_PERMANENT_ON_PRIMARY_LINE permanent
//!                 operators first, then agency preferred.
//!   3. Everything else, in derived area order, from one combined pool
//!      (permanent before agency, then skap descending).
//!
//! RULES:
//!   - Greedy. Each slot is committed as soon as it is decided; no
//!     look-ahead and no backtracking.
//!   - Fairness: a candidate who already worked the area this month is only
//!     used when nobody else qualifies, and that emits a rotation override.
//!   - The history ledger is read, never written. Generation has no side
//!     effects and the same inputs always give the same preview.

use crate::{
    availability::AvailabilitySnapshot,
    config::{FloorConfig, PositionRequirement, CAN_LINE, KEG_LINE, KEG_OUTSIDE, PILOT},
    fairness::AssignmentHistory,
    plan::ProductionPlan,
    qualification::is_qualified,
    requirements::{derive_requirements, AreaRequirement, RequirementSet},
    rota::{AreaAssignment, Assignment, RotaTotals, RotaWarning, SlotAssignment},
    staff::StaffMember,
    types::{ShiftType, StaffId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Permanent operators that must be on the Can Line before agency is used.
pub const MIN_PERMANENT_ON_PRIMARY_LINE: u32 = 1;

/// Skill tier from which permanent staff are considered for Pilot.
pub const PILOT_ELIGIBLE_SKAP: u8 = 4;

/// Everything one generation run produces. Nothing here is persisted
/// until it is passed to the commit path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotaPreview {
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub plan: ProductionPlan,
    pub assignments: Assignment,
    pub warnings: Vec<RotaWarning>,
    pub unassigned_staff: Vec<StaffMember>,
    pub requirements: RequirementSet,
    pub totals: RotaTotals,
}

/// Generate a rota preview. Pure: reads `history`, never writes it.
pub fn generate_rota(
    date:         NaiveDate,
    shift:        ShiftType,
    staff:        &[StaffMember],
    availability: &AvailabilitySnapshot,
    plan:         &ProductionPlan,
    history:      &AssignmentHistory,
    floor:        &FloorConfig,
) -> RotaPreview {
    let requirements = derive_requirements(plan, floor);
    let available = availability.available_staff(staff, date, shift);
    let pools = Pools::build(&available);

    log::debug!(
        "{date} {shift}: {} available ({} pilot-eligible, {} regular, {} agency)",
        available.len(),
        pools.pilot_eligible.len(),
        pools.regular.len(),
        pools.agency.len(),
    );

    let mut run = AssignmentRun::new(date, history, &requirements);

    if let Some(idx) = run.index_of(PILOT) {
        run.assign_pilots(idx, &requirements.areas[idx], &pools);
    }
    if let Some(idx) = run.index_of(CAN_LINE) {
        run.assign_primary_line(idx, &requirements.areas[idx], &pools);
    }
    run.assign_remaining(&requirements, &pools);

    let totals = RotaTotals {
        total_required:     requirements.total_required(),
        total_assigned:     run.assigned.len() as u32,
        permanent_assigned: available
            .iter()
            .filter(|s| s.is_permanent() && run.assigned.contains(&s.id))
            .count() as u32,
        agency_assigned:    available
            .iter()
            .filter(|s| s.is_agency && run.assigned.contains(&s.id))
            .count() as u32,
    };
    let unassigned_staff = available
        .iter()
        .filter(|s| !run.assigned.contains(&s.id))
        .map(|s| (*s).clone())
        .collect();

    log::info!(
        "{date} {shift}: assigned {}/{} ({} permanent, {} agency), {} warnings",
        totals.total_assigned,
        totals.total_required,
        totals.permanent_assigned,
        totals.agency_assigned,
        run.warnings.len(),
    );

    RotaPreview {
        date,
        shift,
        plan: plan.clone(),
        assignments: Assignment { areas: run.areas },
        warnings: run.warnings,
        unassigned_staff,
        requirements,
        totals,
    }
}

/// The three candidate pools, each sorted by skap descending.
struct Pools<'a> {
    pilot_eligible: Vec<&'a StaffMember>,
    regular:        Vec<&'a StaffMember>,
    agency:         Vec<&'a StaffMember>,
}

impl<'a> Pools<'a> {
    fn build(available: &[&'a StaffMember]) -> Self {
        let mut pilot_eligible: Vec<_> = available
            .iter()
            .copied()
            .filter(|s| s.is_permanent() && s.skap_level >= PILOT_ELIGIBLE_SKAP)
            .collect();
        let mut regular: Vec<_> = available
            .iter()
            .copied()
            .filter(|s| s.is_permanent() && s.skap_level < PILOT_ELIGIBLE_SKAP)
            .collect();
        let mut agency: Vec<_> = available.iter().copied().filter(|s| s.is_agency).collect();

        // Stable sorts: roster order survives between equal tiers.
        for pool in [&mut pilot_eligible, &mut regular, &mut agency] {
            pool.sort_by(|a, b| b.skap_level.cmp(&a.skap_level));
        }
        Self { pilot_eligible, regular, agency }
    }

    fn permanent(&self) -> Vec<&'a StaffMember> {
        let mut pool: Vec<_> = self
            .pilot_eligible
            .iter()
            .chain(self.regular.iter())
            .copied()
            .collect();
        pool.sort_by(|a, b| b.skap_level.cmp(&a.skap_level));
        pool
    }

    /// Permanent before agency, then skap descending.
    fn combined(&self) -> Vec<&'a StaffMember> {
        let mut pool: Vec<_> = self
            .pilot_eligible
            .iter()
            .chain(self.regular.iter())
            .chain(self.agency.iter())
            .copied()
            .collect();
        pool.sort_by(|a, b| {
            a.is_agency
                .cmp(&b.is_agency)
                .then_with(|| b.skap_level.cmp(&a.skap_level))
        });
        pool
    }
}

/// Mutable state for one generation run. Dropped when the run ends.
struct AssignmentRun<'h> {
    date:     NaiveDate,
    history:  &'h AssignmentHistory,
    assigned: HashSet<StaffId>,
    warnings: Vec<RotaWarning>,
    areas:    Vec<AreaAssignment>,
}

impl<'h> AssignmentRun<'h> {
    fn new(date: NaiveDate, history: &'h AssignmentHistory, requirements: &RequirementSet) -> Self {
        Self {
            date,
            history,
            assigned: HashSet::new(),
            warnings: Vec::new(),
            areas: requirements.areas.iter().map(|a| AreaAssignment::new(&a.area)).collect(),
        }
    }

    fn index_of(&self, area: &str) -> Option<usize> {
        self.areas.iter().position(|a| a.area == area)
    }

    fn is_free(&self, staff: &StaffMember) -> bool {
        !self.assigned.contains(&staff.id)
    }

    fn worked_here(&self, staff: &StaffMember, area: &str) -> bool {
        self.history.was_assigned_this_month(staff.id, area, self.date)
    }

    /// First free, qualified candidate in pool order.
    fn first_qualified<'a>(
        &self,
        pool: &[&'a StaffMember],
        req: &PositionRequirement,
        area: &str,
        position: &str,
        skip_recent: bool,
    ) -> Option<&'a StaffMember> {
        pool.iter().copied().find(|s| {
            self.is_free(s)
                && is_qualified(s, req, area, position)
                && !(skip_recent && self.worked_here(s, area))
        })
    }

    /// Fresh candidate first; otherwise relax the monthly rule and warn.
    fn pick_with_rotation<'a>(
        &mut self,
        pool: &[&'a StaffMember],
        req: &PositionRequirement,
        area: &str,
        position: &str,
    ) -> Option<&'a StaffMember> {
        if let Some(s) = self.first_qualified(pool, req, area, position, true) {
            return Some(s);
        }
        let fallback = self.first_qualified(pool, req, area, position, false)?;
        log::warn!("{}: rotation override for {} on {area}", self.date, fallback.name);
        self.warnings.push(RotaWarning::RotationOverride {
            staff_name: fallback.name.clone(),
            area: area.to_string(),
        });
        Some(fallback)
    }

    fn fill(&mut self, idx: usize, position: &str, staff: Option<&StaffMember>) {
        if let Some(s) = staff {
            self.assigned.insert(s.id);
        }
        self.areas[idx].slots.push(SlotAssignment {
            position: position.to_string(),
            staff: staff.cloned(),
        });
    }

    fn leave_unfilled(&mut self, idx: usize, position: &str, warning: RotaWarning) {
        log::warn!("{}: {warning}", self.date);
        self.warnings.push(warning);
        self.fill(idx, position, None);
    }

    fn unfilled(area: &str, position: &str) -> RotaWarning {
        RotaWarning::UnfilledPosition {
            position: position.to_string(),
            area: area.to_string(),
        }
    }

    // ── Phase 1 ────────────────────────────────────────────────────

    fn assign_pilots(&mut self, idx: usize, req: &AreaRequirement, pools: &Pools<'_>) {
        for slot in &req.positions {
            let (area, position, r) = (req.area.as_str(), slot.name.as_str(), &slot.requirement);
            match self.pick_with_rotation(&pools.pilot_eligible, r, area, position) {
                Some(s) => self.fill(idx, position, Some(s)),
                None => self.leave_unfilled(idx, position, Self::unfilled(area, position)),
            }
        }
    }

    // ── Phase 2 ────────────────────────────────────────────────────

    fn assign_primary_line(&mut self, idx: usize, req: &AreaRequirement, pools: &Pools<'_>) {
        let permanent = pools.permanent();
        let mut permanent_count = 0u32;

        for slot in &req.positions {
            let (area, position, r) = (req.area.as_str(), slot.name.as_str(), &slot.requirement);

            if permanent_count < MIN_PERMANENT_ON_PRIMARY_LINE {
                match self.pick_with_rotation(&permanent, r, area, position) {
                    Some(s) => {
                        self.fill(idx, position, Some(s));
                        permanent_count += 1;
                    }
                    None => self.leave_unfilled(
                        idx,
                        position,
                        RotaWarning::FteMinimumUnmet {
                            position: position.to_string(),
                            area: area.to_string(),
                        },
                    ),
                }
                continue;
            }

            // Floor met: agency first, fairness not applied to agency.
            if let Some(s) = self.first_qualified(&pools.agency, r, area, position, false) {
                self.fill(idx, position, Some(s));
                continue;
            }
            match self.pick_with_rotation(&permanent, r, area, position) {
                Some(s) => {
                    self.fill(idx, position, Some(s));
                    permanent_count += 1;
                }
                None => self.leave_unfilled(idx, position, Self::unfilled(area, position)),
            }
        }
        log::debug!("{}: {CAN_LINE} has {permanent_count} permanent operators", self.date);
    }

    // ── Phase 3 ────────────────────────────────────────────────────

    fn assign_remaining(&mut self, requirements: &RequirementSet, pools: &Pools<'_>) {
        let remaining: Vec<_> = pools
            .combined()
            .into_iter()
            .filter(|s| self.is_free(s))
            .collect();

        for (idx, req) in requirements.areas.iter().enumerate() {
            if req.area == PILOT || req.area == CAN_LINE {
                continue;
            }
            for slot in &req.positions {
                let (area, position) = (req.area.as_str(), slot.name.as_str());
                let r = &slot.requirement;

                if area == KEG_LINE && position == KEG_OUTSIDE {
                    let outside_only = remaining.iter().copied().find(|s| {
                        self.is_free(s)
                            && s.keg_line_outside_only
                            && is_qualified(s, r, area, position)
                    });
                    if let Some(s) = outside_only {
                        self.fill(idx, position, Some(s));
                        continue;
                    }
                }

                match self.pick_with_rotation(&remaining, r, area, position) {
                    Some(s) => self.fill(idx, position, Some(s)),
                    None => self.leave_unfilled(idx, position, Self::unfilled(area, position)),
                }
            }
        }
    }
}
