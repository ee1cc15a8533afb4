//! Assignments, warnings and saved rotas.

use crate::{
    staff::StaffMember,
    types::{ShiftType, StaffId},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotAssignment {
    pub position: String,
    /// `None` when no qualified candidate was found.
    pub staff: Option<StaffMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AreaAssignment {
    pub area: String,
    pub slots: Vec<SlotAssignment>,
}

impl AreaAssignment {
    pub fn new(area: &str) -> Self {
        Self { area: area.to_string(), slots: Vec::new() }
    }

    pub fn filled(&self) -> impl Iterator<Item = &StaffMember> {
        self.slots.iter().filter_map(|s| s.staff.as_ref())
    }
}

/// Area → position → staff, in derived order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub areas: Vec<AreaAssignment>,
}

impl Assignment {
    pub fn area(&self, area: &str) -> Option<&AreaAssignment> {
        self.areas.iter().find(|a| a.area == area)
    }

    /// Staff in a slot. Outer `None`: no such slot. Inner `None`: unfilled.
    pub fn staff_at(&self, area: &str, position: &str) -> Option<Option<&StaffMember>> {
        self.area(area)?
            .slots
            .iter()
            .find(|s| s.position == position)
            .map(|s| s.staff.as_ref())
    }

    /// Every filled slot as (area, position, staff).
    pub fn filled_slots(&self) -> impl Iterator<Item = (&str, &str, &StaffMember)> {
        self.areas.iter().flat_map(|a| {
            a.slots.iter().filter_map(move |s| {
                s.staff
                    .as_ref()
                    .map(|staff| (a.area.as_str(), s.position.as_str(), staff))
            })
        })
    }

    /// Area a staff member was placed in, if any.
    pub fn area_of(&self, staff_id: StaffId) -> Option<&str> {
        self.filled_slots()
            .find(|(_, _, s)| s.id == staff_id)
            .map(|(area, _, _)| area)
    }

    pub fn unfilled_count(&self) -> usize {
        self.areas
            .iter()
            .flat_map(|a| a.slots.iter())
            .filter(|s| s.staff.is_none())
            .count()
    }
}

/// Non-fatal outcomes of rota generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RotaWarning {
    /// Fairness rule bypassed: nobody else qualified was free.
    RotationOverride { staff_name: String, area: String },
    /// No permanent operator could anchor the primary line.
    FteMinimumUnmet { position: String, area: String },
    /// No qualified candidate at all.
    UnfilledPosition { position: String, area: String },
}

impl RotaWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RotationOverride { .. } => "rotation-override",
            Self::FteMinimumUnmet { .. }  => "fte-minimum-unmet",
            Self::UnfilledPosition { .. } => "unfilled-position",
        }
    }
}

impl fmt::Display for RotaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RotationOverride { staff_name, area } => {
                write!(f, "{staff_name} assigned to {area} again this month (rotation override)")
            }
            Self::FteMinimumUnmet { position, area } => {
                write!(f, "No FTE available for {position} in {area} (FTE minimum not met)")
            }
            Self::UnfilledPosition { position, area } => {
                write!(f, "No qualified staff for {position} in {area}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RotaTotals {
    pub total_required: u32,
    pub total_assigned: u32,
    pub permanent_assigned: u32,
    pub agency_assigned: u32,
}

/// A committed rota. One per (date, shift).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rota {
    pub rota_id: String,
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub assignment: Assignment,
    pub warnings: Vec<RotaWarning>,
    pub created_at: DateTime<Utc>,
}
