//! Staff roster records.
//!
//! The engine never edits the roster. Callers hand in an ordered slice and
//! the order is used as the tie-breaker whenever two candidates share a
//! skill tier.

use crate::{
    error::{RotaError, RotaResult},
    types::StaffId,
};
use serde::{Deserialize, Serialize};

/// Highest skill tier on the SKAP ladder.
pub const MAX_SKAP_LEVEL: u8 = 6;

/// SKAP tier names, indexed by level.
pub const SKAP_LEVELS: [&str; 7] = [
    "New Starter",
    "Beginner",
    "Warehouse Intermediate",
    "Warehouse Advanced",
    "Distop Intermediate",
    "Distop Advanced",
    "Multiop (MOP)",
];

/// Display label for a skill tier. Out-of-range levels render as "Unknown".
pub fn skap_label(level: u8) -> &'static str {
    SKAP_LEVELS.get(level as usize).copied().unwrap_or("Unknown")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub skap_level: u8,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub keg_trained: bool,
    #[serde(default)]
    pub is_agency: bool,
    /// Allow-list of work areas. Only consulted for agency staff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_restrictions: Option<Vec<String>>,
    /// Restricts the worker to the Keg Line "Outside" slot.
    #[serde(default)]
    pub keg_line_outside_only: bool,
    /// Agency worker rostered alongside A shift. Informational only.
    #[serde(default)]
    pub follows_a_shift: bool,
}

fn default_role() -> String {
    "Operator".into()
}

impl StaffMember {
    /// A permanent operator with no certifications.
    pub fn permanent(id: StaffId, name: &str, skap_level: u8) -> Self {
        Self {
            id,
            name: name.to_string(),
            skap_level,
            role: default_role(),
            keg_trained: false,
            is_agency: false,
            area_restrictions: None,
            keg_line_outside_only: false,
            follows_a_shift: false,
        }
    }

    /// An agency worker limited to `areas`.
    pub fn agency(id: StaffId, name: &str, skap_level: u8, areas: &[&str]) -> Self {
        Self {
            role: "Agency".into(),
            is_agency: true,
            area_restrictions: Some(areas.iter().map(|a| a.to_string()).collect()),
            ..Self::permanent(id, name, skap_level)
        }
    }

    pub fn with_keg_training(mut self) -> Self {
        self.keg_trained = true;
        self
    }

    pub fn outside_only(mut self) -> Self {
        self.keg_line_outside_only = true;
        self
    }

    pub fn is_permanent(&self) -> bool {
        !self.is_agency
    }

    pub fn skap_label(&self) -> &'static str {
        skap_label(self.skap_level)
    }

    /// True if this agency worker lists `area` in their allow-list.
    pub fn may_work_in(&self, area: &str) -> bool {
        self.area_restrictions
            .as_deref()
            .is_some_and(|areas| areas.iter().any(|a| a == area))
    }

    pub fn validate(&self) -> RotaResult<()> {
        if self.skap_level > MAX_SKAP_LEVEL {
            return Err(RotaError::InvalidStaff {
                staff_id: self.id,
                reason: format!(
                    "skap level {} exceeds maximum {MAX_SKAP_LEVEL}",
                    self.skap_level
                ),
            });
        }
        if self.name.trim().is_empty() {
            return Err(RotaError::InvalidStaff {
                staff_id: self.id,
                reason: "name is empty".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RosterFile {
    staff: Vec<StaffMember>,
}

/// Parse and validate a roster JSON document (`{"staff": [...]}`).
/// Roster order is preserved. Duplicate ids are rejected.
pub fn roster_from_json(json: &str) -> RotaResult<Vec<StaffMember>> {
    let file: RosterFile = serde_json::from_str(json)?;
    let mut seen = std::collections::HashSet::new();
    for member in &file.staff {
        member.validate()?;
        if !seen.insert(member.id) {
            return Err(RotaError::InvalidStaff {
                staff_id: member.id,
                reason: "duplicate id in roster".into(),
            });
        }
    }
    Ok(file.staff)
}

/// Load the roster from `{data_dir}/staff/roster.json`.
pub fn load_roster(data_dir: &str) -> anyhow::Result<Vec<StaffMember>> {
    let path = format!("{data_dir}/staff/roster.json");
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let roster = roster_from_json(&content)
        .map_err(|e| anyhow::anyhow!("Invalid roster {path}: {e}"))?;
    log::debug!("Loaded {} staff from {path}", roster.len());
    Ok(roster)
}
