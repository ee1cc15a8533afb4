//! Floor layout: work areas, their positions and qualification rules.
//!
//! Loaded once from `data/floor/work_areas.json` and validated before any
//! rota is generated. Tests use `FloorConfig::default_floor()`.

use crate::{
    error::{RotaError, RotaResult},
    staff::MAX_SKAP_LEVEL,
};
use serde::{Deserialize, Serialize};

// ── Area names ─────────────────────────────────────────────────────

pub const CAN_LINE:        &str = "Can Line";
pub const BOT_LINE:        &str = "Bot Line";
pub const CORONA_LINE:     &str = "Corona Line";
pub const KEG_LINE:        &str = "Keg Line";
pub const PACKAGING:       &str = "Packaging";
pub const MAGOR1_LOADING:  &str = "Magor 1 Loading";
pub const TENTS_LOADING:   &str = "Tents Loading";
pub const KEG_LOADING:     &str = "Keg Loading";
pub const PILOT:           &str = "Pilot";

/// Keg Line slots. The outside slot is the only one an
/// outside-only worker may take.
pub const KEG_OUTSIDE: &str = "Outside";
pub const KEG_INSIDE:  &str = "Inside";

/// Can Line production lines, in the order positions are derived.
pub const CAN_LINES: [&str; 3] = ["MAC1", "MAC2", "MAB3"];
/// Bot Line production lines.
pub const BOT_LINES: [&str; 2] = ["MAB1", "MAB2"];
/// Can Line slot whose requirement covers extra break-cover operators.
pub const CAN_LINE_COVER_SOURCE: &str = "MAC1";
/// Minimum Can Line crew when no explicit operator count is planned.
pub const CAN_LINE_MIN_OPS: u32 = 4;
/// Largest Can Line crew a plan may ask for.
pub const CAN_LINE_MAX_OPS: u32 = 6;
/// Upper bound on operators derived from one loading area's load count.
pub const MAX_LOADING_OPS: u32 = 20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequirement {
    pub min_skap_level: u8,
    #[serde(default)]
    pub keg_trained_required: bool,
    #[serde(default)]
    pub is_pilot: bool,
}

impl PositionRequirement {
    pub const fn new(min_skap_level: u8, keg_trained_required: bool) -> Self {
        Self { min_skap_level, keg_trained_required, is_pilot: false }
    }

    /// Requirement for coordinator slots beyond the configured ones.
    pub const fn default_pilot() -> Self {
        Self { min_skap_level: 4, keg_trained_required: false, is_pilot: true }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AreaCategory {
    Line,
    Loading,
    Coordinator,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PositionConfig {
    pub name: String,
    #[serde(flatten)]
    pub requirement: PositionRequirement,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkAreaConfig {
    pub name: String,
    pub category: AreaCategory,
    pub positions: Vec<PositionConfig>,
    /// Loads one operator can handle per shift. Loading areas only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loads_per_op: Option<u32>,
}

impl WorkAreaConfig {
    pub fn requirement(&self, position: &str) -> Option<PositionRequirement> {
        self.positions
            .iter()
            .find(|p| p.name == position)
            .map(|p| p.requirement)
    }

    /// The area-wide requirement for single-requirement areas.
    pub fn primary_requirement(&self) -> Option<PositionRequirement> {
        self.positions.first().map(|p| p.requirement)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WorkAreasFile {
    areas: Vec<WorkAreaConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorConfig {
    pub areas: Vec<WorkAreaConfig>,
}

impl FloorConfig {
    /// Load from the data/ directory.
    /// In tests, use FloorConfig::default_floor().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/floor/work_areas.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let floor = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Invalid floor config {path}: {e}"))?;
        log::debug!("Loaded {} work areas from {path}", floor.areas.len());
        Ok(floor)
    }

    pub fn from_json(json: &str) -> RotaResult<Self> {
        let file: WorkAreasFile = serde_json::from_str(json)?;
        let floor = Self { areas: file.areas };
        floor.validate()?;
        Ok(floor)
    }

    pub fn area(&self, name: &str) -> Option<&WorkAreaConfig> {
        self.areas.iter().find(|a| a.name == name)
    }

    pub fn requirement(&self, area: &str, position: &str) -> Option<PositionRequirement> {
        self.area(area).and_then(|a| a.requirement(position))
    }

    /// Check the layout carries everything the requirement deriver relies on.
    pub fn validate(&self) -> RotaResult<()> {
        let invalid = |reason: String| Err(RotaError::InvalidConfig { reason });

        for area in &self.areas {
            if area.positions.is_empty() {
                return invalid(format!("area '{}' has no positions", area.name));
            }
            for pos in &area.positions {
                if pos.requirement.min_skap_level > MAX_SKAP_LEVEL {
                    return invalid(format!(
                        "{} / {}: min skap level {} exceeds {MAX_SKAP_LEVEL}",
                        area.name, pos.name, pos.requirement.min_skap_level
                    ));
                }
            }
            match (area.category, area.loads_per_op) {
                (AreaCategory::Loading, None | Some(0)) => {
                    return invalid(format!(
                        "loading area '{}' needs a positive loadsPerOp",
                        area.name
                    ));
                }
                (AreaCategory::Line | AreaCategory::Coordinator, Some(_)) => {
                    return invalid(format!(
                        "area '{}' is not a loading area but sets loadsPerOp",
                        area.name
                    ));
                }
                _ => {}
            }
        }

        let required: [(&str, AreaCategory, &[&str]); 9] = [
            (CAN_LINE,       AreaCategory::Line,        &CAN_LINES),
            (BOT_LINE,       AreaCategory::Line,        &BOT_LINES),
            (CORONA_LINE,    AreaCategory::Line,        &[]),
            (KEG_LINE,       AreaCategory::Line,        &[KEG_OUTSIDE, KEG_INSIDE]),
            (PACKAGING,      AreaCategory::Line,        &[]),
            (MAGOR1_LOADING, AreaCategory::Loading,     &[]),
            (TENTS_LOADING,  AreaCategory::Loading,     &[]),
            (KEG_LOADING,    AreaCategory::Loading,     &[]),
            (PILOT,          AreaCategory::Coordinator, &[]),
        ];
        for (name, category, positions) in required {
            let Some(area) = self.area(name) else {
                return invalid(format!("missing work area '{name}'"));
            };
            if area.category != category {
                return invalid(format!("area '{name}' must be {category:?}"));
            }
            for position in positions {
                if area.requirement(position).is_none() {
                    return invalid(format!("area '{name}' is missing position '{position}'"));
                }
            }
        }
        Ok(())
    }

    /// The plant's standard layout.
    /// SKAP: 0=New Starter, 1=Beginner, 2=WH Intermediate, 3=WH Advanced,
    /// 4=Distop Intermediate, 5=Distop Advanced, 6=MOP.
    pub fn default_floor() -> Self {
        fn pos(name: &str, min_skap_level: u8, keg: bool) -> PositionConfig {
            PositionConfig {
                name: name.into(),
                requirement: PositionRequirement::new(min_skap_level, keg),
            }
        }
        fn pilot(name: &str) -> PositionConfig {
            PositionConfig {
                name: name.into(),
                requirement: PositionRequirement::default_pilot(),
            }
        }
        fn area(
            name: &str,
            category: AreaCategory,
            positions: Vec<PositionConfig>,
            loads_per_op: Option<u32>,
        ) -> WorkAreaConfig {
            WorkAreaConfig { name: name.into(), category, positions, loads_per_op }
        }

        Self {
            areas: vec![
                area(CAN_LINE, AreaCategory::Line, vec![
                    pos("MAC1", 1, false),
                    pos("MAC2", 1, false),
                    pos("MAB3", 2, false),
                ], None),
                area(BOT_LINE, AreaCategory::Line, vec![
                    pos("MAB1", 2, false),
                    pos("MAB2", 2, false),
                ], None),
                area(CORONA_LINE, AreaCategory::Line, vec![pos("Corona", 2, false)], None),
                area(KEG_LINE, AreaCategory::Line, vec![
                    pos(KEG_OUTSIDE, 1, false),
                    pos(KEG_INSIDE, 2, true),
                ], None),
                area(MAGOR1_LOADING, AreaCategory::Loading,
                     vec![pos("Magor 1", 2, false)], Some(15)),
                area(TENTS_LOADING, AreaCategory::Loading, vec![pos("Tents", 1, false)], Some(15)),
                area(KEG_LOADING, AreaCategory::Loading,
                     vec![pos("Keg Loading", 2, true)], Some(6)),
                area(PACKAGING, AreaCategory::Line, vec![pos("Packaging", 2, false)], None),
                area(PILOT, AreaCategory::Coordinator,
                     vec![pilot("Pilot 1"), pilot("Pilot 2")], None),
            ],
        }
    }
}
