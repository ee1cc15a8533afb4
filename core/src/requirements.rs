//! Requirement deriver: production plan → required positions per area.
//!
//! AREA ORDER (fixed, this is the order every later phase walks):
//!   1. Can Line
//!   2. Bot Line
//!   3. Corona Line
//!   4. Keg Line
//!   5. Packaging
//!   6. Magor 1 Loading
//!   7. Tents Loading
//!   8. Keg Loading
//!   9. Pilot
//!
//! RULE: an area that needs zero operators is left out of the set.

use crate::{
    config::{
        FloorConfig, PositionRequirement, WorkAreaConfig, BOT_LINE, BOT_LINES, CAN_LINE,
        CAN_LINES, CAN_LINE_COVER_SOURCE, CAN_LINE_MAX_OPS, CAN_LINE_MIN_OPS, CORONA_LINE,
        KEG_INSIDE, KEG_LINE, KEG_LOADING, KEG_OUTSIDE, MAGOR1_LOADING, MAX_LOADING_OPS,
        PACKAGING, PILOT, TENTS_LOADING,
    },
    plan::ProductionPlan,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PositionSlot {
    pub name: String,
    pub requirement: PositionRequirement,
}

/// Why an area is in the set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementSource {
    Lines { running: Vec<String> },
    Loads { loads: u32, loads_per_op: u32 },
    Coordinators { count: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AreaRequirement {
    pub area: String,
    pub positions: Vec<PositionSlot>,
    pub total_ops: u32,
    pub source: RequirementSource,
}

impl AreaRequirement {
    fn new(area: &str, positions: Vec<PositionSlot>, source: RequirementSource) -> Self {
        Self {
            area: area.to_string(),
            total_ops: positions.len() as u32,
            positions,
            source,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequirementSet {
    pub areas: Vec<AreaRequirement>,
}

impl RequirementSet {
    pub fn get(&self, area: &str) -> Option<&AreaRequirement> {
        self.areas.iter().find(|a| a.area == area)
    }

    pub fn contains(&self, area: &str) -> bool {
        self.get(area).is_some()
    }

    pub fn total_required(&self) -> u32 {
        self.areas.iter().map(|a| a.total_ops).sum()
    }

    pub fn area_names(&self) -> impl Iterator<Item = &str> {
        self.areas.iter().map(|a| a.area.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

fn slot(name: impl Into<String>, requirement: PositionRequirement) -> PositionSlot {
    PositionSlot { name: name.into(), requirement }
}

/// Derive the full requirement set for a plan. Pure.
pub fn derive_requirements(plan: &ProductionPlan, floor: &FloorConfig) -> RequirementSet {
    let mut areas = Vec::new();

    areas.extend(can_line(plan, floor));
    areas.extend(bot_line(plan, floor));
    areas.extend(single_line(plan, floor, CORONA_LINE, "Corona", "Corona Operator"));
    areas.extend(keg_line(plan, floor));
    areas.extend(single_line(plan, floor, PACKAGING, "Packaging", "Packaging Operator"));
    areas.extend(loading(floor, MAGOR1_LOADING, "Magor 1", plan.loading.magor1()));
    areas.extend(loading(floor, TENTS_LOADING, "Tents", plan.loading.tents()));
    areas.extend(loading(floor, KEG_LOADING, "Keg Loading", plan.loading.keg()));
    areas.extend(pilot(plan, floor));

    let set = RequirementSet { areas };
    log::debug!(
        "derived {} areas, {} operators required",
        set.areas.len(),
        set.total_required()
    );
    set
}

/// One slot per running line, then break-cover slots up to the crew size.
fn can_line(plan: &ProductionPlan, floor: &FloorConfig) -> Option<AreaRequirement> {
    let area = floor.area(CAN_LINE)?;
    let running = running_lines(plan, area, &CAN_LINES);
    if running.is_empty() {
        return None;
    }

    let mut positions: Vec<PositionSlot> = running
        .iter()
        .filter_map(|line| area.requirement(line).map(|req| slot(format!("{line} Operator"), req)))
        .collect();

    let active = running.len() as u32;
    let total_ops = match plan.can_line_ops {
        Some(ops) if ops > 0 => ops.min(CAN_LINE_MAX_OPS).max(active),
        _ => active.max(CAN_LINE_MIN_OPS),
    };

    // Cover slots always borrow the MAC1 requirement, whichever lines run.
    let cover = area
        .requirement(CAN_LINE_COVER_SOURCE)
        .or_else(|| area.primary_requirement());
    if let Some(cover) = cover {
        for i in (active + 1)..=total_ops {
            positions.push(slot(format!("Can Line Op {i}"), cover));
        }
    }

    Some(AreaRequirement::new(CAN_LINE, positions, RequirementSource::Lines { running }))
}

fn bot_line(plan: &ProductionPlan, floor: &FloorConfig) -> Option<AreaRequirement> {
    let area = floor.area(BOT_LINE)?;
    let running = running_lines(plan, area, &BOT_LINES);
    if running.is_empty() {
        return None;
    }
    let positions = running
        .iter()
        .filter_map(|line| area.requirement(line).map(|req| slot(format!("{line} Operator"), req)))
        .collect();
    Some(AreaRequirement::new(BOT_LINE, positions, RequirementSource::Lines { running }))
}

fn single_line(
    plan: &ProductionPlan,
    floor: &FloorConfig,
    area_name: &str,
    line: &str,
    position: &str,
) -> Option<AreaRequirement> {
    if !plan.lines.is_running(line) {
        return None;
    }
    let req = floor.area(area_name)?.primary_requirement()?;
    Some(AreaRequirement::new(
        area_name,
        vec![slot(position, req)],
        RequirementSource::Lines { running: vec![line.to_string()] },
    ))
}

/// Keg Line always runs with exactly two operators, regardless of load.
fn keg_line(plan: &ProductionPlan, floor: &FloorConfig) -> Option<AreaRequirement> {
    if !plan.lines.is_running("MAK1") {
        return None;
    }
    let area = floor.area(KEG_LINE)?;
    let positions = vec![
        slot(KEG_OUTSIDE, area.requirement(KEG_OUTSIDE)?),
        slot(KEG_INSIDE, area.requirement(KEG_INSIDE)?),
    ];
    Some(AreaRequirement::new(
        KEG_LINE,
        positions,
        RequirementSource::Lines { running: vec!["MAK1".to_string()] },
    ))
}

fn loading(
    floor: &FloorConfig,
    area_name: &str,
    prefix: &str,
    loads: u32,
) -> Option<AreaRequirement> {
    let area = floor.area(area_name)?;
    let loads_per_op = area.loads_per_op.filter(|d| *d > 0)?;
    let mut ops = ops_for_loads(loads, loads_per_op);
    if ops > MAX_LOADING_OPS {
        log::warn!("{area_name}: {loads} loads need {ops} operators, capped at {MAX_LOADING_OPS}");
        ops = MAX_LOADING_OPS;
    }
    if ops == 0 {
        return None;
    }
    let req = area.primary_requirement()?;
    let positions = (1..=ops).map(|i| slot(format!("{prefix} Op {i}"), req)).collect();
    Some(AreaRequirement::new(
        area_name,
        positions,
        RequirementSource::Loads { loads, loads_per_op },
    ))
}

fn pilot(plan: &ProductionPlan, floor: &FloorConfig) -> Option<AreaRequirement> {
    let count = plan.pilots();
    if count == 0 {
        return None;
    }
    let area = floor.area(PILOT);
    let positions = (1..=count)
        .map(|i| {
            let name = format!("Pilot {i}");
            let req = area
                .and_then(|a| a.requirement(&name))
                .unwrap_or(PositionRequirement::default_pilot());
            slot(name, req)
        })
        .collect();
    Some(AreaRequirement::new(
        PILOT,
        positions,
        RequirementSource::Coordinators { count },
    ))
}

fn running_lines(plan: &ProductionPlan, area: &WorkAreaConfig, lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| plan.lines.is_running(line) && area.requirement(line).is_some())
        .map(|line| line.to_string())
        .collect()
}

/// Operators needed to move `loads`, rounding up.
pub fn ops_for_loads(loads: u32, loads_per_op: u32) -> u32 {
    if loads_per_op == 0 {
        return 0;
    }
    loads.div_ceil(loads_per_op)
}
