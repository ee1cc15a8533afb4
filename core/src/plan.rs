//! Production plans: which lines run and how many loads go out per shift.

use crate::types::ShiftType;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PILOT_COUNT: u8 = 2;
pub const MAX_PILOT_COUNT: u8 = 4;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineFlags {
    #[serde(rename = "MAC1", default)]
    pub mac1: bool,
    #[serde(rename = "MAC2", default)]
    pub mac2: bool,
    #[serde(rename = "MAB3", default)]
    pub mab3: bool,
    #[serde(rename = "MAB1", default)]
    pub mab1: bool,
    #[serde(rename = "MAB2", default)]
    pub mab2: bool,
    #[serde(rename = "Corona", default)]
    pub corona: bool,
    #[serde(rename = "MAK1", default)]
    pub mak1: bool,
    #[serde(rename = "Packaging", default)]
    pub packaging: bool,
}

impl LineFlags {
    /// Flag for a line by its plant name. Unknown names are not running.
    pub fn is_running(&self, line: &str) -> bool {
        match line {
            "MAC1"      => self.mac1,
            "MAC2"      => self.mac2,
            "MAB3"      => self.mab3,
            "MAB1"      => self.mab1,
            "MAB2"      => self.mab2,
            "Corona"    => self.corona,
            "MAK1"      => self.mak1,
            "Packaging" => self.packaging,
            _ => false,
        }
    }

    /// Set a line flag by name. Returns false for an unknown line.
    pub fn set(&mut self, line: &str, running: bool) -> bool {
        let flag = match line {
            "MAC1"      => &mut self.mac1,
            "MAC2"      => &mut self.mac2,
            "MAB3"      => &mut self.mab3,
            "MAB1"      => &mut self.mab1,
            "MAB2"      => &mut self.mab2,
            "Corona"    => &mut self.corona,
            "MAK1"      => &mut self.mak1,
            "Packaging" => &mut self.packaging,
            _ => return false,
        };
        *flag = running;
        true
    }
}

/// Raw load counts as supplied. Negative values are tolerated here and
/// clamped to zero by the accessors; `null` reads as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingCounts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub magor1_loads: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tents_loads: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keg_loads: i64,
}

impl LoadingCounts {
    pub fn magor1(&self) -> u32 {
        clamp_loads(self.magor1_loads)
    }

    pub fn tents(&self) -> u32 {
        clamp_loads(self.tents_loads)
    }

    pub fn keg(&self) -> u32 {
        clamp_loads(self.keg_loads)
    }
}

fn clamp_loads(raw: i64) -> u32 {
    raw.clamp(0, u32::MAX as i64) as u32
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lines: LineFlags,
    /// Explicit Can Line crew size. `None` (or zero) means "derive it".
    /// Capped at `CAN_LINE_MAX_OPS` when requirements are derived.
    #[serde(default)]
    pub can_line_ops: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub loading: LoadingCounts,
    #[serde(default = "default_pilot_count", deserialize_with = "null_as_default_pilots")]
    pub pilot_count: u8,
}

fn default_pilot_count() -> u8 {
    DEFAULT_PILOT_COUNT
}

/// An explicit `null` reads as the field default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_pilots<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(Option::<u8>::deserialize(deserializer)?.unwrap_or(DEFAULT_PILOT_COUNT))
}

impl Default for ProductionPlan {
    fn default() -> Self {
        Self {
            lines: LineFlags::default(),
            can_line_ops: None,
            loading: LoadingCounts::default(),
            pilot_count: DEFAULT_PILOT_COUNT,
        }
    }
}

impl ProductionPlan {
    /// Coordinator count, capped at the plant maximum.
    pub fn pilots(&self) -> u32 {
        self.pilot_count.min(MAX_PILOT_COUNT) as u32
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Plans keyed by (date, shift). Absent keys read as the default plan.
#[derive(Debug, Clone, Default)]
pub struct PlanBook {
    plans: BTreeMap<(NaiveDate, ShiftType), ProductionPlan>,
}

impl PlanBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan_for(&self, date: NaiveDate, shift: ShiftType) -> ProductionPlan {
        self.plans.get(&(date, shift)).cloned().unwrap_or_default()
    }

    pub fn set_plan(&mut self, date: NaiveDate, shift: ShiftType, plan: ProductionPlan) {
        self.plans.insert((date, shift), plan);
    }

    pub fn has_plan(&self, date: NaiveDate, shift: ShiftType) -> bool {
        self.plans.contains_key(&(date, shift))
    }

    /// Overwrite the night plan for `date` with a copy of its day plan.
    pub fn copy_day_to_night(&mut self, date: NaiveDate) {
        let day = self.plan_for(date, ShiftType::Day);
        self.plans.insert((date, ShiftType::Night), day);
    }
}
