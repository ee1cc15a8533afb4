//! Availability snapshot: who is rostered on which shift on which day.
//!
//! Only `D` and `N` make someone available. Every other code, and a missing
//! record, keeps the person out of the pool entirely.

use crate::{
    error::{RotaError, RotaResult},
    staff::StaffMember,
    types::{ShiftType, StaffId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusCode {
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "N")]
    Night,
    #[serde(rename = "O")]
    Off,
    #[serde(rename = "A")]
    AnnualLeave,
    #[serde(rename = "S")]
    Sick,
    #[serde(rename = "T")]
    Toil,
}

impl StatusCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Day         => "D",
            Self::Night       => "N",
            Self::Off         => "O",
            Self::AnnualLeave => "A",
            Self::Sick        => "S",
            Self::Toil        => "T",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Day         => "Day Shift",
            Self::Night       => "Night Shift",
            Self::Off         => "Off",
            Self::AnnualLeave => "Annual Leave",
            Self::Sick        => "Sick",
            Self::Toil        => "TOIL",
        }
    }

    pub fn is_available(&self) -> bool {
        self.shift().is_some()
    }

    /// The shift this code makes someone available for, if any.
    pub fn shift(&self) -> Option<ShiftType> {
        match self {
            Self::Day   => Some(ShiftType::Day),
            Self::Night => Some(ShiftType::Night),
            _ => None,
        }
    }

    pub fn parse(code: &str) -> RotaResult<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "D" => Ok(Self::Day),
            "N" => Ok(Self::Night),
            "O" => Ok(Self::Off),
            "A" => Ok(Self::AnnualLeave),
            "S" => Ok(Self::Sick),
            "T" => Ok(Self::Toil),
            _ => Err(RotaError::UnknownStatusCode { code: code.to_string() }),
        }
    }
}

/// Point-in-time copy of the availability records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    records: HashMap<(NaiveDate, StaffId), StatusCode>,
}

impl AvailabilitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, date: NaiveDate, staff_id: StaffId, status: StatusCode) {
        self.records.insert((date, staff_id), status);
    }

    /// Status for a staff member on a date. Missing records read as `Off`.
    pub fn status(&self, staff_id: StaffId, date: NaiveDate) -> StatusCode {
        self.records
            .get(&(date, staff_id))
            .copied()
            .unwrap_or(StatusCode::Off)
    }

    pub fn is_available(&self, staff_id: StaffId, date: NaiveDate, shift: ShiftType) -> bool {
        self.status(staff_id, date).shift() == Some(shift)
    }

    /// Filter the roster to people available for `shift` on `date`,
    /// keeping roster order.
    pub fn available_staff<'a>(
        &self,
        roster: &'a [StaffMember],
        date: NaiveDate,
        shift: ShiftType,
    ) -> Vec<&'a StaffMember> {
        roster
            .iter()
            .filter(|s| self.is_available(s.id, date, shift))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse the on-disk form: `{"YYYY-MM-DD": {"<staffId>": "D", ...}, ...}`.
    pub fn from_json(json: &str) -> RotaResult<Self> {
        let raw: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(json)?;
        let mut snapshot = Self::new();
        for (date_str, by_staff) in raw {
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                RotaError::Other(anyhow::anyhow!("availability date '{date_str}': {e}"))
            })?;
            for (staff_id, code) in by_staff {
                let id: StaffId = staff_id.trim().parse().map_err(|_| {
                    RotaError::Other(anyhow::anyhow!(
                        "availability for {date}: '{staff_id}' is not a staff id"
                    ))
                })?;
                snapshot.set(date, id, StatusCode::parse(&code)?);
            }
        }
        Ok(snapshot)
    }
}
