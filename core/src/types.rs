//! Shared primitive types used across the entire engine.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable roster identifier for a staff member.
pub type StaffId = u32;

/// Calendar bucket used by the rotation rule, e.g. `"2026-03"`.
/// Day and Night shifts of the same month share a key.
pub type MonthKey = String;

/// The two shifts a rota can be built for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftType {
    Day,
    Night,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day   => "Day",
            Self::Night => "Night",
        }
    }

    /// Parse the stored/CLI form. Accepts any casing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "d"   => Some(Self::Day),
            "night" | "n" => Some(Self::Night),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Month key for fairness tracking.
pub fn month_key(date: NaiveDate) -> MonthKey {
    format!("{:04}-{:02}", date.year(), date.month())
}
