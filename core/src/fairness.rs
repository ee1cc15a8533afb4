//! Fairness tracker: which areas each person has worked this month.
//!
//! RULE: the engine only ever reads this ledger. Entries are appended by
//! the commit path and never removed or deduplicated; working the same area
//! on two shifts leaves two entries.

use crate::types::{month_key, MonthKey, StaffId};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentHistory {
    buckets: BTreeMap<(StaffId, MonthKey), Vec<String>>,
}

impl AssignmentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `area` appears in the staff member's bucket for `date`'s month.
    pub fn was_assigned_this_month(&self, staff_id: StaffId, area: &str, date: NaiveDate) -> bool {
        self.areas_in_month(staff_id, &month_key(date))
            .iter()
            .any(|a| a == area)
    }

    pub fn record_assignment(&mut self, staff_id: StaffId, area: &str, date: NaiveDate) {
        self.append(staff_id, month_key(date), area.to_string());
    }

    /// Append a raw ledger entry. Used when rebuilding from storage.
    pub fn append(&mut self, staff_id: StaffId, month: MonthKey, area: String) {
        self.buckets.entry((staff_id, month)).or_default().push(area);
    }

    /// Areas worked in `month`, in the order they were recorded.
    pub fn areas_in_month(&self, staff_id: StaffId, month: &str) -> &[String] {
        self.buckets
            .get(&(staff_id, month.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of ledger entries.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
