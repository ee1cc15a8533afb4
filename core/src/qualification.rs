//! Qualification evaluator.
//!
//! One predicate, used unchanged by every assignment phase.

use crate::{
    config::{PositionRequirement, KEG_LINE, KEG_OUTSIDE},
    staff::StaffMember,
};

/// Is `staff` eligible for `position` in `area`?
///
/// All of the following must hold:
///   - skill tier at or above the position minimum
///   - keg training, when the position asks for it
///   - agency staff: `area` is on their allow-list
///   - outside-only staff: the slot is Keg Line / Outside
pub fn is_qualified(
    staff: &StaffMember,
    req: &PositionRequirement,
    area: &str,
    position: &str,
) -> bool {
    if staff.skap_level < req.min_skap_level {
        return false;
    }
    if req.keg_trained_required && !staff.keg_trained {
        return false;
    }
    if staff.is_agency && !staff.may_work_in(area) {
        return false;
    }
    if staff.keg_line_outside_only && !(area == KEG_LINE && position == KEG_OUTSIDE) {
        return false;
    }
    true
}
