//! Assignment engine integration tests.
//!
//! Covers the three phases (Pilot, Can Line, everything else), the monthly
//! rotation rule, warnings, totals and the unassigned list.

use chrono::NaiveDate;
use rota_core::{
    availability::StatusCode,
    config::{KEG_INSIDE, KEG_LINE, KEG_OUTSIDE},
    generate_rota, AssignmentHistory, AvailabilitySnapshot, FloorConfig, ProductionPlan,
    RotaPreview, RotaWarning, ShiftType, StaffMember,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Everyone in `roster` rostered on `shift` for the test date.
fn all_on(roster: &[StaffMember], shift: ShiftType) -> AvailabilitySnapshot {
    let code = match shift {
        ShiftType::Day => StatusCode::Day,
        ShiftType::Night => StatusCode::Night,
    };
    let mut snapshot = AvailabilitySnapshot::new();
    for s in roster {
        snapshot.set(date(), s.id, code);
    }
    snapshot
}

fn plan(lines: &[&str], pilots: u8) -> ProductionPlan {
    let mut plan = ProductionPlan { pilot_count: pilots, ..ProductionPlan::default() };
    for line in lines {
        assert!(plan.lines.set(line, true));
    }
    plan
}

fn run(roster: &[StaffMember], plan: &ProductionPlan, history: &AssignmentHistory) -> RotaPreview {
    generate_rota(
        date(),
        ShiftType::Day,
        roster,
        &all_on(roster, ShiftType::Day),
        plan,
        history,
        &FloorConfig::default_floor(),
    )
}

fn name_at<'a>(preview: &'a RotaPreview, area: &str, position: &str) -> Option<&'a str> {
    preview
        .assignments
        .staff_at(area, position)
        .unwrap_or_else(|| panic!("no slot {area}/{position}"))
        .map(|s| s.name.as_str())
}

fn count_kind(preview: &RotaPreview, kind: &str) -> usize {
    preview.warnings.iter().filter(|w| w.kind() == kind).count()
}

/// Invariants that hold for every preview.
fn assert_well_formed(preview: &RotaPreview, roster: &[StaffMember]) {
    let mut seen = std::collections::HashSet::new();
    for (area, position, staff) in preview.assignments.filled_slots() {
        assert!(seen.insert(staff.id), "{} assigned twice", staff.name);
        if staff.is_agency {
            assert!(staff.may_work_in(area), "{} outside allow-list in {area}", staff.name);
        }
        if staff.keg_line_outside_only {
            assert_eq!((area, position), (KEG_LINE, KEG_OUTSIDE));
        }
    }
    for req in &preview.requirements.areas {
        let slots = &preview.assignments.area(&req.area).unwrap().slots;
        assert_eq!(slots.len(), req.positions.len(), "{} slot count", req.area);
    }
    let t = &preview.totals;
    assert_eq!(t.total_assigned as usize, seen.len());
    assert_eq!(t.permanent_assigned + t.agency_assigned, t.total_assigned);
    assert_eq!(
        t.total_assigned as usize + preview.assignments.unfilled_count(),
        t.total_required as usize
    );
    assert_eq!(
        preview.unassigned_staff.len() + seen.len(),
        roster.len(),
        "every available person is either placed or listed as unassigned"
    );
}

// ── Phase 1: Pilot ────────────────────────────────────────────────

#[test]
fn pilots_are_highest_tier_permanent_staff() {
    let roster = vec![
        StaffMember::permanent(1, "Four", 4),
        StaffMember::permanent(2, "Six", 6),
        StaffMember::agency(100, "Agency Six", 6, &["Pilot"]),
        StaffMember::permanent(3, "Five", 5),
        StaffMember::permanent(4, "Three", 3),
    ];
    let preview = run(&roster, &plan(&[], 2), &AssignmentHistory::new());

    assert_eq!(name_at(&preview, "Pilot", "Pilot 1"), Some("Six"));
    assert_eq!(name_at(&preview, "Pilot", "Pilot 2"), Some("Five"));
    assert!(preview.warnings.is_empty());
    assert_well_formed(&preview, &roster);
}

#[test]
fn pilot_rotation_prefers_someone_who_has_not_piloted() {
    let roster = vec![
        StaffMember::permanent(1, "Six", 6),
        StaffMember::permanent(2, "Five", 5),
        StaffMember::permanent(3, "Four", 4),
    ];
    let mut history = AssignmentHistory::new();
    history.record_assignment(1, "Pilot", date());

    let preview = run(&roster, &plan(&[], 2), &history);
    assert_eq!(name_at(&preview, "Pilot", "Pilot 1"), Some("Five"));
    assert_eq!(name_at(&preview, "Pilot", "Pilot 2"), Some("Four"));
    assert!(preview.warnings.is_empty(), "no override needed: {:?}", preview.warnings);
}

#[test]
fn rotation_override_only_when_nobody_else_qualifies() {
    let roster = vec![
        StaffMember::permanent(1, "Only Pilot", 5),
        StaffMember::permanent(2, "Too Junior", 3),
    ];
    let mut history = AssignmentHistory::new();
    history.record_assignment(1, "Pilot", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

    let preview = run(&roster, &plan(&[], 1), &history);
    assert_eq!(name_at(&preview, "Pilot", "Pilot 1"), Some("Only Pilot"));
    assert_eq!(
        preview.warnings,
        vec![RotaWarning::RotationOverride {
            staff_name: "Only Pilot".into(),
            area: "Pilot".into(),
        }]
    );
}

#[test]
fn last_months_history_does_not_count() {
    let roster = vec![StaffMember::permanent(1, "Pilot", 5)];
    let mut history = AssignmentHistory::new();
    history.record_assignment(1, "Pilot", NaiveDate::from_ymd_opt(2026, 2, 27).unwrap());

    let preview = run(&roster, &plan(&[], 1), &history);
    assert!(preview.warnings.is_empty());
}

#[test]
fn pilot_slots_unfilled_without_senior_staff() {
    let roster = vec![StaffMember::permanent(1, "Junior", 3)];
    let preview = run(&roster, &plan(&[], 2), &AssignmentHistory::new());

    assert_eq!(name_at(&preview, "Pilot", "Pilot 1"), None);
    assert_eq!(count_kind(&preview, "unfilled-position"), 2);
    assert_eq!(preview.unassigned_staff.len(), 1);
    assert_well_formed(&preview, &roster);
}

// ── Phase 2: Can Line ─────────────────────────────────────────────

#[test]
fn single_can_line_fully_staffed_from_ten_permanent() {
    let roster: Vec<_> = (1..=10)
        .map(|i| StaffMember::permanent(i, &format!("Op {i}"), (i % 3 + 1) as u8))
        .collect();
    let mut p = plan(&["MAC1"], 0);
    p.can_line_ops = Some(4);
    let preview = run(&roster, &p, &AssignmentHistory::new());

    let can = preview.assignments.area("Can Line").unwrap();
    assert_eq!(can.slots.len(), 4);
    assert_eq!(can.filled().count(), 4);
    assert!(can.filled().filter(|s| s.is_permanent()).count() >= 1);
    assert_eq!(preview.totals.total_required, 4);
    assert_eq!(preview.totals.total_assigned, 4);
    assert!(preview.warnings.is_empty());
    assert_well_formed(&preview, &roster);
}

#[test]
fn agency_fills_can_line_once_permanent_floor_is_met() {
    let roster = vec![
        StaffMember::agency(100, "Agency A", 3, &["Can Line"]),
        StaffMember::permanent(1, "Perm", 2),
        StaffMember::agency(101, "Agency B", 2, &["Can Line"]),
        StaffMember::agency(102, "Agency C", 2, &["Can Line"]),
        StaffMember::permanent(2, "Spare Perm", 1),
    ];
    let preview = run(&roster, &plan(&["MAC1", "MAC2", "MAB3"], 0), &AssignmentHistory::new());

    assert_eq!(name_at(&preview, "Can Line", "MAC1 Operator"), Some("Perm"));
    assert_eq!(name_at(&preview, "Can Line", "MAC2 Operator"), Some("Agency A"));
    assert_eq!(name_at(&preview, "Can Line", "MAB3 Operator"), Some("Agency B"));
    assert_eq!(name_at(&preview, "Can Line", "Can Line Op 4"), Some("Agency C"));
    assert_eq!(preview.totals.permanent_assigned, 1);
    assert_eq!(preview.totals.agency_assigned, 3);
    assert_eq!(preview.unassigned_staff.len(), 1);
    assert_eq!(preview.unassigned_staff[0].name, "Spare Perm");
    assert_well_formed(&preview, &roster);
}

#[test]
fn can_line_falls_back_to_permanent_when_agency_runs_out() {
    let roster = vec![
        StaffMember::permanent(1, "First", 3),
        StaffMember::permanent(2, "Second", 2),
    ];
    let preview = run(&roster, &plan(&["MAC1", "MAC2"], 0), &AssignmentHistory::new());

    assert_eq!(name_at(&preview, "Can Line", "MAC1 Operator"), Some("First"));
    assert_eq!(name_at(&preview, "Can Line", "MAC2 Operator"), Some("Second"));
    assert_eq!(name_at(&preview, "Can Line", "Can Line Op 3"), None);
    assert!(preview.warnings.contains(&RotaWarning::UnfilledPosition {
        position: "Can Line Op 3".into(),
        area: "Can Line".into(),
    }));
    assert_eq!(count_kind(&preview, "unfilled-position"), 2);
    assert_eq!(preview.totals.permanent_assigned, 2);
    assert_well_formed(&preview, &roster);
}

#[test]
fn agency_only_can_line_reports_fte_minimum_unmet() {
    let roster = vec![
        StaffMember::agency(100, "Agency A", 3, &["Can Line"]),
        StaffMember::agency(101, "Agency B", 3, &["Can Line"]),
    ];
    let preview = run(&roster, &plan(&["MAC1"], 0), &AssignmentHistory::new());

    assert_eq!(preview.assignments.area("Can Line").unwrap().filled().count(), 0);
    assert_eq!(count_kind(&preview, "fte-minimum-unmet"), 4);
    assert_eq!(
        preview.warnings[0],
        RotaWarning::FteMinimumUnmet { position: "MAC1 Operator".into(), area: "Can Line".into() }
    );
    assert_eq!(preview.totals.agency_assigned, 0);
    assert_well_formed(&preview, &roster);
}

#[test]
fn can_line_rotation_applies_to_permanent_anchor() {
    let roster = vec![
        StaffMember::permanent(1, "Worked Can", 3),
        StaffMember::permanent(2, "Fresh", 2),
    ];
    let mut history = AssignmentHistory::new();
    history.record_assignment(1, "Can Line", date());

    let preview = run(&roster, &plan(&["MAC1"], 0), &history);
    assert_eq!(name_at(&preview, "Can Line", "MAC1 Operator"), Some("Fresh"));
    // Nobody else left for the first cover slot.
    assert_eq!(name_at(&preview, "Can Line", "Can Line Op 2"), Some("Worked Can"));
    assert_eq!(count_kind(&preview, "rotation-override"), 1);
    assert_eq!(count_kind(&preview, "unfilled-position"), 2);
}

#[test]
fn pilot_phase_runs_before_can_line() {
    let roster = vec![
        StaffMember::permanent(1, "Senior", 6),
        StaffMember::permanent(2, "Junior", 1),
    ];
    let mut p = plan(&["MAC1"], 1);
    p.can_line_ops = Some(1);
    let preview = run(&roster, &p, &AssignmentHistory::new());

    assert_eq!(name_at(&preview, "Pilot", "Pilot 1"), Some("Senior"));
    assert_eq!(name_at(&preview, "Can Line", "MAC1 Operator"), Some("Junior"));
    assert_eq!(preview.requirements.area_names().next(), Some("Can Line"));
}

// ── Phase 3: remaining areas ──────────────────────────────────────

#[test]
fn permanent_preferred_over_more_skilled_agency() {
    let roster = vec![
        StaffMember::agency(100, "Agency", 6, &["Bot Line"]),
        StaffMember::permanent(1, "Perm", 2),
    ];
    let preview = run(&roster, &plan(&["MAB1"], 0), &AssignmentHistory::new());
    assert_eq!(name_at(&preview, "Bot Line", "MAB1 Operator"), Some("Perm"));
    assert_eq!(preview.unassigned_staff[0].name, "Agency");
}

#[test]
fn equal_tiers_keep_roster_order() {
    let roster = vec![
        StaffMember::permanent(9, "Listed First", 3),
        StaffMember::permanent(4, "Listed Second", 3),
    ];
    let preview = run(&roster, &plan(&["MAB1"], 0), &AssignmentHistory::new());
    assert_eq!(name_at(&preview, "Bot Line", "MAB1 Operator"), Some("Listed First"));
}

#[test]
fn fresh_candidate_beats_higher_tier_who_worked_the_area() {
    let roster = vec![
        StaffMember::permanent(1, "Experienced", 3),
        StaffMember::permanent(2, "Fresh", 2),
    ];
    let mut history = AssignmentHistory::new();
    history.record_assignment(1, "Bot Line", NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());

    let preview = run(&roster, &plan(&["MAB1"], 0), &history);
    assert_eq!(name_at(&preview, "Bot Line", "MAB1 Operator"), Some("Fresh"));
    assert!(preview.warnings.is_empty());
}

#[test]
fn remaining_area_reuses_only_qualified_candidate_with_override() {
    let roster = vec![
        StaffMember::permanent(1, "Veteran", 3),
        StaffMember::permanent(2, "Too Junior", 1),
        StaffMember::agency(100, "Tents Agency", 4, &["Tents Loading"]),
    ];
    let mut history = AssignmentHistory::new();
    history.record_assignment(1, "Bot Line", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

    let preview = run(&roster, &plan(&["MAB1"], 0), &history);
    assert_eq!(name_at(&preview, "Bot Line", "MAB1 Operator"), Some("Veteran"));
    assert_eq!(
        preview.warnings,
        vec![RotaWarning::RotationOverride {
            staff_name: "Veteran".into(),
            area: "Bot Line".into(),
        }]
    );
    assert_eq!(preview.unassigned_staff.len(), 2);
    assert_well_formed(&preview, &roster);
}

#[test]
fn keg_inside_unfilled_without_keg_training() {
    let roster = vec![
        StaffMember::permanent(1, "A", 3),
        StaffMember::permanent(2, "B", 3),
        StaffMember::permanent(3, "C", 3),
    ];
    let preview = run(&roster, &plan(&["MAK1"], 0), &AssignmentHistory::new());

    assert_eq!(name_at(&preview, KEG_LINE, KEG_OUTSIDE), Some("A"));
    assert_eq!(name_at(&preview, KEG_LINE, KEG_INSIDE), None);
    assert_eq!(
        preview.warnings,
        vec![RotaWarning::UnfilledPosition {
            position: KEG_INSIDE.into(),
            area: KEG_LINE.into(),
        }]
    );
    assert_well_formed(&preview, &roster);
}

#[test]
fn outside_only_worker_takes_keg_outside_first() {
    let roster = vec![
        StaffMember::permanent(1, "Senior Keg", 6).with_keg_training(),
        StaffMember::permanent(2, "Junior Keg", 3).with_keg_training(),
        StaffMember::agency(105, "Kenode", 1, &[KEG_LINE, "Tents Loading"]).outside_only(),
    ];
    let preview = run(&roster, &plan(&["MAK1"], 0), &AssignmentHistory::new());

    assert_eq!(name_at(&preview, KEG_LINE, KEG_OUTSIDE), Some("Kenode"));
    assert_eq!(name_at(&preview, KEG_LINE, KEG_INSIDE), Some("Senior Keg"));
    assert_well_formed(&preview, &roster);
}

#[test]
fn agency_never_leaves_allow_list_even_when_short() {
    let roster = vec![
        StaffMember::permanent(1, "Perm", 2),
        StaffMember::agency(100, "Tents Only", 5, &["Tents Loading"]),
        StaffMember::agency(101, "Also Tents", 5, &["Tents Loading"]),
    ];
    let mut p = plan(&["MAB1", "MAB2"], 0);
    p.loading.tents_loads = 10;
    let preview = run(&roster, &p, &AssignmentHistory::new());

    assert_eq!(name_at(&preview, "Bot Line", "MAB1 Operator"), Some("Perm"));
    assert_eq!(name_at(&preview, "Bot Line", "MAB2 Operator"), None);
    assert_eq!(name_at(&preview, "Tents Loading", "Tents Op 1"), Some("Tents Only"));
    assert_eq!(preview.unassigned_staff[0].name, "Also Tents");
    assert_well_formed(&preview, &roster);
}

// ── Availability and totals ───────────────────────────────────────

#[test]
fn only_staff_rostered_on_this_shift_are_used() {
    let roster = vec![
        StaffMember::permanent(1, "On Nights", 5),
        StaffMember::permanent(2, "On Leave", 5),
        StaffMember::permanent(3, "No Record", 5),
        StaffMember::permanent(4, "On Days", 4),
    ];
    let mut availability = AvailabilitySnapshot::new();
    availability.set(date(), 1, StatusCode::Night);
    availability.set(date(), 2, StatusCode::AnnualLeave);
    availability.set(date(), 4, StatusCode::Day);

    let preview = generate_rota(
        date(),
        ShiftType::Day,
        &roster,
        &availability,
        &plan(&[], 2),
        &AssignmentHistory::new(),
        &FloorConfig::default_floor(),
    );
    assert_eq!(name_at(&preview, "Pilot", "Pilot 1"), Some("On Days"));
    assert_eq!(name_at(&preview, "Pilot", "Pilot 2"), None);
    assert!(preview.unassigned_staff.is_empty());

    let night = generate_rota(
        date(),
        ShiftType::Night,
        &roster,
        &availability,
        &plan(&[], 1),
        &AssignmentHistory::new(),
        &FloorConfig::default_floor(),
    );
    assert_eq!(name_at(&night, "Pilot", "Pilot 1"), Some("On Nights"));
}

#[test]
fn empty_plan_assigns_nobody() {
    let roster = vec![StaffMember::permanent(1, "Idle", 4)];
    let preview = run(&roster, &plan(&[], 0), &AssignmentHistory::new());

    assert!(preview.assignments.areas.is_empty());
    assert!(preview.warnings.is_empty());
    assert_eq!(preview.totals.total_required, 0);
    assert_eq!(preview.unassigned_staff.len(), 1);
}

#[test]
fn full_floor_totals_add_up() {
    let mut roster: Vec<_> = (1..=20)
        .map(|i| {
            let s = StaffMember::permanent(i, &format!("Perm {i}"), (i % 7) as u8);
            if i % 4 == 0 { s.with_keg_training() } else { s }
        })
        .collect();
    roster.push(StaffMember::agency(100, "Can Agency", 2, &["Can Line"]));
    roster.push(StaffMember::agency(101, "Loader", 1, &["Tents Loading", "Magor 1 Loading"]));

    let mut p = plan(&["MAC1", "MAC2", "MAB1", "MAB2", "Corona", "MAK1", "Packaging"], 2);
    p.loading.magor1_loads = 16;
    p.loading.tents_loads = 10;
    p.loading.keg_loads = 6;
    let preview = run(&roster, &p, &AssignmentHistory::new());

    assert_eq!(preview.totals.total_required, 4 + 2 + 1 + 2 + 1 + 2 + 1 + 1 + 2);
    assert_well_formed(&preview, &roster);
}
