//! rota-runner: headless rota generation for the production floor.
//!
//! Usage:
//!   rota-runner --date 2026-03-02 --shift day
//!   rota-runner --date 2026-03-02 --shift night --db rota.db --commit
//!   rota-runner --date 2026-03-02 --plan plan.json --availability avail.json --json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rota_core::{
    staff::load_roster, AvailabilitySnapshot, FloorConfig, PlanBook, ProductionPlan,
    RotaPreview, RotaService, RotaStore, ShiftType, StaffMember,
};
use std::{collections::BTreeMap, env};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let date_arg = arg_value(&args, "--date").context("--date YYYY-MM-DD is required")?;
    let date = NaiveDate::parse_from_str(date_arg, "%Y-%m-%d")
        .with_context(|| format!("--date '{date_arg}' is not YYYY-MM-DD"))?;
    let shift_arg = arg_value(&args, "--shift").unwrap_or("day");
    let shift = ShiftType::parse(shift_arg)
        .with_context(|| format!("--shift '{shift_arg}' must be day or night"))?;
    let availability_path = arg_value(&args, "--availability")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{data_dir}/sample/availability.json"));
    let plan_path = arg_value(&args, "--plan")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{data_dir}/sample/plan.json"));
    let commit = args.iter().any(|a| a == "--commit");
    let json_out = args.iter().any(|a| a == "--json");

    if !json_out {
        println!("Shift rota runner");
        println!("  date:          {date}");
        println!("  shift:         {shift}");
        println!("  db:            {db}");
        println!("  data_dir:      {data_dir}");
        println!("  availability:  {availability_path}");
        println!("  plan:          {plan_path}");
        println!();
    }

    let floor = FloorConfig::load(data_dir)?;
    let roster = load_roster(data_dir)?;

    let availability_json = std::fs::read_to_string(&availability_path)
        .with_context(|| format!("Cannot read {availability_path}"))?;
    let availability = AvailabilitySnapshot::from_json(&availability_json)?;

    if !json_out {
        print_availability(&roster, &availability, date);
    }

    let mut plans = PlanBook::new();
    match std::fs::read_to_string(&plan_path) {
        Ok(content) => {
            let plan = ProductionPlan::from_json(&content)
                .with_context(|| format!("Invalid plan {plan_path}"))?;
            plans.set_plan(date, shift, plan);
        }
        Err(e) => log::warn!("No plan at {plan_path} ({e}); using the default plan"),
    }

    let store = RotaStore::open(db)?;
    store.migrate()?;
    let service = RotaService::new(store, floor);

    let preview = service.preview(date, shift, &roster, &availability, &plans)?;

    if json_out {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print_preview(&preview);
    }

    if commit {
        let rota = service.commit_preview(&preview)?;
        if !json_out {
            println!();
            println!("Committed rota {} at {}", rota.rota_id, rota.created_at.to_rfc3339());
        }
    }

    Ok(())
}

fn print_availability(
    roster:       &[StaffMember],
    availability: &AvailabilitySnapshot,
    date:         NaiveDate,
) {
    let mut counts: BTreeMap<&str, (&str, usize)> = BTreeMap::new();
    for s in roster {
        let status = availability.status(s.id, date);
        counts.entry(status.code()).or_insert((status.label(), 0)).1 += 1;
    }
    println!("=== AVAILABILITY {date} ===");
    for (code, (label, n)) in &counts {
        println!("  {code}  {label:<14} {n}");
    }
    println!();
}

fn print_preview(preview: &RotaPreview) {
    println!("=== ROTA {} ({}) ===", preview.date, preview.shift);
    for area in &preview.assignments.areas {
        println!("  {}", area.area);
        for slot in &area.slots {
            match &slot.staff {
                Some(s) => {
                    let kind = if s.is_agency { "agency" } else { "FTE" };
                    println!("    {:<20} {} [{}, {kind}]", slot.position, s.name, s.skap_label());
                }
                None => println!("    {:<20} -- unfilled --", slot.position),
            }
        }
    }

    let t = &preview.totals;
    println!();
    println!("=== SUMMARY ===");
    println!("  required:   {}", t.total_required);
    println!("  assigned:   {}", t.total_assigned);
    println!("  FTE:        {}", t.permanent_assigned);
    println!("  agency:     {}", t.agency_assigned);
    println!("  unassigned: {}", preview.unassigned_staff.len());

    if !preview.warnings.is_empty() {
        println!();
        println!("=== WARNINGS ===");
        for w in &preview.warnings {
            println!("  [{}] {w}", w.kind());
        }
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
