//! roster-runner: headless skill assignment for one shift.
//!
//! Usage:
//!   roster-runner --roster agentes.csv --out cronograma_skills.csv
//!   roster-runner --roster agentes.csv --quotas cupos.json --exceptions excepciones.txt \
//!                 --seed 42 --report run.json

use anyhow::Result;
use cronocat_core::{
    config::{ExceptionList, QuotaTable},
    engine::{AssignmentEngine, AssignmentOutcome},
    error::RosterError,
    export,
    rng::SeededShuffle,
    roster,
    types::Skill,
};
use std::collections::BTreeMap;
use std::env;

#[derive(serde::Serialize)]
struct RunReport<'a> {
    run_id: uuid::Uuid,
    generated_at: chrono::DateTime<chrono::Utc>,
    seed: Option<u64>,
    roster_rows: usize,
    skipped_rows: usize,
    totals: BTreeMap<String, usize>,
    outcome: &'a AssignmentOutcome,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let roster_path = str_arg(&args, "--roster")
        .ok_or_else(|| anyhow::anyhow!("--roster <file.csv> is required"))?;
    let quotas_path = str_arg(&args, "--quotas");
    let exceptions_path = str_arg(&args, "--exceptions");
    let out_path = str_arg(&args, "--out").unwrap_or("cronograma_skills.csv");
    let report_path = str_arg(&args, "--report");
    let seed: Option<u64> = str_arg(&args, "--seed").and_then(|s| s.parse().ok());
    let use_default_exceptions = args.iter().any(|a| a == "--default-exceptions");

    println!("roster-runner");
    println!("  roster:     {roster_path}");
    println!("  quotas:     {}", quotas_path.unwrap_or("(center defaults)"));
    println!("  exceptions: {}", exceptions_path.unwrap_or("(none)"));
    println!("  seed:       {}", seed.map(|s| s.to_string()).unwrap_or_else(|| "random".into()));
    println!();

    let raw = std::fs::read_to_string(roster_path)
        .map_err(|e| anyhow::anyhow!("Cannot read {roster_path}: {e}"))?;
    let parsed = roster::parse_roster(&raw);
    if parsed.agents.is_empty() {
        return Err(anyhow::Error::from(RosterError::EmptyRoster)
            .context(format!("No valid rows in {roster_path}; check the column layout")));
    }

    let quotas = match quotas_path {
        Some(path) => QuotaTable::load(path)?,
        None => QuotaTable::default_center(),
    };

    let mut exceptions = match exceptions_path {
        Some(path) => ExceptionList::load(path)?,
        None => ExceptionList::new(),
    };
    if use_default_exceptions {
        for name in ExceptionList::with_defaults_from(&parsed.agents).names() {
            if let Err(e) = exceptions.insert(name.clone()) {
                log::warn!("Default exception '{name}' not added: {e}");
            }
        }
    }

    let tie_break = match seed {
        Some(s) => SeededShuffle::new(s),
        None => SeededShuffle::from_entropy(),
    };
    let mut engine = AssignmentEngine::new(tie_break);
    let outcome = engine.assign(&parsed.agents, quotas.as_slice(), exceptions.names());

    std::fs::write(out_path, export::skills_csv(&outcome.agents)?)
        .map_err(|e| anyhow::anyhow!("Cannot write {out_path}: {e}"))?;

    let totals: BTreeMap<String, usize> = outcome
        .skill_totals()
        .into_iter()
        .map(|(skill, n)| (skill.to_string(), n))
        .collect();

    if let Some(path) = report_path {
        let report = RunReport {
            run_id: uuid::Uuid::new_v4(),
            generated_at: chrono::Utc::now(),
            seed,
            roster_rows: parsed.agents.len(),
            skipped_rows: parsed.skipped_rows,
            totals: totals.clone(),
            outcome: &outcome,
        };
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .map_err(|e| anyhow::anyhow!("Cannot write {path}: {e}"))?;
    }

    print_summary(&outcome, &totals, parsed.skipped_rows, quotas.total(), out_path);
    Ok(())
}

fn print_summary(
    outcome: &AssignmentOutcome,
    totals: &BTreeMap<String, usize>,
    skipped_rows: usize,
    quota_total: i32,
    out_path: &str,
) {
    println!("=== RUN SUMMARY ===");
    println!("  agents:        {}", outcome.agents.len());
    println!("  skipped rows:  {skipped_rows}");
    println!("  quota seats:   {quota_total}");
    println!("  shortfalls:    {}", outcome.shortfalls.len());
    println!("  output:        {out_path}");

    println!();
    println!("=== HEADCOUNT BY SKILL ===");
    for skill in Skill::QUOTA_ORDER.iter().chain([Skill::Varios, Skill::Comercial].iter()) {
        let n = totals.get(skill.label()).copied().unwrap_or(0);
        println!("  {:<15} {n}", skill.label());
    }
    for (label, n) in totals {
        if Skill::parse(label).is_custom() {
            println!("  {label:<15} {n}  (pre-assigned, unrecognized)");
        }
    }

    if !outcome.logs.is_empty() {
        println!();
        println!("=== SHORTFALLS ===");
        for line in &outcome.logs {
            println!("  {line}");
        }
    }
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
