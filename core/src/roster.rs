//! Roster parsing: raw comma-separated text into agent records.
//!
//! The input dialect is loose: no quoting, no escaping. A comma inside a
//! field shifts every later column. Rows with fewer than
//! `MIN_COLUMNS` columns are dropped and counted, never reported as errors.
//!
//! Column layout (0-indexed):
//!   0       name
//!   1       schedule time ("Horario")
//!   2       real time ("Franja CAT"), wins over 1 when non-empty
//!   3       presta flag (qualifies when it contains 'x')
//!   4       variable category
//!   5       tutor flag (same rule as presta)
//!   6..=8   skill worked in each of the last three weeks, oldest first
//!   9       pre-assigned skill for the target week
//!   10..=16 load counters: disca, presta, tutor, meds, auth, cobranzas, varios
//!   17..N-2 per-day absence markers
//!   N-1     total absences

use crate::{
    engine::AssignmentReason,
    types::{CounterKind, EffectiveTime, Skill, TimeSlot},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MIN_COLUMNS: usize = 15;

/// First column holding a per-day absence marker.
pub const FIRST_DAY_COLUMN: usize = 17;

/// Assumed working days when the roster carries no per-day columns.
pub const DEFAULT_WORK_DAYS: i32 = 5;

/// At this many absences a short week (<= 3 days) counts as fully absent.
pub const SHORT_WEEK_ABSENCES: i32 = 3;

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[:.]?(\d{2})?").expect("time pattern is valid"));

/// Map a raw time string onto a bucket.
///
/// Takes the first `H[:.]MM` group (minutes optional). Hour 9 splits on
/// minutes 15..=45; hours 10, 14 and 15 map whole. Anything else comes back
/// as zero-padded `HH:MM`, or as the lower-cased input when no digits exist.
pub fn normalize_time(raw: &str) -> EffectiveTime {
    let clean = raw.trim().to_lowercase();
    if clean.is_empty() {
        return EffectiveTime::Freeform(clean);
    }

    let Some(caps) = TIME_PATTERN.captures(&clean) else {
        return EffectiveTime::Freeform(clean);
    };

    let hour: u32 = caps[1].parse().unwrap_or(0);
    let minute: u32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    match hour {
        9 if (15..=45).contains(&minute) => EffectiveTime::Slot(TimeSlot::NineThirty),
        9 => EffectiveTime::Slot(TimeSlot::Nine),
        10 => EffectiveTime::Slot(TimeSlot::Ten),
        14 => EffectiveTime::Slot(TimeSlot::Fourteen),
        15 => EffectiveTime::Slot(TimeSlot::Fifteen),
        _ => EffectiveTime::Freeform(format!("{hour:02}:{minute:02}")),
    }
}

/// The skills an agent worked in the three weeks before the target week.
///
/// Stored oldest first. The roster columns 6, 7 and 8 are read in that
/// order, so index 2 is always the most recent week.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekHistory([String; 3]);

impl WeekHistory {
    pub fn new(oldest: impl Into<String>, middle: impl Into<String>, latest: impl Into<String>) -> Self {
        Self([oldest.into(), middle.into(), latest.into()])
    }

    pub fn weeks(&self) -> &[String; 3] {
        &self.0
    }

    pub fn most_recent(&self) -> &str {
        &self.0[2]
    }

    /// True when any week mentions the skill, case-insensitive substring.
    pub fn mentions(&self, skill: &Skill) -> bool {
        let needle = skill.label().to_lowercase();
        self.0.iter().any(|w| w.to_lowercase().contains(&needle))
    }

    pub fn last_week_was_varios(&self) -> bool {
        self.most_recent().to_lowercase().contains("varios")
    }
}

/// Historical assignment counts. Read-only during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadCounters {
    pub discapacidad:   i32,
    pub prestadores:    i32,
    pub tutor:          i32,
    pub medicamentos:   i32,
    pub autorizaciones: i32,
    pub cobranzas:      i32,
    pub varios:         i32,
}

impl LoadCounters {
    pub fn get(&self, kind: CounterKind) -> i32 {
        match kind {
            CounterKind::Discapacidad   => self.discapacidad,
            CounterKind::Prestadores    => self.prestadores,
            CounterKind::Tutor          => self.tutor,
            CounterKind::Medicamentos   => self.medicamentos,
            CounterKind::Autorizaciones => self.autorizaciones,
            CounterKind::Cobranzas      => self.cobranzas,
            CounterKind::Varios         => self.varios,
        }
    }

    /// The counter that load-balances a skill. Zero for skills that carry no
    /// counter (Comercial, custom values).
    pub fn for_skill(&self, skill: &Skill) -> i32 {
        skill.counter().map(|kind| self.get(kind)).unwrap_or(0)
    }
}

/// One roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    pub schedule_time: String,
    pub real_time: String,
    pub effective_time: EffectiveTime,
    pub is_presta_qualified: bool,
    pub is_tutor_qualified: bool,
    /// Lower-cased free-text category.
    pub variable: String,
    pub weeks_history: WeekHistory,
    pub target_week_fixed: Option<String>,
    pub counters: LoadCounters,
    pub absence_marks: Vec<String>,
    pub total_absences: i32,
    pub is_fully_absent: bool,
    pub assigned_skill: Option<Skill>,
    pub assignment_reason: Option<AssignmentReason>,
}

impl AgentRecord {
    /// Build a record with derived fields filled in. Used by the parser and
    /// handy for constructing rosters directly.
    pub fn new(name: impl Into<String>, schedule_time: impl Into<String>, real_time: impl Into<String>) -> Self {
        let name = name.into();
        let schedule_time = schedule_time.into();
        let real_time = real_time.into();
        let effective_time = effective_time(&schedule_time, &real_time);
        Self {
            id: name.clone(),
            name,
            schedule_time,
            real_time,
            effective_time,
            is_presta_qualified: false,
            is_tutor_qualified: false,
            variable: String::new(),
            weeks_history: WeekHistory::default(),
            target_week_fixed: None,
            counters: LoadCounters::default(),
            absence_marks: Vec::new(),
            total_absences: 0,
            is_fully_absent: false,
            assigned_skill: None,
            assignment_reason: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_skill.is_some()
    }

    /// Set skill and reason together. An agent is assigned exactly once
    /// per run; a second call is a bug in the caller.
    pub fn assign(&mut self, skill: Skill, reason: AssignmentReason) {
        debug_assert!(
            self.assigned_skill.is_none(),
            "agent '{}' already assigned to {:?}",
            self.name,
            self.assigned_skill
        );
        if self.assigned_skill.is_some() {
            return;
        }
        self.assigned_skill = Some(skill);
        self.assignment_reason = Some(reason);
    }

    /// Pre-assigned skill from the roster, when it is more than one
    /// character long. Single characters are treated as placeholders.
    pub fn fixed_target(&self) -> Option<&str> {
        self.target_week_fixed
            .as_deref()
            .filter(|t| t.chars().count() > 1)
    }
}

/// Real time wins when present; schedule time otherwise.
pub fn effective_time(schedule_time: &str, real_time: &str) -> EffectiveTime {
    if real_time.is_empty() {
        normalize_time(schedule_time)
    } else {
        normalize_time(real_time)
    }
}

/// Result of parsing a roster, with the count of rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParsedRoster {
    pub agents: Vec<AgentRecord>,
    pub skipped_rows: usize,
}

/// Parse roster text into agent records, discarding the header line.
pub fn parse(raw: &str) -> Vec<AgentRecord> {
    parse_roster(raw).agents
}

/// Parse roster text and keep track of how many rows were unusable.
pub fn parse_roster(raw: &str) -> ParsedRoster {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 2 {
        log::debug!("roster has {} non-empty lines; nothing to parse", lines.len());
        return ParsedRoster::default();
    }

    let mut roster = ParsedRoster::default();
    for (line_no, line) in lines.iter().enumerate().skip(1) {
        let cols: Vec<&str> = line.split(',').map(str::trim).collect();
        match parse_row(&cols) {
            Some(agent) => roster.agents.push(agent),
            None => {
                log::debug!(
                    "roster line {}: {} columns, need {MIN_COLUMNS}",
                    line_no + 1,
                    cols.len()
                );
                roster.skipped_rows += 1;
            }
        }
    }

    if roster.skipped_rows > 0 {
        log::warn!(
            "roster: skipped {} malformed row(s), kept {}",
            roster.skipped_rows,
            roster.agents.len()
        );
    }
    roster
}

fn parse_row(cols: &[&str]) -> Option<AgentRecord> {
    if cols.len() < MIN_COLUMNS {
        return None;
    }
    let col = |i: usize| cols.get(i).copied().unwrap_or("");
    let num = |i: usize| leading_int(col(i));

    let mut agent = AgentRecord::new(col(0), col(1), col(2));
    agent.is_presta_qualified = is_flagged(col(3));
    agent.variable = col(4).to_lowercase();
    agent.is_tutor_qualified = is_flagged(col(5));
    agent.weeks_history = WeekHistory::new(col(6), col(7), col(8));
    agent.target_week_fixed = Some(col(9))
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    agent.counters = LoadCounters {
        discapacidad:   num(10),
        prestadores:    num(11),
        tutor:          num(12),
        medicamentos:   num(13),
        autorizaciones: num(14),
        cobranzas:      num(15),
        varios:         num(16),
    };

    let last = cols.len() - 1;
    if last > FIRST_DAY_COLUMN {
        agent.absence_marks = cols[FIRST_DAY_COLUMN..last]
            .iter()
            .map(|c| c.to_string())
            .collect();
    }
    agent.total_absences = num(last);
    agent.is_fully_absent = fully_absent(agent.total_absences, cols.len());

    Some(agent)
}

/// Absence threshold: one absence per day column, or a hard floor of
/// `SHORT_WEEK_ABSENCES` when the week has three days or fewer.
pub fn fully_absent(total_absences: i32, column_count: usize) -> bool {
    let day_cols = column_count as i64 - 1 - FIRST_DAY_COLUMN as i64;
    let max_days = if day_cols > 0 { day_cols as i32 } else { DEFAULT_WORK_DAYS };

    total_absences >= max_days
        || (total_absences >= SHORT_WEEK_ABSENCES && max_days <= SHORT_WEEK_ABSENCES)
}

fn is_flagged(raw: &str) -> bool {
    raw.to_lowercase().contains('x')
}

/// Leading integer of a field ("12", "-3", "4 días"); 0 when there is none.
fn leading_int(raw: &str) -> i32 {
    let raw = raw.trim();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().map(|n| sign * n).unwrap_or(0)
}
