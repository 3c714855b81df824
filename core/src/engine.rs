//! The assignment engine: resolves every agent to exactly one skill.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Fixed rules, first match wins:
//!        Paolelli → Prestadores, manual exception → Varios,
//!        commercial variable → Comercial, full absence → Varios,
//!        pre-assigned target → that skill.
//!   2. Quota allocation, skill by skill in `Skill::QUOTA_ORDER`,
//!      requirement by requirement in configuration order.
//!   3. Fallback: whoever is left goes to Varios.
//!
//! RULES:
//!   - The caller's roster is never touched; the engine works on a copy.
//!   - An agent is assigned once. Later phases only see unassigned agents.
//!   - All randomness flows through the injected `TieBreak`.

use crate::{
    config::SkillRequirement,
    rng::{SeededShuffle, TieBreak},
    roster::AgentRecord,
    types::{Qualification, Skill, TimeSlot},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Name fragment that pins an agent to Prestadores ahead of every other rule.
pub const PAOLELLI: &str = "paolelli";

/// Fragment of the variable column that routes an agent to Comercial.
pub const COMMERCIAL_VARIABLE: &str = "comercial";

/// Why an agent ended up on a skill. `Display` gives the audit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssignmentReason {
    FixedPaolelli,
    ManualException,
    CommercialVariable,
    FullAbsence,
    PreAssigned,
    Quota {
        time_slot:   TimeSlot,
        had_history: bool,
        counter:     i32,
    },
    Remainder,
}

impl fmt::Display for AssignmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedPaolelli      => f.write_str("fixed assignment (Paolelli)"),
            Self::ManualException    => f.write_str("manual exception"),
            Self::CommercialVariable => f.write_str("commercial variable"),
            Self::FullAbsence        => f.write_str("full absence, defaulted to Varios"),
            Self::PreAssigned        => f.write_str("pre-assigned in source"),
            Self::Quota { time_slot, had_history, counter } => write!(
                f,
                "quota {time_slot} (history: {}, count: {counter})",
                if *had_history { "Sí" } else { "No" }
            ),
            Self::Remainder          => f.write_str("remainder, quotas filled"),
        }
    }
}

/// A requirement that could not be fully staffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub skill:     Skill,
    pub time_slot: TimeSlot,
    pub required:  u32,
    pub assigned:  u32,
}

impl Shortfall {
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.assigned)
    }
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not fill {} at {}: short by {} agent(s) ({} of {} assigned)",
            self.skill,
            self.time_slot,
            self.missing(),
            self.assigned,
            self.required
        )
    }
}

/// Output of one engine run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Agents in roster order, every one assigned.
    pub agents:     Vec<AgentRecord>,
    pub shortfalls: Vec<Shortfall>,
    /// Human-readable shortfall lines, one per entry in `shortfalls`.
    pub logs:       Vec<String>,
}

impl AssignmentOutcome {
    /// Headcount per assigned skill.
    pub fn skill_totals(&self) -> BTreeMap<Skill, usize> {
        let mut totals = BTreeMap::new();
        for skill in self.agents.iter().filter_map(|a| a.assigned_skill.clone()) {
            *totals.entry(skill).or_insert(0) += 1;
        }
        totals
    }

    pub fn unassigned_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_assigned()).count()
    }
}

pub struct AssignmentEngine<R: TieBreak> {
    tie_break: R,
}

impl AssignmentEngine<SeededShuffle> {
    /// Engine with a reproducible shuffle.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededShuffle::new(seed))
    }
}

impl<R: TieBreak> AssignmentEngine<R> {
    pub fn new(tie_break: R) -> Self {
        Self { tie_break }
    }

    /// Run all three phases over a copy of `agents`.
    pub fn assign(
        &mut self,
        agents: &[AgentRecord],
        requirements: &[SkillRequirement],
        exception_names: &[String],
    ) -> AssignmentOutcome {
        let mut agents = agents.to_vec();
        // Each run starts from a clean slate, even when fed a prior outcome.
        for agent in agents.iter_mut() {
            agent.assigned_skill = None;
            agent.assignment_reason = None;
        }

        let fixed = apply_fixed_rules(&mut agents, exception_names);
        log::debug!("phase 1: {fixed} agent(s) fixed before quotas");

        let shortfalls = self.allocate_quotas(&mut agents, requirements);

        let remainder = assign_remainder(&mut agents);
        log::debug!("phase 3: {remainder} agent(s) sent to Varios as remainder");

        let logs: Vec<String> = shortfalls.iter().map(|s| s.to_string()).collect();
        log::info!(
            "assignment complete: {} agent(s), {} shortfall(s)",
            agents.len(),
            shortfalls.len()
        );

        AssignmentOutcome { agents, shortfalls, logs }
    }

    fn allocate_quotas(
        &mut self,
        agents: &mut [AgentRecord],
        requirements: &[SkillRequirement],
    ) -> Vec<Shortfall> {
        let mut shortfalls = Vec::new();

        for skill in Skill::QUOTA_ORDER.iter() {
            for req in requirements.iter().filter(|r| &r.skill == skill) {
                if req.count <= 0 {
                    continue;
                }
                let required = req.count as usize;

                // Indices into `agents`, so the copy stays in roster order.
                let mut candidates: Vec<usize> = agents
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| is_candidate(a, skill, req.time_slot))
                    .map(|(i, _)| i)
                    .collect();

                self.tie_break.shuffle(&mut candidates);
                candidates.sort_by(|&a, &b| rank(&agents[a], &agents[b], skill));

                let take = candidates.len().min(required);
                for &i in &candidates[..take] {
                    let agent = &mut agents[i];
                    let reason = AssignmentReason::Quota {
                        time_slot:   req.time_slot,
                        had_history: agent.weeks_history.mentions(skill),
                        counter:     agent.counters.for_skill(skill),
                    };
                    agent.assign(skill.clone(), reason);
                }

                log::debug!(
                    "phase 2: {skill} @ {}: {take}/{required} assigned from {} candidate(s)",
                    req.time_slot,
                    candidates.len()
                );

                if take < required {
                    let shortfall = Shortfall {
                        skill:     skill.clone(),
                        time_slot: req.time_slot,
                        required:  required as u32,
                        assigned:  take as u32,
                    };
                    log::warn!("{shortfall}");
                    shortfalls.push(shortfall);
                }
            }
        }
        shortfalls
    }
}

/// Convenience entry point with a non-reproducible tie-break.
pub fn assign(
    agents: &[AgentRecord],
    requirements: &[SkillRequirement],
    exception_names: &[String],
) -> AssignmentOutcome {
    AssignmentEngine::new(SeededShuffle::from_entropy()).assign(agents, requirements, exception_names)
}

/// Phase 1. Returns how many agents were fixed.
fn apply_fixed_rules(agents: &mut [AgentRecord], exception_names: &[String]) -> usize {
    let mut fixed = 0;
    for agent in agents.iter_mut() {
        if let Some((skill, reason)) = fixed_rule(agent, exception_names) {
            if skill.is_custom() {
                log::warn!(
                    "agent '{}' pre-assigned to unrecognized skill '{skill}'; keeping it as-is",
                    agent.name
                );
            }
            agent.assign(skill, reason);
            fixed += 1;
        }
    }
    fixed
}

fn fixed_rule(agent: &AgentRecord, exception_names: &[String]) -> Option<(Skill, AssignmentReason)> {
    if agent.name.to_lowercase().contains(PAOLELLI) {
        return Some((Skill::Prestadores, AssignmentReason::FixedPaolelli));
    }
    if exception_names.iter().any(|n| n == &agent.name) {
        return Some((Skill::Varios, AssignmentReason::ManualException));
    }
    if agent.variable.contains(COMMERCIAL_VARIABLE) {
        return Some((Skill::Comercial, AssignmentReason::CommercialVariable));
    }
    if agent.is_fully_absent {
        return Some((Skill::Varios, AssignmentReason::FullAbsence));
    }
    agent
        .fixed_target()
        .map(|target| (Skill::parse(target), AssignmentReason::PreAssigned))
}

fn is_candidate(agent: &AgentRecord, skill: &Skill, slot: TimeSlot) -> bool {
    !agent.is_assigned()
        && !agent.is_fully_absent
        && agent.effective_time.matches(slot)
        && is_qualified(agent, skill)
}

fn is_qualified(agent: &AgentRecord, skill: &Skill) -> bool {
    match skill.qualification() {
        Some(Qualification::Tutor) => agent.is_tutor_qualified,
        Some(Qualification::Presta) => agent.is_presta_qualified,
        None => true,
    }
}

/// Ranking for a quota skill, ascending = assigned first:
/// no recent exposure to the skill, then not in Varios last week,
/// then the lower load counter.
fn rank(a: &AgentRecord, b: &AgentRecord, skill: &Skill) -> Ordering {
    // `false` sorts before `true`, which is exactly the preference.
    a.weeks_history
        .mentions(skill)
        .cmp(&b.weeks_history.mentions(skill))
        .then_with(|| {
            a.weeks_history
                .last_week_was_varios()
                .cmp(&b.weeks_history.last_week_was_varios())
        })
        .then_with(|| a.counters.for_skill(skill).cmp(&b.counters.for_skill(skill)))
}

/// Phase 3. Returns how many agents fell through to Varios.
fn assign_remainder(agents: &mut [AgentRecord]) -> usize {
    let mut count = 0;
    for agent in agents.iter_mut().filter(|a| !a.is_assigned()) {
        agent.assign(Skill::Varios, AssignmentReason::Remainder);
        count += 1;
    }
    count
}
