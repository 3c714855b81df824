//! CSV output for a finished run.

use crate::{
    error::{RosterError, RosterResult},
    roster::AgentRecord,
};
use csv::Writer;

pub const SKILL_HEADER: &str = "Skill Asignado";

/// Written for an agent with no skill. Never expected after a full run.
pub const UNASSIGNED_PLACEHOLDER: &str = "Sin Asignar";

/// One column, one row per agent in roster order. Meant to be pasted next
/// to the source roster.
pub fn skills_csv(agents: &[AgentRecord]) -> RosterResult<String> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record([SKILL_HEADER])?;
    for agent in agents {
        let skill = agent
            .assigned_skill
            .as_ref()
            .map(|s| s.label())
            .unwrap_or(UNASSIGNED_PLACEHOLDER);
        wtr.write_record([skill])?;
    }
    finish(wtr)
}

/// Full results table: who, when, what and why.
pub fn report_csv(agents: &[AgentRecord]) -> RosterResult<String> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(["Asesor", "Horario (Real)", SKILL_HEADER, "Motivo"])?;
    for agent in agents {
        wtr.write_record([
            agent.name.clone(),
            agent.effective_time.to_string(),
            agent
                .assigned_skill
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| UNASSIGNED_PLACEHOLDER.to_string()),
            agent
                .assignment_reason
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_default(),
        ])?;
    }
    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> RosterResult<String> {
    let data = wtr
        .into_inner()
        .map_err(|e| RosterError::Other(anyhow::anyhow!("CSV writer error: {e}")))?;
    String::from_utf8(data)
        .map_err(|e| RosterError::Other(anyhow::anyhow!("UTF-8 conversion error: {e}")))
}
