use crate::{
    error::{RosterError, RosterResult},
    roster::AgentRecord,
    types::{Skill, TimeSlot},
};
use serde::{Deserialize, Serialize};

/// Most names the operator may put on the exception list.
pub const MAX_EXCEPTIONS: usize = 20;

/// Names pre-selected as exceptions when they appear in a loaded roster.
/// Matched as case-insensitive substrings of the roster name.
pub const DEFAULT_EXCEPTION_NAMES: [&str; 3] = [
    "Perales Aime Belen",
    "Occhi Liliana Andrea",
    "Rodriguez Mariana Brenda",
];

/// Target headcount for one (skill, time slot) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: Skill,
    pub time_slot: TimeSlot,
    /// Zero or negative means the pair is skipped.
    pub count: i32,
}

impl SkillRequirement {
    pub fn new(skill: Skill, time_slot: TimeSlot, count: i32) -> Self {
        Self { skill, time_slot, count }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct QuotaFile {
    requirements: Vec<SkillRequirement>,
}

/// The operator's quota table. Order matters: within a skill, requirements
/// are filled in the order they appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotaTable {
    pub requirements: Vec<SkillRequirement>,
}

impl QuotaTable {
    pub fn new(requirements: Vec<SkillRequirement>) -> Self {
        Self { requirements }
    }

    /// Load from a JSON file shaped `{ "requirements": [ ... ] }`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: QuotaFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!("loaded {} requirement(s) from {path}", file.requirements.len());
        Ok(Self::new(file.requirements))
    }

    /// The center's standing quotas, with every missing (skill, slot) pair
    /// appended at zero so the table is complete and editable.
    pub fn default_center() -> Self {
        use Skill::*;
        use TimeSlot::*;

        // Columns: 09:00, 09:15/09:30, 10:00, 14:00, 15:00. `None` = not staffed.
        let standing: [(Skill, [Option<i32>; 5]); 6] = [
            (Tutor,          [Some(5),  Some(1), Some(2),  Some(3), Some(5)]),
            (Prestadores,    [Some(7),  Some(3), Some(2),  Some(4), Some(5)]),
            (Discapacidad,   [Some(9),  Some(5), Some(2),  Some(6), Some(8)]),
            (Cobranzas,      [Some(8),  None,    Some(6),  Some(1), Some(8)]),
            (Autorizaciones, [Some(12), Some(5), Some(5),  Some(3), Some(5)]),
            (Medicamentos,   [Some(12), Some(5), Some(11), Some(3), Some(5)]),
        ];
        let slots = [Nine, NineThirty, Ten, Fourteen, Fifteen];

        let mut table = Self::default();
        for (skill, counts) in standing.iter() {
            for (slot, count) in slots.iter().zip(counts.iter()) {
                if let Some(count) = count {
                    table.requirements.push(SkillRequirement::new(skill.clone(), *slot, *count));
                }
            }
        }
        table.zero_fill();
        table
    }

    /// Append a zero requirement for every quota skill and slot not present.
    pub fn zero_fill(&mut self) {
        for skill in Skill::QUOTA_ORDER.iter() {
            for slot in TimeSlot::ALL {
                if self.find(skill, slot).is_none() {
                    self.requirements.push(SkillRequirement::new(skill.clone(), slot, 0));
                }
            }
        }
    }

    fn find(&self, skill: &Skill, slot: TimeSlot) -> Option<usize> {
        self.requirements
            .iter()
            .position(|r| &r.skill == skill && r.time_slot == slot)
    }

    /// Required headcount for a pair; absent pairs require nobody.
    pub fn count_for(&self, skill: &Skill, slot: TimeSlot) -> i32 {
        self.find(skill, slot)
            .map(|i| self.requirements[i].count)
            .unwrap_or(0)
    }

    /// Edit a pair before a run, adding it at the end when missing.
    pub fn set_count(&mut self, skill: Skill, slot: TimeSlot, count: i32) {
        match self.find(&skill, slot) {
            Some(i) => self.requirements[i].count = count,
            None => self.requirements.push(SkillRequirement::new(skill, slot, count)),
        }
    }

    /// Requirements of one skill in configuration order.
    pub fn for_skill<'a>(&'a self, skill: &'a Skill) -> impl Iterator<Item = &'a SkillRequirement> + 'a {
        self.requirements.iter().filter(move |r| &r.skill == skill)
    }

    /// Sum of all positive counts.
    pub fn total(&self) -> i32 {
        self.requirements.iter().map(|r| r.count.max(0)).sum()
    }

    pub fn as_slice(&self) -> &[SkillRequirement] {
        &self.requirements
    }
}

/// Agents the operator forces into Varios, by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionList {
    names: Vec<String>,
}

impl ExceptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from names, ignoring duplicates and blanks. Fails past the cap.
    pub fn from_names<I, S>(names: I) -> RosterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for name in names {
            list.insert(name)?;
        }
        Ok(list)
    }

    /// Load one name per line; blank lines are skipped.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let list = Self::from_names(content.lines().map(str::trim))?;
        log::debug!("loaded {} exception(s) from {path}", list.len());
        Ok(list)
    }

    /// Roster names that contain any default exception name,
    /// case-insensitive. Stops quietly at the cap.
    pub fn with_defaults_from(agents: &[AgentRecord]) -> Self {
        let mut list = Self::new();
        let defaults: Vec<String> = DEFAULT_EXCEPTION_NAMES
            .iter()
            .map(|d| d.to_lowercase())
            .collect();
        for agent in agents {
            let name = agent.name.to_lowercase();
            if defaults.iter().any(|d| name.contains(d.as_str()))
                && list.insert(agent.name.clone()).is_err()
            {
                break;
            }
        }
        list
    }

    /// Add a name. Returns `false` when it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> RosterResult<bool> {
        let name = name.into();
        if name.is_empty() || self.contains(&name) {
            return Ok(false);
        }
        if self.names.len() >= MAX_EXCEPTIONS {
            return Err(RosterError::TooManyExceptions { max: MAX_EXCEPTIONS });
        }
        self.names.push(name);
        Ok(true)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
