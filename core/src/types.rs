//! Shared primitive types used across the roster and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A work queue an agent can be assigned to for the shift.
///
/// The first six variants are quota skills and are filled by the ranked
/// allocation. `Varios` is the catch-all, `Comercial` is only reachable
/// through the commercial variable. `Custom` carries a pre-assigned value
/// from the roster that does not name any known skill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Skill {
    Tutor,
    Prestadores,
    Discapacidad,
    Cobranzas,
    Autorizaciones,
    Medicamentos,
    Varios,
    Comercial,
    Custom(String),
}

/// Which qualification flag gates a quota skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualification {
    Tutor,
    Presta,
}

/// Which historical load counter ranks candidates for a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Discapacidad,
    Prestadores,
    Tutor,
    Medicamentos,
    Autorizaciones,
    Cobranzas,
    Varios,
}

impl Skill {
    /// Quota skills in the order the engine fills them.
    /// Changing this order changes who lands where.
    pub const QUOTA_ORDER: [Skill; 6] = [
        Skill::Tutor,
        Skill::Prestadores,
        Skill::Discapacidad,
        Skill::Cobranzas,
        Skill::Autorizaciones,
        Skill::Medicamentos,
    ];

    /// Parse a free-text skill name. Known labels match case-insensitively;
    /// anything else is kept verbatim (trimmed) as `Custom`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "tutor" => Self::Tutor,
            "prestadores" => Self::Prestadores,
            "discapacidad" => Self::Discapacidad,
            "cobranzas" => Self::Cobranzas,
            "autorizaciones" => Self::Autorizaciones,
            "medicamentos" => Self::Medicamentos,
            "varios" => Self::Varios,
            "comercial" => Self::Comercial,
            _ => Self::Custom(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Tutor => "Tutor",
            Self::Prestadores => "Prestadores",
            Self::Discapacidad => "Discapacidad",
            Self::Cobranzas => "Cobranzas",
            Self::Autorizaciones => "Autorizaciones",
            Self::Medicamentos => "Medicamentos",
            Self::Varios => "Varios",
            Self::Comercial => "Comercial",
            Self::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// The qualification flag an agent needs before being ranked for this
    /// skill. Only Tutor and Prestadores are gated.
    pub fn qualification(&self) -> Option<Qualification> {
        match self {
            Self::Tutor => Some(Qualification::Tutor),
            Self::Prestadores => Some(Qualification::Presta),
            _ => None,
        }
    }

    /// The load counter used as the third ranking key.
    /// `None` for skills that are never allocated by quota.
    pub fn counter(&self) -> Option<CounterKind> {
        match self {
            Self::Tutor => Some(CounterKind::Tutor),
            Self::Prestadores => Some(CounterKind::Prestadores),
            Self::Discapacidad => Some(CounterKind::Discapacidad),
            Self::Cobranzas => Some(CounterKind::Cobranzas),
            Self::Autorizaciones => Some(CounterKind::Autorizaciones),
            Self::Medicamentos => Some(CounterKind::Medicamentos),
            Self::Varios => Some(CounterKind::Varios),
            Self::Comercial | Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Skill> for String {
    fn from(skill: Skill) -> Self {
        skill.label().to_string()
    }
}

impl From<String> for Skill {
    fn from(raw: String) -> Self {
        Skill::parse(&raw)
    }
}

/// The five canonical shift-start buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "09:00")]
    Nine,
    #[serde(rename = "09:15/09:30")]
    NineThirty,
    #[serde(rename = "10:00")]
    Ten,
    #[serde(rename = "14:00")]
    Fourteen,
    #[serde(rename = "15:00")]
    Fifteen,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 5] = [
        TimeSlot::Nine,
        TimeSlot::NineThirty,
        TimeSlot::Ten,
        TimeSlot::Fourteen,
        TimeSlot::Fifteen,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nine => "09:00",
            Self::NineThirty => "09:15/09:30",
            Self::Ten => "10:00",
            Self::Fourteen => "14:00",
            Self::Fifteen => "15:00",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.label() == label.trim())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The normalized start time of an agent.
///
/// `Freeform` holds an `HH:MM` string (or the raw lower-cased input when no
/// digits were found). It never equals any requirement's slot, so such an
/// agent only gets assigned by the fixed rules or the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectiveTime {
    Slot(TimeSlot),
    Freeform(String),
}

impl EffectiveTime {
    pub fn slot(&self) -> Option<TimeSlot> {
        match self {
            Self::Slot(slot) => Some(*slot),
            Self::Freeform(_) => None,
        }
    }

    pub fn matches(&self, slot: TimeSlot) -> bool {
        self.slot() == Some(slot)
    }
}

impl fmt::Display for EffectiveTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slot(slot) => f.write_str(slot.label()),
            Self::Freeform(raw) => f.write_str(raw),
        }
    }
}
