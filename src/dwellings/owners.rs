// 🔑 Owners - the people and legal entities that can hold property

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, RecordError, Result};

// ============================================================================
// PARTY
// ============================================================================

/// Who stands behind an owner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Party {
    Person(String),
    Entity(String),
}

impl Party {
    pub fn kind(&self) -> &'static str {
        match self {
            Party::Person(_) => "person",
            Party::Entity(_) => "entity",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Party::Person(id) | Party::Entity(id) => id,
        }
    }

    pub fn from_parts(kind: &str, id: impl Into<String>) -> Result<Self> {
        match kind {
            "person" => Ok(Party::Person(id.into())),
            "entity" => Ok(Party::Entity(id.into())),
            other => Err(RecordError::UnknownCode {
                kind: "party kind",
                code: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub party: Party,
}

impl Owner {
    pub fn new(party: Party) -> Self {
        Owner {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            party,
        }
    }

    pub fn person(person_id: &str) -> Self {
        Owner::new(Party::Person(person_id.to_string()))
    }

    pub fn entity(entity_id: &str) -> Self {
        Owner::new(Party::Entity(entity_id.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Owner");
        checks.required("party", self.party.id());
        checks.finish()
    }
}

// ============================================================================
// LEGAL ENTITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Llc,
    Corporation,
    Trust,
    Partnership,
    Other,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Llc,
        EntityKind::Corporation,
        EntityKind::Trust,
        EntityKind::Partnership,
        EntityKind::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EntityKind::Llc => "LLC",
            EntityKind::Corporation => "COR",
            EntityKind::Trust => "TRU",
            EntityKind::Partnership => "PAR",
            EntityKind::Other => "OTH",
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.code() == code)
            .ok_or_else(|| RecordError::UnknownCode {
                kind: "entity kind",
                code: code.to_string(),
            })
    }
}

/// A company, trust or partnership whose shares people hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub name: String,
    pub kind: EntityKind,
    pub formed: Option<NaiveDate>,
}

impl LegalEntity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        LegalEntity {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            name: name.into(),
            kind,
            formed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("LegalEntity");
        checks.required("name", &self.name);
        checks.max_len("name", &self.name, 128);
        checks.finish()
    }
}
