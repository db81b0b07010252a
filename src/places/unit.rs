// 🚪 Units - rentable spaces on a property (raw land or a building)

use serde::{Deserialize, Serialize};

use crate::error::{Checks, RecordError, Result};

/// A property is either raw land or a building
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PropertyRef {
    Land(String),
    Building(String),
}

impl PropertyRef {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyRef::Land(_) => "land",
            PropertyRef::Building(_) => "building",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PropertyRef::Land(id) | PropertyRef::Building(id) => id,
        }
    }

    pub fn from_parts(kind: &str, id: impl Into<String>) -> Result<Self> {
        match kind {
            "land" => Ok(PropertyRef::Land(id.into())),
            "building" => Ok(PropertyRef::Building(id.into())),
            other => Err(RecordError::UnknownCode {
                kind: "property kind",
                code: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub property: PropertyRef,
    /// "Apt 2B", "Lot 14", "Whole house"
    pub label: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
}

impl Unit {
    pub fn new(property: PropertyRef, label: impl Into<String>) -> Self {
        Unit {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            property,
            label: label.into(),
            bedrooms: None,
            bathrooms: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Unit");
        checks.required("property", self.property.id());
        checks.required("label", &self.label);
        checks.max_len("label", &self.label, 32);
        checks.finish()
    }
}
