// 👤 Person - identity anchor for everything else about someone
//
// The only thing tracked here that should not change through a life is
// self-reported ancestry, and all of it may be left blank.

use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};

/// Check all that apply. `None` means the question was left unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ancestry {
    pub hispanic_or_latino: Option<bool>,
    pub white_or_caucasian: Option<bool>,
    pub european: Option<bool>,
    pub middle_eastern: Option<bool>,
    pub arab_world_african: Option<bool>,
    pub black_african: Option<bool>,
    pub american_indian: Option<bool>,
    pub eskimo_or_inuit: Option<bool>,
    pub asian: Option<bool>,
    pub pacific_islander: Option<bool>,
    pub hawaiian: Option<bool>,
    pub other: Option<bool>,
}

impl Ancestry {
    /// Column order used by the database layer
    pub const COLUMNS: [&'static str; 12] = [
        "hispanic_or_latino",
        "white_or_caucasian",
        "european",
        "middle_eastern",
        "arab_world_african",
        "black_african",
        "american_indian",
        "eskimo_or_inuit",
        "asian",
        "pacific_islander",
        "hawaiian",
        "other",
    ];

    pub fn as_array(&self) -> [Option<bool>; 12] {
        [
            self.hispanic_or_latino,
            self.white_or_caucasian,
            self.european,
            self.middle_eastern,
            self.arab_world_african,
            self.black_african,
            self.american_indian,
            self.eskimo_or_inuit,
            self.asian,
            self.pacific_islander,
            self.hawaiian,
            self.other,
        ]
    }

    pub fn from_array(values: [Option<bool>; 12]) -> Self {
        let [hispanic_or_latino, white_or_caucasian, european, middle_eastern, arab_world_african, black_african, american_indian, eskimo_or_inuit, asian, pacific_islander, hawaiian, other] =
            values;
        Ancestry {
            hispanic_or_latino,
            white_or_caucasian,
            european,
            middle_eastern,
            arab_world_african,
            black_african,
            american_indian,
            eskimo_or_inuit,
            asian,
            pacific_islander,
            hawaiian,
            other,
        }
    }

    /// Names of the boxes checked yes
    pub fn checked(&self) -> Vec<&'static str> {
        Self::COLUMNS
            .iter()
            .zip(self.as_array())
            .filter(|(_, value)| *value == Some(true))
            .map(|(column, _)| *column)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identity (UUID)
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    #[serde(default)]
    pub ancestry: Ancestry,
    pub additional_ancestry_information: String,
}

impl Person {
    pub fn new() -> Self {
        Person {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            ancestry: Ancestry::default(),
            additional_ancestry_information: String::new(),
        }
    }

    pub fn with_ancestry(mut self, ancestry: Ancestry) -> Self {
        self.ancestry = ancestry;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Person");
        checks.max_len(
            "additional_ancestry_information",
            &self.additional_ancestry_information,
            64,
        );
        checks.finish()
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new()
    }
}
