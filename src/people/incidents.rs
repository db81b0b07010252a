// Incidental records kept about a person: convictions, immunizations, pet licenses

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};
use crate::temporal::{self, Dated};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conviction {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    /// Date of conviction
    pub date: NaiveDate,
    /// Court or state
    pub jurisdiction: String,
    pub offense: String,
    pub case_number: String,
    pub sentence: String,
}

impl Conviction {
    pub fn new(
        person_id: &str,
        date: NaiveDate,
        jurisdiction: impl Into<String>,
        offense: impl Into<String>,
    ) -> Self {
        Conviction {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            date,
            jurisdiction: jurisdiction.into(),
            offense: offense.into(),
            case_number: String::new(),
            sentence: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Conviction");
        checks.required("person_id", &self.person_id);
        checks.required("jurisdiction", &self.jurisdiction);
        checks.max_len("jurisdiction", &self.jurisdiction, 64);
        checks.required("offense", &self.offense);
        checks.max_len("offense", &self.offense, 128);
        checks.max_len("case_number", &self.case_number, 32);
        checks.max_len("sentence", &self.sentence, 128);
        checks.finish()
    }
}

impl Dated for Conviction {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Convictions on record by `as_of`, most recent first
pub fn convictions_as_of(convictions: &[Conviction], as_of: NaiveDate) -> Vec<&Conviction> {
    temporal::most_recent_first(convictions)
        .into_iter()
        .filter(|c| c.date <= as_of)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Immunization {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    pub date: NaiveDate,
    pub vaccine: String,
    /// Dose number within the series, starting at 1
    pub dose: u32,
    pub administered_by: String,
}

impl Immunization {
    pub fn new(person_id: &str, date: NaiveDate, vaccine: impl Into<String>, dose: u32) -> Self {
        Immunization {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            date,
            vaccine: vaccine.into(),
            dose,
            administered_by: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Immunization");
        checks.required("person_id", &self.person_id);
        checks.required("vaccine", &self.vaccine);
        checks.max_len("vaccine", &self.vaccine, 64);
        checks.max_len("administered_by", &self.administered_by, 64);
        if self.dose == 0 {
            checks.fail("dose", "Dose numbers start at 1");
        }
        checks.finish()
    }
}

impl Dated for Immunization {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Latest dose of `vaccine` received by `as_of`
pub fn latest_dose<'a>(
    immunizations: &'a [Immunization],
    vaccine: &str,
    as_of: NaiveDate,
) -> Option<&'a Immunization> {
    temporal::latest_as_of(
        immunizations
            .iter()
            .filter(|i| i.vaccine.eq_ignore_ascii_case(vaccine)),
        as_of,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetLicense {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    /// Issue date
    pub date: NaiveDate,
    pub expire: Option<NaiveDate>,
    pub pet_name: String,
    pub species: String,
    pub license_number: String,
    /// City or county that issued the license
    pub jurisdiction: String,
}

impl PetLicense {
    pub fn new(
        person_id: &str,
        date: NaiveDate,
        pet_name: impl Into<String>,
        species: impl Into<String>,
        license_number: impl Into<String>,
    ) -> Self {
        PetLicense {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            date,
            expire: None,
            pet_name: pet_name.into(),
            species: species.into(),
            license_number: license_number.into(),
            jurisdiction: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("PetLicense");
        checks.required("person_id", &self.person_id);
        checks.required("pet_name", &self.pet_name);
        checks.max_len("pet_name", &self.pet_name, 32);
        checks.required("species", &self.species);
        checks.max_len("species", &self.species, 32);
        checks.required("license_number", &self.license_number);
        checks.max_len("license_number", &self.license_number, 32);
        checks.max_len("jurisdiction", &self.jurisdiction, 64);
        checks.not_before("expire", Some(self.date), self.expire);
        checks.finish()
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.date <= date && self.expire.map_or(true, |expire| date <= expire)
    }
}

impl Dated for PetLicense {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}
