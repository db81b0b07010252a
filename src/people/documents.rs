// Identity documents issued against a name registration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};
use crate::temporal::Dated;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdDoc {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub name_registration_id: String,
    /// Full name exactly as printed on the document
    pub name_on_id: String,
    /// Document name, e.g. "Missouri Driver License"
    pub name: String,
    pub number: String,
    /// Issue date
    pub date: NaiveDate,
    pub expire: Option<NaiveDate>,
    pub info: String,
}

impl IdDoc {
    pub fn new(
        name_registration_id: &str,
        name_on_id: impl Into<String>,
        name: impl Into<String>,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        IdDoc {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            name_registration_id: name_registration_id.to_string(),
            name_on_id: name_on_id.into(),
            name: name.into(),
            number: number.into(),
            date,
            expire: None,
            info: String::new(),
        }
    }

    pub fn expiring(mut self, expire: NaiveDate) -> Self {
        self.expire = Some(expire);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("IdDoc");
        checks.required("name_registration_id", &self.name_registration_id);
        checks.required("name_on_id", &self.name_on_id);
        checks.max_len("name_on_id", &self.name_on_id, 128);
        checks.required("name", &self.name);
        checks.max_len("name", &self.name, 16);
        checks.required("number", &self.number);
        checks.max_len("number", &self.number, 32);
        checks.max_len("info", &self.info, 32);
        checks.not_before("expire", Some(self.date), self.expire);
        checks.finish()
    }

    /// Issued on or before `date` and not yet expired (expiry day is still valid)
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.date <= date && self.expire.map_or(true, |expire| date <= expire)
    }
}

impl Dated for IdDoc {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}
