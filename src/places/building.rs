// 🏢 Buildings stand on an estate and may be named over time

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};
use crate::temporal::{self, Dated};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub estate_id: String,
    /// Date of construction, if known
    pub date: Option<NaiveDate>,
    pub building_area: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub partial_bathrooms: Option<u32>,
    pub rooms: Option<u32>,
    pub pool: String,
    pub fire_place: String,
    pub type_construction: String,
    pub number_of_stories: Option<u32>,
    pub style: String,
    pub basement: String,
    pub roof_cover: String,
    pub foundation: String,
    pub elevator: String,
}

impl Building {
    pub fn new(estate_id: &str) -> Self {
        Building {
            id: uuid::Uuid::new_v4().to_string(),
            estate_id: estate_id.to_string(),
            ..Building::default()
        }
    }

    pub fn built(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Short descriptive fields and their limits
    fn short_fields(&self) -> [(&'static str, &str); 9] {
        [
            ("building_area", self.building_area.as_str()),
            ("pool", self.pool.as_str()),
            ("fire_place", self.fire_place.as_str()),
            ("type_construction", self.type_construction.as_str()),
            ("style", self.style.as_str()),
            ("basement", self.basement.as_str()),
            ("roof_cover", self.roof_cover.as_str()),
            ("foundation", self.foundation.as_str()),
            ("elevator", self.elevator.as_str()),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Building");
        checks.required("estate_id", &self.estate_id);
        for (field, value) in self.short_fields() {
            checks.max_len(field, value, 16);
        }
        if let (Some(rooms), Some(bedrooms)) = (self.rooms, self.bedrooms) {
            if bedrooms > rooms {
                checks.fail("bedrooms", format!("{} bedrooms but only {} rooms", bedrooms, rooms));
            }
        }
        if self.number_of_stories == Some(0) {
            checks.fail("number_of_stories", "A building has at least one story");
        }
        checks.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingName {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub building_id: String,
    /// Date the name was assigned, if known
    pub date: Option<NaiveDate>,
    pub name: String,
}

impl BuildingName {
    pub fn new(building_id: &str, date: Option<NaiveDate>, name: impl Into<String>) -> Self {
        BuildingName {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            building_id: building_id.to_string(),
            date,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("BuildingName");
        checks.required("building_id", &self.building_id);
        checks.required("name", &self.name);
        checks.max_len("name", &self.name, 64);
        checks.finish()
    }
}

impl Dated for BuildingName {
    fn effective_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Name in use on `as_of`. An undated name counts from the start.
pub fn building_name_as_of(names: &[BuildingName], as_of: NaiveDate) -> Option<&str> {
    temporal::latest_as_of(names, as_of).map(|n| n.name.as_str())
}
