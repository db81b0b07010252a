// 🗺️ Estate - just the land. Each estate has exactly one address.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};

static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("zip pattern"));

/// Two-letter USPS codes: states, DC, territories, freely associated states
/// and armed forces mail
pub const POSTAL_CODES: [&str; 62] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "AS", "GU", "MP", "PR", "VI", "FM", "MH", "PW", "AA",
    "AE", "AP",
];

pub fn is_postal_code(code: &str) -> bool {
    POSTAL_CODES.contains(&code)
}

/// `NNNNN` or `NNNNN-NNNN`
pub fn is_zip_code(zip: &str) -> bool {
    ZIP_RE.is_match(zip)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub tax_parcel_number: String,
    pub tax_property_description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Estate {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        state: &str,
        zip_code: impl Into<String>,
    ) -> Self {
        Estate {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            tax_parcel_number: String::new(),
            tax_property_description: String::new(),
            address: address.into(),
            city: city.into(),
            state: state.trim().to_uppercase(),
            zip_code: zip_code.into(),
        }
    }

    pub fn with_parcel(mut self, number: impl Into<String>, description: impl Into<String>) -> Self {
        self.tax_parcel_number = number.into();
        self.tax_property_description = description.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Estate");
        checks.max_len("tax_parcel_number", &self.tax_parcel_number, 64);
        checks.max_len("tax_property_description", &self.tax_property_description, 64);
        checks.required("address", &self.address);
        checks.max_len("address", &self.address, 64);
        checks.required("city", &self.city);
        checks.max_len("city", &self.city, 32);
        if !is_postal_code(&self.state) {
            checks.fail("state", format!("'{}' is not a USPS state code", self.state));
        }
        if !is_zip_code(&self.zip_code) {
            checks.fail("zip_code", "Enter a zip code in the format XXXXX or XXXXX-XXXX");
        }
        checks.finish()
    }

    /// One-line mailing address
    pub fn mailing_address(&self) -> String {
        format!("{}, {}, {} {}", self.address, self.city, self.state, self.zip_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_codes() {
        assert!(is_zip_code("64106"));
        assert!(is_zip_code("64106-1234"));
        assert!(!is_zip_code("6410"));
        assert!(!is_zip_code("64106-12"));
        assert!(!is_zip_code("6410a"));
        assert!(!is_zip_code("64106 "));
        assert!(!is_zip_code("641061234"));
        assert!(!is_zip_code("６４１０６"));
    }

    #[test]
    fn test_estate_validation() {
        let estate = Estate::new("100 Main St", "Kansas City", " mo", "64106");
        assert_eq!(estate.state, "MO");
        assert!(estate.validate().is_ok());
        assert_eq!(estate.mailing_address(), "100 Main St, Kansas City, MO 64106");

        let estate = Estate::new("", "Kansas City", "ZZ", "641");
        let err = estate.validate().unwrap_err();
        let fields: Vec<&str> = err.validation_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["address", "state", "zip_code"]);
    }
}
