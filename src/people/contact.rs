// 📞 Contact records - phones, email addresses, online profiles

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Checks, Result};
use crate::temporal::Dated;

static NON_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("non-digit pattern"));
/// Optional country code, then area code and exchange that cannot start with 0 or 1
static US_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1?([2-9][0-9]{2})([2-9][0-9]{2})([0-9]{4})$").expect("phone pattern")
});
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern")
});

// ============================================================================
// PHONE
// ============================================================================

/// Normalize a US phone number to `NNN-NNN-NNNN`.
///
/// Accepts any punctuation and an optional leading country code 1. Area codes
/// and exchanges cannot start with 0 or 1.
pub fn normalize_us_phone(raw: &str) -> Option<String> {
    let digits = NON_DIGIT_RE.replace_all(raw, "");
    let caps = US_PHONE_RE.captures(&digits)?;
    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    /// When service with this carrier started for this person, if known
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// A date this number was a valid way to reach the person
    pub valid_date: NaiveDate,
    /// A date it no longer was
    pub invalid_date: Option<NaiveDate>,
    pub phone_number: String,
    /// Provider and/or type (contract, prepaid, landline, voip, virtual)
    pub carrier: String,
    /// Hidden from other users unless given on a form such as a rental application
    pub private: bool,
    /// Does/did this number belong to this person
    pub belongs: Option<bool>,
}

impl Phone {
    pub fn new(person_id: &str, phone_number: &str, valid_date: NaiveDate) -> Self {
        Phone {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            start_date: None,
            end_date: None,
            valid_date,
            invalid_date: None,
            phone_number: normalize_us_phone(phone_number)
                .unwrap_or_else(|| phone_number.to_string()),
            carrier: String::new(),
            private: false,
            belongs: None,
        }
    }

    pub fn owned_since(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.belongs = Some(true);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Phone");
        checks.required("person_id", &self.person_id);
        if normalize_us_phone(&self.phone_number).is_none() {
            checks.fail("phone_number", "Phone numbers must be in XXX-XXX-XXXX format");
        }
        checks.max_len("carrier", &self.carrier, 64);
        if self.start_date.is_some() && self.belongs != Some(true) {
            checks.fail(
                "belongs",
                "Since there's a date for this phone number going into service for this \
                 person, it must be marked as belonging to this person. If it never really \
                 belonged to this person, remove the service start date.",
            );
        }
        checks.not_before("end_date", self.start_date, self.end_date);
        checks.not_before("invalid_date", Some(self.valid_date), self.invalid_date);
        checks.finish()
    }

    /// Reachable at this number on `date`
    pub fn is_valid_contact_on(&self, date: NaiveDate) -> bool {
        self.valid_date <= date && self.invalid_date.map_or(true, |invalid| date < invalid)
    }

    /// In service for this person on `date`; needs a known start date
    pub fn in_service_on(&self, date: NaiveDate) -> bool {
        match self.start_date {
            Some(start) => start <= date && self.end_date.map_or(true, |end| date <= end),
            None => false,
        }
    }
}

impl Dated for Phone {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.valid_date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Numbers that reached the person on `date`, skipping private ones unless asked
pub fn phones_on(phones: &[Phone], date: NaiveDate, include_private: bool) -> Vec<&Phone> {
    phones
        .iter()
        .filter(|p| p.is_valid_contact_on(date) && (include_private || !p.private))
        .collect()
}

// ============================================================================
// EMAIL
// ============================================================================

fn looks_like_email(addr: &str) -> bool {
    EMAIL_RE.is_match(addr)
}

/// `http` or `https` with a host
fn is_web_url(uri: &str) -> bool {
    Url::parse(uri).map_or(false, |url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().map_or(false, |h| !h.is_empty())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    /// Sign-up date
    pub date: NaiveDate,
    pub addr: String,
    /// Termination date
    pub term: Option<NaiveDate>,
}

impl Email {
    pub fn new(person_id: &str, addr: impl Into<String>, date: NaiveDate) -> Self {
        Email {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            date,
            addr: addr.into(),
            term: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Email");
        checks.required("person_id", &self.person_id);
        checks.max_len("addr", &self.addr, 254);
        if !looks_like_email(&self.addr) {
            checks.fail("addr", "Enter a valid email address");
        }
        checks.not_before("term", Some(self.date), self.term);
        checks.finish()
    }

    pub fn active_on(&self, date: NaiveDate) -> bool {
        self.date <= date && self.term.map_or(true, |term| date < term)
    }
}

impl Dated for Email {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

// ============================================================================
// PROFILE
// ============================================================================

/// Online profile link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    /// Creation date
    pub date: NaiveDate,
    pub uri: String,
    pub del_date: Option<NaiveDate>,
}

impl Profile {
    pub fn new(person_id: &str, uri: impl Into<String>, date: NaiveDate) -> Self {
        Profile {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            date,
            uri: uri.into(),
            del_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Profile");
        checks.required("person_id", &self.person_id);
        checks.max_len("uri", &self.uri, 200);
        if !is_web_url(&self.uri) {
            checks.fail("uri", "Enter a valid URL");
        }
        checks.not_before("del_date", Some(self.date), self.del_date);
        checks.finish()
    }

    pub fn active_on(&self, date: NaiveDate) -> bool {
        self.date <= date && self.del_date.map_or(true, |del| date < del)
    }
}

impl Dated for Profile {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_normalize_us_phone() {
        assert_eq!(normalize_us_phone("(816) 555-0199").as_deref(), Some("816-555-0199"));
        assert_eq!(normalize_us_phone("+1 816.555.0199").as_deref(), Some("816-555-0199"));
        assert_eq!(normalize_us_phone("555-0199"), None);
        assert_eq!(normalize_us_phone("016-555-0199"), None);
        assert_eq!(normalize_us_phone("816-155-0199"), None);
        assert_eq!(normalize_us_phone("1 (816) 555-0199 ext"), Some("816-555-0199".to_string()));
        assert_eq!(normalize_us_phone("2 816 555 0199"), None);
    }

    #[test]
    fn test_start_date_requires_belongs() {
        let mut phone = Phone::new("p1", "816 555 0199", d(2015, 1, 1));
        phone.start_date = Some(d(2014, 12, 1));
        let err = phone.validate().unwrap_err();
        assert_eq!(err.validation_errors()[0].field, "belongs");

        let phone = Phone::new("p1", "816 555 0199", d(2015, 1, 1)).owned_since(d(2014, 12, 1));
        assert!(phone.validate().is_ok());
        assert_eq!(phone.phone_number, "816-555-0199");
    }

    #[test]
    fn test_phone_windows() {
        let mut phone = Phone::new("p1", "8165550199", d(2015, 1, 1)).owned_since(d(2014, 12, 1));
        phone.invalid_date = Some(d(2018, 1, 1));
        phone.end_date = Some(d(2017, 6, 30));

        assert!(phone.is_valid_contact_on(d(2017, 12, 31)));
        assert!(!phone.is_valid_contact_on(d(2018, 1, 1)));
        assert!(phone.in_service_on(d(2017, 6, 30)));
        assert!(!phone.in_service_on(d(2017, 7, 1)));

        phone.private = true;
        let phones = vec![phone];
        assert!(phones_on(&phones, d(2016, 1, 1), false).is_empty());
        assert_eq!(phones_on(&phones, d(2016, 1, 1), true).len(), 1);
    }

    #[test]
    fn test_email_validation() {
        assert!(Email::new("p1", "ada@example.com", d(2000, 1, 1)).validate().is_ok());
        assert!(Email::new("p1", "ada@example", d(2000, 1, 1)).validate().is_err());
        assert!(Email::new("p1", "a da@example.com", d(2000, 1, 1)).validate().is_err());
        assert!(Email::new("p1", "@example.com", d(2000, 1, 1)).validate().is_err());
        assert!(Email::new("p1", "ada@example..com", d(2000, 1, 1)).validate().is_err());
        assert!(Email::new("p1", "ada@@example.com", d(2000, 1, 1)).validate().is_err());

        let mut email = Email::new("p1", "ada@example.com", d(2000, 1, 1));
        email.term = Some(d(2004, 1, 1));
        assert!(email.active_on(d(2003, 12, 31)));
        assert!(!email.active_on(d(2004, 1, 1)));
    }

    #[test]
    fn test_profile_validation() {
        assert!(Profile::new("p1", "https://example.org/ada", d(2010, 1, 1)).validate().is_ok());
        assert!(Profile::new("p1", "example.org/ada", d(2010, 1, 1)).validate().is_err());
        assert!(Profile::new("p1", "https://", d(2010, 1, 1)).validate().is_err());
        assert!(Profile::new("p1", "https://a b", d(2010, 1, 1)).validate().is_err());
        assert!(Profile::new("p1", "ftp://example.org/ada", d(2010, 1, 1)).validate().is_err());
        assert!(Profile::new("p1", "http://localhost:8080/~ada", d(2010, 1, 1)).validate().is_ok());
    }
}
