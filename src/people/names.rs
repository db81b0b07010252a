// 🪪 Names - legal names, pseudonyms, aliases and nicknames
//
// The first NameChange is the name on the birth certificate. A person
// normally has one registered name and one nickname at a time. Names that
// were never registered are aliases. A pseudonym registered somewhere other
// than both Social Security and the DMV (a stage or pen name filed with a
// County Clerk) is used alongside the registered legal name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, RecordError, Result};
use crate::temporal::{self, Dated};

// ============================================================================
// NAME METHOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NameMethod {
    Birth,
    /// Court order
    #[default]
    Court,
    Marriage,
    Divorce,
    Adoption,
    Naturalization,
    Pseudonym,
}

impl NameMethod {
    pub const ALL: [NameMethod; 7] = [
        NameMethod::Birth,
        NameMethod::Court,
        NameMethod::Marriage,
        NameMethod::Divorce,
        NameMethod::Adoption,
        NameMethod::Naturalization,
        NameMethod::Pseudonym,
    ];

    /// Two-letter code stored in the database
    pub fn code(&self) -> &'static str {
        match self {
            NameMethod::Birth => "BI",
            NameMethod::Court => "CO",
            NameMethod::Marriage => "MA",
            NameMethod::Divorce => "DI",
            NameMethod::Adoption => "AD",
            NameMethod::Naturalization => "NA",
            NameMethod::Pseudonym => "PS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NameMethod::Birth => "Birth",
            NameMethod::Court => "Court Order",
            NameMethod::Marriage => "Marriage",
            NameMethod::Divorce => "Divorce",
            NameMethod::Adoption => "Adoption",
            NameMethod::Naturalization => "Naturalization",
            NameMethod::Pseudonym => "Pseudonym",
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.code() == code)
            .ok_or_else(|| RecordError::UnknownCode {
                kind: "name method",
                code: code.to_string(),
            })
    }
}

// ============================================================================
// AGENCY
// ============================================================================

/// Where a name was registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Agency {
    #[default]
    SocialSecurity,
    ConsularAffairs,
    PostalService,
    MotorVehicles,
    SecretaryOfState,
    CountyClerk,
    Other,
}

impl Agency {
    pub const ALL: [Agency; 7] = [
        Agency::SocialSecurity,
        Agency::ConsularAffairs,
        Agency::PostalService,
        Agency::MotorVehicles,
        Agency::SecretaryOfState,
        Agency::CountyClerk,
        Agency::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Agency::SocialSecurity => "SSA",
            Agency::ConsularAffairs => "BCA",
            Agency::PostalService => "USP",
            Agency::MotorVehicles => "DMV",
            Agency::SecretaryOfState => "SOS",
            Agency::CountyClerk => "COC",
            Agency::Other => "OTH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Agency::SocialSecurity => "Social Security Administration",
            Agency::ConsularAffairs => "Bureau of Consular Affairs",
            Agency::PostalService => "United States Postal Service",
            Agency::MotorVehicles => "Department of Motor Vehicles",
            Agency::SecretaryOfState => "Secretary of State",
            Agency::CountyClerk => "County Clerk",
            Agency::Other => "Other",
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.code() == code)
            .ok_or_else(|| RecordError::UnknownCode {
                kind: "agency",
                code: code.to_string(),
            })
    }
}

// ============================================================================
// NAME PARTS
// ============================================================================

/// The parts every name record shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameParts {
    /// Best estimate of the date this name was first used
    pub date: NaiveDate,
    pub prime_given_name: String,
    /// Middle given names
    pub other_given_name: String,
    /// Required. A one-word name goes here with the other parts left blank.
    pub first_family_name: String,
    /// Second family name or mother's maiden name
    pub second_family_name: String,
    /// Use the first family name in the last name
    pub use_first: bool,
    /// Use the second family name; with `use_first` the last name is hyphenated
    pub use_second: bool,
}

impl NameParts {
    pub fn new(date: NaiveDate, first_family_name: impl Into<String>) -> Self {
        NameParts {
            date,
            prime_given_name: String::new(),
            other_given_name: String::new(),
            first_family_name: first_family_name.into(),
            second_family_name: String::new(),
            use_first: true,
            use_second: false,
        }
    }

    pub fn with_given(mut self, prime: impl Into<String>, other: impl Into<String>) -> Self {
        self.prime_given_name = prime.into();
        self.other_given_name = other.into();
        self
    }

    pub fn with_second_family(mut self, second: impl Into<String>, use_first: bool) -> Self {
        self.second_family_name = second.into();
        self.use_first = use_first;
        self.use_second = true;
        self
    }

    pub fn last(&self) -> String {
        if self.use_first && self.use_second {
            format!("{}-{}", self.first_family_name, self.second_family_name)
        } else if self.use_second {
            self.second_family_name.clone()
        } else {
            self.first_family_name.clone()
        }
    }

    pub fn full_name(&self) -> String {
        let last = self.last();
        [
            self.prime_given_name.as_str(),
            self.other_given_name.as_str(),
            last.as_str(),
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub(crate) fn check(&self, checks: &mut Checks) {
        checks.max_len("prime_given_name", &self.prime_given_name, 32);
        checks.max_len("other_given_name", &self.other_given_name, 64);
        checks.required("first_family_name", &self.first_family_name);
        checks.max_len("first_family_name", &self.first_family_name, 32);
        checks.max_len("second_family_name", &self.second_family_name, 32);
        if self.use_second && self.second_family_name.trim().is_empty() {
            checks.fail("second_family_name", "Required when the second family name is used");
        }
        if !self.use_first && !self.use_second {
            checks.fail("use_first", "At least one family name must be used");
        }
    }
}

impl std::fmt::Display for NameParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
    }
}

// ============================================================================
// NICKNAME
// ============================================================================

/// One nickname at a time, only as an easy way to refer to someone.
/// A nickname passed off as a real name is an alias instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nick {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    /// Date this nickname started to be used, or the previous one stopped
    pub date: NaiveDate,
    /// Blank marks that the previous nickname stopped being used
    pub name: String,
}

impl Nick {
    pub fn new(person_id: &str, date: NaiveDate, name: impl Into<String>) -> Self {
        Nick {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            date,
            name: name.into(),
        }
    }

    /// Marks the end of the previous nickname
    pub fn stopped(person_id: &str, date: NaiveDate) -> Self {
        Nick::new(person_id, date, "")
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Nick");
        checks.required("person_id", &self.person_id);
        checks.max_len("name", &self.name, 32);
        checks.finish()
    }
}

impl Dated for Nick {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Nickname in use on `as_of`, `None` if there never was one or it was dropped
pub fn nickname_as_of(nicks: &[Nick], as_of: NaiveDate) -> Option<&str> {
    temporal::latest_as_of(nicks, as_of)
        .map(|nick| nick.name.as_str())
        .filter(|name| !name.trim().is_empty())
}

// ============================================================================
// NAME CHANGE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameChange {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub person_id: String,
    #[serde(flatten)]
    pub name: NameParts,
    /// Why this name was assigned
    pub reason: String,
    /// Date of first registration. Left blank it is filled in from the registrations.
    pub date_registered: Option<NaiveDate>,
    pub method: NameMethod,
    /// Court and document number, or parents and hospital for a birth name
    pub method_info: String,
}

impl NameChange {
    pub fn new(
        person_id: &str,
        name: NameParts,
        reason: impl Into<String>,
        method: NameMethod,
    ) -> Self {
        NameChange {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            person_id: person_id.to_string(),
            name,
            reason: reason.into(),
            date_registered: None,
            method,
            method_info: String::new(),
        }
    }

    pub fn with_method_info(mut self, info: impl Into<String>) -> Self {
        self.method_info = info.into();
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.name.date
    }

    pub fn full_name(&self) -> String {
        self.name.full_name()
    }

    fn own<'a>(&'a self, registrations: &'a [NameRegistration]) -> impl Iterator<Item = &'a NameRegistration> + 'a {
        registrations
            .iter()
            .filter(move |r| r.name_change_id == self.id)
    }

    /// True when there are no registrations of this name
    pub fn is_alias(&self, registrations: &[NameRegistration]) -> bool {
        self.own(registrations).next().is_none()
    }

    /// A registered pseudonym that is not registered with both SSA and DMV
    pub fn is_proper_pseudonym(&self, registrations: &[NameRegistration]) -> bool {
        if self.method != NameMethod::Pseudonym || self.is_alias(registrations) {
            return false;
        }
        let with = |agency: Agency| self.own(registrations).any(|r| r.registered_with == agency);
        !(with(Agency::SocialSecurity) && with(Agency::MotorVehicles))
    }

    pub fn date_first_registered(&self, registrations: &[NameRegistration]) -> Option<NaiveDate> {
        self.own(registrations).map(|r| r.date).min()
    }

    /// Field checks that need no registrations
    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("NameChange");
        checks.required("person_id", &self.person_id);
        self.name.check(&mut checks);
        checks.required("reason", &self.reason);
        checks.max_len("reason", &self.reason, 64);
        checks.max_len("method_info", &self.method_info, 32);
        checks.finish()
    }

    /// Reconcile `date_registered` with the registrations.
    ///
    /// Blank is filled in with the earliest registration date. An entered date
    /// must match it, and cannot be entered before any registration exists.
    pub fn clean(&mut self, registrations: &[NameRegistration]) -> Result<()> {
        let first = self.date_first_registered(registrations);
        if self.date_registered == first {
            return Ok(());
        }
        let mut checks = Checks::new("NameChange");
        match (self.date_registered, first) {
            (None, Some(first)) => self.date_registered = Some(first),
            (Some(_), None) => checks.fail(
                "date_registered",
                "First enter some registrations for this name before entering the registration date",
            ),
            _ => checks.fail(
                "date_registered",
                "The registration date entered does not match the earliest registration date \
                 for this name. Leave this field blank and the correct date will be filled in \
                 automatically.",
            ),
        }
        checks.finish()
    }
}

impl Dated for NameChange {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.name.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

// ============================================================================
// NAME REGISTRATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRegistration {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub name_change_id: String,
    /// Date the name was registered with the agency
    pub date: NaiveDate,
    pub registered_with: Agency,
    /// State, county, or who "Other" is (employer, bank, doctor...)
    pub reg_info: String,
}

impl NameRegistration {
    pub fn new(name_change_id: &str, date: NaiveDate, registered_with: Agency) -> Self {
        NameRegistration {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            name_change_id: name_change_id.to_string(),
            date,
            registered_with,
            reg_info: String::new(),
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.reg_info = info.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("NameRegistration");
        checks.required("name_change_id", &self.name_change_id);
        checks.max_len("reg_info", &self.reg_info, 64);
        checks.finish()
    }
}

impl Dated for NameRegistration {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

// ============================================================================
// NAME STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameStatus {
    /// Never registered
    Alias,
    /// Registered pseudonym used next to the legal name
    ProperPseudonym,
    /// The latest registered name, or the latest registered non-pseudonym
    /// when that one is a proper pseudonym
    Legal,
    /// Registered, but replaced by a later legal name
    Superseded,
    /// First used after the reference date
    NotYetUsed,
}

impl NameStatus {
    pub fn is_current(&self) -> bool {
        matches!(
            self,
            NameStatus::Alias | NameStatus::ProperPseudonym | NameStatus::Legal
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameStatus::Alias => "alias",
            NameStatus::ProperPseudonym => "pseudonym",
            NameStatus::Legal => "registered",
            NameStatus::Superseded => "superseded",
            NameStatus::NotYetUsed => "not yet used",
        }
    }
}

// ============================================================================
// PERSON NAMES
// ============================================================================

/// A registered name keyed by its first registration, so the generic
/// resolver can pick the latest one
struct FirstRegistered<'a> {
    name: &'a NameChange,
    first: NaiveDate,
}

impl Dated for FirstRegistered<'_> {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.first)
    }

    fn sequence(&self) -> i64 {
        self.name.seq
    }
}

/// Every name of one person together with the registrations of those names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonNames {
    pub person_id: String,
    pub names: Vec<NameChange>,
    pub registrations: Vec<NameRegistration>,
}

impl PersonNames {
    pub fn new(person_id: &str) -> Self {
        PersonNames {
            person_id: person_id.to_string(),
            names: Vec::new(),
            registrations: Vec::new(),
        }
    }

    pub fn add_name(&mut self, name: NameChange) {
        self.names.push(name);
    }

    pub fn add_registration(&mut self, registration: NameRegistration) {
        self.registrations.push(registration);
    }

    pub fn get(&self, name_id: &str) -> Option<&NameChange> {
        self.names.iter().find(|n| n.id == name_id)
    }

    /// Names current first
    pub fn history(&self) -> Vec<&NameChange> {
        temporal::most_recent_first(&self.names)
    }

    /// Registrations known on `as_of`
    fn registrations_as_of(&self, as_of: NaiveDate) -> Vec<NameRegistration> {
        self.registrations
            .iter()
            .filter(|r| r.date <= as_of)
            .cloned()
            .collect()
    }

    fn legal_among<'a>(
        &'a self,
        registrations: &[NameRegistration],
        as_of: NaiveDate,
    ) -> Option<&'a NameChange> {
        let registered: Vec<FirstRegistered<'a>> = self
            .names
            .iter()
            .filter(|n| n.date() <= as_of)
            .filter_map(|n| {
                n.date_first_registered(registrations)
                    .map(|first| FirstRegistered { name: n, first })
            })
            .collect();
        let latest = temporal::latest_as_of(&registered, as_of)?.name;
        if !latest.is_proper_pseudonym(registrations) {
            return Some(latest);
        }

        // A proper pseudonym sits beside the legal name, so fall back to
        // the latest registered name that is no pseudonym at all
        let non_pseudonyms = registered
            .iter()
            .filter(|c| c.name.method != NameMethod::Pseudonym);
        temporal::latest_as_of(non_pseudonyms, as_of).map(|c| c.name)
    }

    fn classify(
        &self,
        name: &NameChange,
        registrations: &[NameRegistration],
        as_of: NaiveDate,
    ) -> NameStatus {
        if name.date() > as_of {
            NameStatus::NotYetUsed
        } else if name.is_alias(registrations) {
            NameStatus::Alias
        } else if name.is_proper_pseudonym(registrations) {
            NameStatus::ProperPseudonym
        } else if self
            .legal_among(registrations, as_of)
            .map_or(false, |legal| legal.id == name.id)
        {
            NameStatus::Legal
        } else {
            NameStatus::Superseded
        }
    }

    pub fn status_as_of(&self, name_id: &str, as_of: NaiveDate) -> Result<NameStatus> {
        let name = self.get(name_id).ok_or_else(|| RecordError::NotFound {
            kind: "name change",
            id: name_id.to_string(),
        })?;
        let registrations = self.registrations_as_of(as_of);
        Ok(self.classify(name, &registrations, as_of))
    }

    pub fn is_current(&self, name_id: &str, as_of: NaiveDate) -> Result<bool> {
        Ok(self.status_as_of(name_id, as_of)?.is_current())
    }

    /// Every name current on `as_of` with how it is current, current first
    pub fn all_current_names(&self, as_of: NaiveDate) -> Vec<(&NameChange, NameStatus)> {
        let registrations = self.registrations_as_of(as_of);
        self.history()
            .into_iter()
            .map(|name| (name, self.classify(name, &registrations, as_of)))
            .filter(|(_, status)| status.is_current())
            .collect()
    }

    /// Names that were current on `date`
    pub fn all_names_for(&self, date: NaiveDate) -> Vec<&NameChange> {
        self.all_current_names(date)
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// The registered pseudonym (authors, actors) in use on `as_of`, if any
    pub fn the_proper_pseudonym(&self, as_of: NaiveDate) -> Option<&NameChange> {
        let registrations = self.registrations_as_of(as_of);
        let pseudonyms: Vec<FirstRegistered<'_>> = self
            .names
            .iter()
            .filter(|n| n.date() <= as_of && n.is_proper_pseudonym(&registrations))
            .filter_map(|n| {
                n.date_first_registered(&registrations)
                    .map(|first| FirstRegistered { name: n, first })
            })
            .collect();
        temporal::latest_as_of(&pseudonyms, as_of).map(|c| c.name)
    }

    /// The registered legal name on `as_of`
    pub fn legal_name(&self, as_of: NaiveDate) -> Result<&NameChange> {
        let registrations = self.registrations_as_of(as_of);
        self.legal_among(&registrations, as_of)
            .ok_or_else(|| RecordError::DoesNotExist {
                kind: "legal name",
                subject: self.person_id.clone(),
                as_of,
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn name(person: &str, date: NaiveDate, family: &str, method: NameMethod, seq: i64) -> NameChange {
        let mut n = NameChange::new(
            person,
            NameParts::new(date, family).with_given("Ada", ""),
            "test",
            method,
        );
        n.seq = seq;
        n
    }

    fn reg(name: &NameChange, date: NaiveDate, agency: Agency) -> NameRegistration {
        NameRegistration::new(&name.id, date, agency)
    }

    #[test]
    fn test_last_name_rules() {
        let parts = NameParts::new(d(1980, 1, 1), "Garcia")
            .with_given("Maria", "Elena")
            .with_second_family("Lopez", true);
        assert_eq!(parts.last(), "Garcia-Lopez");
        assert_eq!(parts.full_name(), "Maria Elena Garcia-Lopez");

        let parts = NameParts::new(d(1980, 1, 1), "Garcia").with_second_family("Lopez", false);
        assert_eq!(parts.last(), "Lopez");
        assert_eq!(parts.full_name(), "Lopez");

        let parts = NameParts::new(d(1980, 1, 1), "Cher");
        assert_eq!(parts.to_string(), "Cher");
    }

    #[test]
    fn test_name_parts_validation() {
        let mut parts = NameParts::new(d(1980, 1, 1), "");
        parts.use_first = false;
        let mut checks = Checks::new("NameChange");
        parts.check(&mut checks);
        let err = checks.finish().unwrap_err();
        let fields: Vec<&str> = err.validation_errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"first_family_name"));
        assert!(fields.contains(&"use_first"));
    }

    #[test]
    fn test_method_and_agency_codes() {
        for method in NameMethod::ALL {
            assert_eq!(NameMethod::from_code(method.code()).unwrap(), method);
        }
        for agency in Agency::ALL {
            assert_eq!(Agency::from_code(agency.code()).unwrap(), agency);
        }
        assert_eq!(NameMethod::default(), NameMethod::Court);
        assert_eq!(Agency::default(), Agency::SocialSecurity);
        assert!(NameMethod::from_code("XX").is_err());
    }

    #[test]
    fn test_unregistered_name_is_alias() {
        let mut names = PersonNames::new("p1");
        let alias = name("p1", d(1995, 1, 1), "Smith", NameMethod::Court, 1);
        let alias_id = alias.id.clone();
        names.add_name(alias);

        assert_eq!(names.status_as_of(&alias_id, d(2000, 1, 1)).unwrap(), NameStatus::Alias);
        assert!(names.is_current(&alias_id, d(2000, 1, 1)).unwrap());
        assert!(names.legal_name(d(2000, 1, 1)).is_err());
    }

    #[test]
    fn test_registered_later_is_alias_before_registration() {
        let mut names = PersonNames::new("p1");
        let birth = name("p1", d(1990, 4, 2), "Lovelace", NameMethod::Birth, 1);
        names.add_registration(reg(&birth, d(1990, 5, 1), Agency::SocialSecurity));
        let id = birth.id.clone();
        names.add_name(birth);

        assert_eq!(names.status_as_of(&id, d(1990, 4, 20)).unwrap(), NameStatus::Alias);
        assert_eq!(names.status_as_of(&id, d(1990, 5, 1)).unwrap(), NameStatus::Legal);
        assert_eq!(names.status_as_of(&id, d(1980, 1, 1)).unwrap(), NameStatus::NotYetUsed);
    }

    #[test]
    fn test_marriage_supersedes_birth_name() {
        let mut names = PersonNames::new("p1");
        let birth = name("p1", d(1970, 1, 1), "Byron", NameMethod::Birth, 1);
        let married = name("p1", d(1995, 6, 1), "King", NameMethod::Marriage, 2);
        names.add_registration(reg(&birth, d(1970, 2, 1), Agency::SocialSecurity));
        names.add_registration(reg(&married, d(1995, 7, 1), Agency::SocialSecurity));
        names.add_registration(reg(&married, d(1995, 8, 1), Agency::MotorVehicles));
        let (birth_id, married_id) = (birth.id.clone(), married.id.clone());
        names.add_name(birth);
        names.add_name(married);

        assert_eq!(names.legal_name(d(1995, 6, 30)).unwrap().id, birth_id);
        assert_eq!(names.legal_name(d(1995, 7, 1)).unwrap().id, married_id);
        assert_eq!(names.status_as_of(&birth_id, d(2000, 1, 1)).unwrap(), NameStatus::Superseded);

        let current = names.all_names_for(d(2000, 1, 1));
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, married_id);
    }

    #[test]
    fn test_proper_pseudonym_alongside_legal_name() {
        let mut names = PersonNames::new("p1");
        let legal = name("p1", d(1960, 1, 1), "Clemens", NameMethod::Birth, 1);
        let pen = name("p1", d(1985, 1, 1), "Twain", NameMethod::Pseudonym, 2);
        names.add_registration(reg(&legal, d(1960, 1, 5), Agency::SocialSecurity));
        names.add_registration(reg(&pen, d(1986, 1, 1), Agency::CountyClerk));
        let (legal_id, pen_id) = (legal.id.clone(), pen.id.clone());
        names.add_name(legal);
        names.add_name(pen);

        let as_of = d(1990, 1, 1);
        assert_eq!(names.status_as_of(&pen_id, as_of).unwrap(), NameStatus::ProperPseudonym);
        assert_eq!(names.legal_name(as_of).unwrap().id, legal_id);
        assert_eq!(names.the_proper_pseudonym(as_of).unwrap().id, pen_id);

        let current = names.all_current_names(as_of);
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].0.id, pen_id);
        assert_eq!(current[1].1, NameStatus::Legal);
    }

    #[test]
    fn test_pseudonym_with_ssa_and_dmv_becomes_legal() {
        let mut names = PersonNames::new("p1");
        let legal = name("p1", d(1960, 1, 1), "Norma", NameMethod::Birth, 1);
        let stage = name("p1", d(1980, 1, 1), "Marilyn", NameMethod::Pseudonym, 2);
        names.add_registration(reg(&legal, d(1960, 1, 5), Agency::SocialSecurity));
        names.add_registration(reg(&stage, d(1981, 1, 1), Agency::SocialSecurity));
        names.add_registration(reg(&stage, d(1981, 2, 1), Agency::MotorVehicles));
        let (legal_id, stage_id) = (legal.id.clone(), stage.id.clone());
        names.add_name(legal);
        names.add_name(stage);

        // Only the SSA registration is known yet: still a proper pseudonym
        assert_eq!(names.status_as_of(&stage_id, d(1981, 1, 15)).unwrap(), NameStatus::ProperPseudonym);
        assert_eq!(names.legal_name(d(1981, 1, 15)).unwrap().id, legal_id);

        assert_eq!(names.status_as_of(&stage_id, d(1981, 2, 1)).unwrap(), NameStatus::Legal);
        assert_eq!(names.status_as_of(&legal_id, d(1981, 2, 1)).unwrap(), NameStatus::Superseded);
        assert!(names.the_proper_pseudonym(d(1981, 2, 1)).is_none());
    }

    #[test]
    fn test_later_proper_pseudonym_restores_non_pseudonym_as_legal() {
        let mut names = PersonNames::new("p1");
        let birth = name("p1", d(1960, 1, 1), "Jordan", NameMethod::Birth, 1);
        let stage = name("p1", d(1980, 1, 1), "Starr", NameMethod::Pseudonym, 2);
        let pen = name("p1", d(1990, 1, 1), "Quill", NameMethod::Pseudonym, 3);
        names.add_registration(reg(&birth, d(1960, 1, 5), Agency::SocialSecurity));
        names.add_registration(reg(&stage, d(1981, 1, 1), Agency::SocialSecurity));
        names.add_registration(reg(&stage, d(1981, 2, 1), Agency::MotorVehicles));
        names.add_registration(reg(&pen, d(1991, 1, 1), Agency::CountyClerk));
        let (birth_id, stage_id, pen_id) = (birth.id.clone(), stage.id.clone(), pen.id.clone());
        names.add_name(birth);
        names.add_name(stage);
        names.add_name(pen);

        let as_of = d(2000, 1, 1);
        assert_eq!(names.status_as_of(&birth_id, as_of).unwrap(), NameStatus::Legal);
        assert_eq!(names.status_as_of(&stage_id, as_of).unwrap(), NameStatus::Superseded);
        assert_eq!(names.status_as_of(&pen_id, as_of).unwrap(), NameStatus::ProperPseudonym);
        assert_eq!(names.legal_name(as_of).unwrap().id, birth_id);

        let current: Vec<&str> = names.all_names_for(as_of).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(current, vec![pen_id.as_str(), birth_id.as_str()]);

        // Before the pen name was registered the stage name was the latest registered
        assert_eq!(names.status_as_of(&stage_id, d(1990, 6, 1)).unwrap(), NameStatus::Legal);
    }

    #[test]
    fn test_clean_fills_and_checks_registration_date() {
        let mut n = name("p1", d(2001, 1, 1), "Hopper", NameMethod::Court, 1);
        let regs = vec![
            reg(&n, d(2001, 3, 1), Agency::MotorVehicles),
            reg(&n, d(2001, 2, 1), Agency::SocialSecurity),
        ];

        n.clean(&regs).unwrap();
        assert_eq!(n.date_registered, Some(d(2001, 2, 1)));

        n.date_registered = Some(d(2001, 3, 1));
        let err = n.clean(&regs).unwrap_err();
        assert_eq!(err.validation_errors()[0].field, "date_registered");

        n.date_registered = Some(d(2001, 3, 1));
        let err = n.clean(&[]).unwrap_err();
        assert!(err.validation_errors()[0].message.starts_with("First enter some registrations"));

        n.date_registered = None;
        assert!(n.clean(&[]).is_ok());
        assert_eq!(n.date_registered, None);
    }

    #[test]
    fn test_nickname_as_of() {
        let nicks = vec![
            Nick::new("p1", d(2000, 1, 1), "Ace"),
            Nick::stopped("p1", d(2005, 1, 1)),
            Nick::new("p1", d(2010, 1, 1), "Doc"),
        ];
        assert_eq!(nickname_as_of(&nicks, d(1999, 1, 1)), None);
        assert_eq!(nickname_as_of(&nicks, d(2000, 1, 1)), Some("Ace"));
        assert_eq!(nickname_as_of(&nicks, d(2007, 1, 1)), None);
        assert_eq!(nickname_as_of(&nicks, d(2010, 1, 1)), Some("Doc"));
    }
}
