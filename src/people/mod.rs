// People - identity, names, documents, contacts and incidental records
//
// A Person is only an identity anchor. Everything that can change about
// them is a dated record pointing back at that identity.

pub mod contact;
pub mod documents;
pub mod incidents;
pub mod names;
pub mod person;

pub use contact::{normalize_us_phone, phones_on, Email, Phone, Profile};
pub use documents::IdDoc;
pub use incidents::{convictions_as_of, latest_dose, Conviction, Immunization, PetLicense};
pub use names::{
    nickname_as_of, Agency, NameChange, NameMethod, NameParts, NameRegistration, NameStatus,
    Nick, PersonNames,
};
pub use person::{Ancestry, Person};
