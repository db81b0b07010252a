// Civic Records - Core Library
// People, places and dwellings as append-only dated facts, resolved "as of" a date.
// Exposes all modules for use in the API server and tests.

pub mod config;
pub mod db;
pub mod dwellings;
pub mod error;
pub mod logging;
pub mod people;
pub mod places;
pub mod temporal;

// Re-export commonly used types
pub use config::Config;
pub use db::{
    get_events_for_entity, insert_event, open, open_in_memory, setup_database, Event,
};
pub use dwellings::{
    EntityKind, LegalEntity, OccupantTransfer, Owner, Party, PayerType, PropTransfer, Rate,
    RateKind, RentFrequency, ShareTransfer,
};
pub use error::{RecordError, Result, ValidationError};
pub use logging::init_logging;
pub use people::{
    Agency, Ancestry, Conviction, Email, IdDoc, Immunization, NameChange, NameMethod, NameParts,
    NameRegistration, NameStatus, Nick, Person, PersonNames, PetLicense, Phone, Profile,
};
pub use places::{Building, BuildingName, Estate, PropertyRef, Unit};
pub use temporal::{latest_as_of, resolve, Dated, FactHistory, Snapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
