// Dwellings - who owns, occupies and pays for a property over time
//
// Every log here is append-only and keyed by (subject, date). The resolver in
// `temporal` answers "as of" questions for all of them.

pub mod owners;
pub mod rates;
pub mod shares;
pub mod transfers;

pub use owners::{EntityKind, LegalEntity, Owner, Party};
pub use rates::{rate_as_of, PayerType, Rate, RateKind, RentFrequency};
pub use shares::{histories_by_holder, holders_as_of, ownership_fraction, ShareTransfer};
pub use transfers::{
    holdings_as_of, is_landlord, occupant_as_of, owner_as_of, OccupantTransfer, PropTransfer,
};
