// Places - land, the buildings on it, and the units inside them

pub mod building;
pub mod estate;
pub mod unit;

pub use building::{building_name_as_of, Building, BuildingName};
pub use estate::{is_postal_code, is_zip_code, Estate};
pub use unit::{PropertyRef, Unit};
