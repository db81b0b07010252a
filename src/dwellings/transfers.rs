// 📜 Transfer logs - append-only ownership and occupancy history
//
// "Current owner" of a property is the owner on the latest transfer dated on
// or before the reference date. Same for the occupant of a unit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};
use crate::places::{PropertyRef, Unit};
use crate::temporal::{Dated, FactHistory};

/// Prices fit 14 digits with 2 after the point
pub(crate) fn check_money(checks: &mut Checks, field: &str, amount: Decimal) {
    if amount.is_sign_negative() && !amount.is_zero() {
        checks.fail(field, "Cannot be negative");
    }
    if amount.round_dp(2) != amount {
        checks.fail(field, "At most 2 decimal places");
    }
    if amount.abs() >= Decimal::from(1_000_000_000_000i64) {
        checks.fail(field, "At most 12 digits before the decimal point");
    }
}

// ============================================================================
// PROPERTY TRANSFER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropTransfer {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub owner_id: String,
    pub property: PropertyRef,
    /// Sale date
    pub date: NaiveDate,
    /// Sale price
    pub price: Decimal,
}

impl PropTransfer {
    pub fn new(owner_id: &str, property: PropertyRef, date: NaiveDate, price: Decimal) -> Self {
        PropTransfer {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            owner_id: owner_id.to_string(),
            property,
            date,
            price,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("PropTransfer");
        checks.required("owner_id", &self.owner_id);
        checks.required("property", self.property.id());
        check_money(&mut checks, "price", self.price);
        checks.finish()
    }
}

impl Dated for PropTransfer {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Owner id of `history`'s property on `as_of`
pub fn owner_as_of(history: &FactHistory<PropTransfer>, as_of: NaiveDate) -> Result<&str> {
    history
        .resolve("owner", as_of)
        .map(|transfer| transfer.owner_id.as_str())
}

/// Properties held by `owner_id` on `as_of`
pub fn holdings_as_of<'a>(
    owner_id: &str,
    histories: &'a [FactHistory<PropTransfer>],
    as_of: NaiveDate,
) -> Vec<&'a PropertyRef> {
    histories
        .iter()
        .filter_map(|h| h.as_of(as_of))
        .filter(|transfer| transfer.owner_id == owner_id)
        .map(|transfer| &transfer.property)
        .collect()
}

/// True if the owner holds, on `as_of`, a property that has rental units
pub fn is_landlord(
    owner_id: &str,
    histories: &[FactHistory<PropTransfer>],
    units: &[Unit],
    as_of: NaiveDate,
) -> bool {
    holdings_as_of(owner_id, histories, as_of)
        .into_iter()
        .any(|property| units.iter().any(|unit| &unit.property == property))
}

// ============================================================================
// OCCUPANT TRANSFER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupantTransfer {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub unit_id: String,
    /// Person moving in; `None` records the unit becoming vacant
    pub occupant_id: Option<String>,
    pub date: NaiveDate,
}

impl OccupantTransfer {
    pub fn move_in(unit_id: &str, occupant_id: &str, date: NaiveDate) -> Self {
        OccupantTransfer {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            unit_id: unit_id.to_string(),
            occupant_id: Some(occupant_id.to_string()),
            date,
        }
    }

    pub fn vacate(unit_id: &str, date: NaiveDate) -> Self {
        OccupantTransfer {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            unit_id: unit_id.to_string(),
            occupant_id: None,
            date,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("OccupantTransfer");
        checks.required("unit_id", &self.unit_id);
        if let Some(occupant) = &self.occupant_id {
            checks.required("occupant_id", occupant);
        }
        checks.finish()
    }
}

impl Dated for OccupantTransfer {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Occupant of the unit on `as_of`. `Ok(None)` means vacant; no history at
/// all is `DoesNotExist`.
pub fn occupant_as_of(
    history: &FactHistory<OccupantTransfer>,
    as_of: NaiveDate,
) -> Result<Option<&str>> {
    history
        .resolve("occupant", as_of)
        .map(|transfer| transfer.occupant_id.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn lot(id: &str) -> PropertyRef {
        PropertyRef::Land(id.to_string())
    }

    #[test]
    fn test_price_checks() {
        assert!(PropTransfer::new("o1", lot("e1"), d(2000, 1, 1), money("125000.00")).validate().is_ok());
        assert!(PropTransfer::new("o1", lot("e1"), d(2000, 1, 1), money("1.005")).validate().is_err());
        assert!(PropTransfer::new("o1", lot("e1"), d(2000, 1, 1), money("-1")).validate().is_err());
        assert!(PropTransfer::new("o1", lot("e1"), d(2000, 1, 1), money("1000000000000")).validate().is_err());
        assert!(PropTransfer::new("o1", lot("e1"), d(2000, 1, 1), money("999999999999.99")).validate().is_ok());
    }

    #[test]
    fn test_owner_as_of() {
        let mut history = FactHistory::new("land:e1");
        history.record(PropTransfer::new("alice", lot("e1"), d(1990, 4, 1), money("50000")));
        history.record(PropTransfer::new("bob", lot("e1"), d(2004, 9, 15), money("95000")));

        assert!(owner_as_of(&history, d(1990, 3, 31)).is_err());
        assert_eq!(owner_as_of(&history, d(1990, 4, 1)).unwrap(), "alice");
        assert_eq!(owner_as_of(&history, d(2004, 9, 14)).unwrap(), "alice");
        assert_eq!(owner_as_of(&history, d(2004, 9, 15)).unwrap(), "bob");
    }

    #[test]
    fn test_is_landlord_follows_holdings() {
        let e1 = FactHistory::from_facts(
            "land:e1",
            vec![
                PropTransfer::new("alice", lot("e1"), d(1990, 1, 1), money("1")),
                PropTransfer::new("bob", lot("e1"), d(2000, 1, 1), money("1")),
            ],
        );
        let e2 = FactHistory::from_facts(
            "land:e2",
            vec![PropTransfer::new("alice", lot("e2"), d(1995, 1, 1), money("1"))],
        );
        let units = vec![Unit::new(lot("e1"), "Lot 1")];
        let histories = vec![e1, e2];

        assert!(is_landlord("alice", &histories, &units, d(1999, 12, 31)));
        assert!(!is_landlord("alice", &histories, &units, d(2000, 1, 1)));
        assert!(is_landlord("bob", &histories, &units, d(2000, 1, 1)));
        let e2_ref = lot("e2");
        assert_eq!(holdings_as_of("alice", &histories, d(2001, 1, 1)), vec![&e2_ref]);
    }

    #[test]
    fn test_occupancy_with_vacancy() {
        let mut history = FactHistory::new("unit-1");
        history.record(OccupantTransfer::move_in("unit-1", "p1", d(2018, 6, 1)));
        history.record(OccupantTransfer::vacate("unit-1", d(2020, 5, 31)));
        history.record(OccupantTransfer::move_in("unit-1", "p2", d(2020, 7, 1)));

        assert!(occupant_as_of(&history, d(2018, 5, 31)).unwrap_err().is_missing());
        assert_eq!(occupant_as_of(&history, d(2019, 1, 1)).unwrap(), Some("p1"));
        assert_eq!(occupant_as_of(&history, d(2020, 6, 15)).unwrap(), None);
        assert_eq!(occupant_as_of(&history, d(2020, 7, 1)).unwrap(), Some("p2"));
    }
}
