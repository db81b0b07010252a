// Dwellings persistence: owners, ownership and occupancy logs, rates, shares
//
// As-of queries load the subject's whole history and hand it to the same
// resolver the in-memory types use.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::places::{ensure_property, get_units_for_property};
use super::{
    code_col, date_col, date_text, decimal_col, ensure_exists, get_by_id, insert_fact,
    insert_record, opt_date_col, opt_date_text, query_all, FactKey,
};
use crate::dwellings::{
    self, EntityKind, LegalEntity, OccupantTransfer, Owner, Party, PayerType, PropTransfer, Rate,
    RateKind, RentFrequency, ShareTransfer,
};
use crate::error::Result;
use crate::places::PropertyRef;
use crate::temporal::{FactHistory, Snapshot};

// ============================================================================
// LEGAL ENTITIES & OWNERS
// ============================================================================

pub fn insert_legal_entity(conn: &Connection, entity: &LegalEntity) -> Result<i64> {
    entity.validate()?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO legal_entities (id, name, kind, formed) VALUES (?1, ?2, ?3, ?4)",
        params![entity.id, entity.name, entity.kind.code(), opt_date_text(entity.formed)],
    );
    insert_record(conn, "legal_entity", &entity.id, entity, insert)
}

pub fn get_legal_entity(conn: &Connection, id: &str) -> Result<LegalEntity> {
    get_by_id(
        conn,
        "legal entity",
        "SELECT seq, id, name, kind, formed FROM legal_entities WHERE id = ?1",
        id,
        |row| {
            Ok(LegalEntity {
                seq: row.get(0)?,
                id: row.get(1)?,
                name: row.get(2)?,
                kind: code_col(row, 3, EntityKind::from_code)?,
                formed: opt_date_col(row, 4)?,
            })
        },
    )
}

pub fn insert_owner(conn: &Connection, owner: &Owner) -> Result<i64> {
    owner.validate()?;
    match &owner.party {
        Party::Person(id) => ensure_exists(conn, "person", "people", id)?,
        Party::Entity(id) => ensure_exists(conn, "legal entity", "legal_entities", id)?,
    }
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO owners (id, party_kind, party_id) VALUES (?1, ?2, ?3)",
        params![owner.id, owner.party.kind(), owner.party.id()],
    );
    insert_record(conn, "owner", &owner.id, owner, insert)
}

fn owner_from_row(row: &Row<'_>) -> rusqlite::Result<Owner> {
    let kind: String = row.get(2)?;
    let party_id: String = row.get(3)?;
    let party = Party::from_parts(&kind, party_id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Owner {
        seq: row.get(0)?,
        id: row.get(1)?,
        party,
    })
}

pub fn get_owner(conn: &Connection, id: &str) -> Result<Owner> {
    get_by_id(
        conn,
        "owner",
        "SELECT seq, id, party_kind, party_id FROM owners WHERE id = ?1",
        id,
        owner_from_row,
    )
}

// ============================================================================
// PROPERTY TRANSFERS
// ============================================================================

pub fn insert_prop_transfer(conn: &Connection, transfer: &PropTransfer) -> Result<i64> {
    transfer.validate()?;
    ensure_exists(conn, "owner", "owners", &transfer.owner_id)?;
    ensure_property(conn, &transfer.property)?;

    let date = date_text(transfer.date);
    let price = transfer.price.normalize().to_string();
    let key = FactKey::new(
        &[transfer.property.kind(), transfer.property.id(), &date],
        &[&transfer.owner_id, &price],
    );
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO prop_transfers (id, slot, fingerprint, owner_id, property_kind, property_id, date, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            transfer.id,
            key.slot,
            key.fingerprint,
            transfer.owner_id,
            transfer.property.kind(),
            transfer.property.id(),
            date,
            transfer.price.to_string(),
        ],
    );
    insert_fact(conn, "prop_transfer", "prop_transfers", &key, &transfer.id, transfer, insert)
}

fn prop_transfer_from_row(row: &Row<'_>) -> rusqlite::Result<PropTransfer> {
    let kind: String = row.get(3)?;
    let property_id: String = row.get(4)?;
    let property = PropertyRef::from_parts(&kind, property_id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PropTransfer {
        seq: row.get(0)?,
        id: row.get(1)?,
        owner_id: row.get(2)?,
        property,
        date: date_col(row, 5)?,
        price: decimal_col(row, 6)?,
    })
}

/// Ownership log of one property in entry order
pub fn get_property_history(
    conn: &Connection,
    property: &PropertyRef,
) -> Result<FactHistory<PropTransfer>> {
    let mut stmt = conn.prepare(
        "SELECT seq, id, owner_id, property_kind, property_id, date, price
         FROM prop_transfers WHERE property_kind = ?1 AND property_id = ?2 ORDER BY seq",
    )?;
    let transfers = stmt
        .query_map(params![property.kind(), property.id()], prop_transfer_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(FactHistory::from_facts(property.to_string(), transfers))
}

/// Owner of `property` on `as_of`
pub fn get_owner_as_of(conn: &Connection, property: &PropertyRef, as_of: NaiveDate) -> Result<Owner> {
    let history = get_property_history(conn, property)?;
    let owner_id = dwellings::owner_as_of(&history, as_of)?;
    debug!(property = %property, %as_of, owner_id, "resolved owner");
    get_owner(conn, owner_id)
}

/// Histories of every property the owner has ever held
fn histories_touching_owner(conn: &Connection, owner_id: &str) -> Result<Vec<FactHistory<PropTransfer>>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT property_kind, property_id FROM prop_transfers WHERE owner_id = ?1",
    )?;
    let properties = stmt
        .query_map(params![owner_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    properties
        .into_iter()
        .map(|(kind, id)| {
            let property = PropertyRef::from_parts(&kind, id)?;
            get_property_history(conn, &property)
        })
        .collect()
}

/// Properties the owner holds on `as_of`
pub fn get_holdings_as_of(conn: &Connection, owner_id: &str, as_of: NaiveDate) -> Result<Vec<PropertyRef>> {
    ensure_exists(conn, "owner", "owners", owner_id)?;
    let histories = histories_touching_owner(conn, owner_id)?;
    Ok(dwellings::holdings_as_of(owner_id, &histories, as_of)
        .into_iter()
        .cloned()
        .collect())
}

/// True if the owner holds, on `as_of`, a property with at least one unit
pub fn is_landlord_as_of(conn: &Connection, owner_id: &str, as_of: NaiveDate) -> Result<bool> {
    ensure_exists(conn, "owner", "owners", owner_id)?;
    let histories = histories_touching_owner(conn, owner_id)?;
    let mut units = Vec::new();
    for history in &histories {
        if let Some(transfer) = history.latest() {
            units.extend(get_units_for_property(conn, &transfer.property)?);
        }
    }
    Ok(dwellings::is_landlord(owner_id, &histories, &units, as_of))
}

// ============================================================================
// OCCUPANT TRANSFERS
// ============================================================================

pub fn insert_occupant_transfer(conn: &Connection, transfer: &OccupantTransfer) -> Result<i64> {
    transfer.validate()?;
    ensure_exists(conn, "unit", "units", &transfer.unit_id)?;
    if let Some(occupant) = &transfer.occupant_id {
        ensure_exists(conn, "person", "people", occupant)?;
    }
    let date = date_text(transfer.date);
    let key = FactKey::new(
        &[&transfer.unit_id, &date],
        &[transfer.occupant_id.as_deref().unwrap_or("")],
    );
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO occupant_transfers (id, slot, fingerprint, unit_id, occupant_id, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![transfer.id, key.slot, key.fingerprint, transfer.unit_id, transfer.occupant_id, date],
    );
    insert_fact(conn, "occupant_transfer", "occupant_transfers", &key, &transfer.id, transfer, insert)
}

pub fn get_occupancy_history(conn: &Connection, unit_id: &str) -> Result<FactHistory<OccupantTransfer>> {
    let transfers = query_all(
        conn,
        "SELECT seq, id, unit_id, occupant_id, date FROM occupant_transfers
         WHERE unit_id = ?1 ORDER BY seq",
        unit_id,
        |row| {
            Ok(OccupantTransfer {
                seq: row.get(0)?,
                id: row.get(1)?,
                unit_id: row.get(2)?,
                occupant_id: row.get(3)?,
                date: date_col(row, 4)?,
            })
        },
    )?;
    Ok(FactHistory::from_facts(unit_id, transfers))
}

/// Person living in the unit on `as_of`; `Ok(None)` when it stood vacant
pub fn get_occupant_as_of(conn: &Connection, unit_id: &str, as_of: NaiveDate) -> Result<Option<String>> {
    let history = get_occupancy_history(conn, unit_id)?;
    let occupant = dwellings::occupant_as_of(&history, as_of)?;
    Ok(occupant.map(str::to_string))
}

// ============================================================================
// RATES
// ============================================================================

pub fn insert_rate(conn: &Connection, rate: &Rate) -> Result<i64> {
    rate.validate()?;
    ensure_exists(conn, "unit", "units", &rate.unit_id)?;
    let date = date_text(rate.date);
    let payer = rate.payer_type.map(|p| p.code());
    let key = FactKey::new(
        &[&rate.unit_id, rate.kind.code(), &date],
        &[
            &rate.amount.normalize().to_string(),
            rate.frequency.code(),
            payer.unwrap_or(""),
        ],
    );
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO rates (id, slot, fingerprint, unit_id, kind, date, amount, frequency, payer_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            rate.id,
            key.slot,
            key.fingerprint,
            rate.unit_id,
            rate.kind.code(),
            date,
            rate.amount.to_string(),
            rate.frequency.code(),
            payer,
        ],
    );
    insert_fact(conn, "rate", "rates", &key, &rate.id, rate, insert)
}

fn rate_from_row(row: &Row<'_>) -> rusqlite::Result<Rate> {
    let payer: Option<String> = row.get(7)?;
    let payer_type = payer
        .map(|code| PayerType::from_code(&code))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(Rate {
        seq: row.get(0)?,
        id: row.get(1)?,
        unit_id: row.get(2)?,
        kind: code_col(row, 3, RateKind::from_code)?,
        date: date_col(row, 4)?,
        amount: decimal_col(row, 5)?,
        frequency: code_col(row, 6, RentFrequency::from_code)?,
        payer_type,
    })
}

/// Every rate row of a unit, all kinds, in entry order
pub fn get_rates(conn: &Connection, unit_id: &str) -> Result<Vec<Rate>> {
    query_all(
        conn,
        "SELECT seq, id, unit_id, kind, date, amount, frequency, payer_type
         FROM rates WHERE unit_id = ?1 ORDER BY seq",
        unit_id,
        rate_from_row,
    )
}

pub fn get_rate_as_of(conn: &Connection, unit_id: &str, kind: RateKind, as_of: NaiveDate) -> Result<Rate> {
    let rates = get_rates(conn, unit_id)?;
    match dwellings::rate_as_of(&rates, kind, as_of) {
        Ok(rate) => Ok(rate.clone()),
        // an empty log has no unit id to name, so report it here
        Err(crate::error::RecordError::DoesNotExist { kind, as_of, .. }) => {
            Err(crate::error::RecordError::DoesNotExist {
                kind,
                subject: unit_id.to_string(),
                as_of,
            })
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// SHARE TRANSFERS
// ============================================================================

pub fn insert_share_transfer(conn: &Connection, transfer: &ShareTransfer) -> Result<i64> {
    transfer.validate()?;
    ensure_exists(conn, "legal entity", "legal_entities", &transfer.entity_id)?;
    ensure_exists(conn, "owner", "owners", &transfer.holder_id)?;
    let date = date_text(transfer.date);
    let key = FactKey::new(
        &[&transfer.entity_id, &transfer.holder_id, &date],
        &[&transfer.shares.to_string()],
    );
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO share_transfers (id, slot, fingerprint, entity_id, holder_id, date, shares)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            transfer.id,
            key.slot,
            key.fingerprint,
            transfer.entity_id,
            transfer.holder_id,
            date,
            transfer.shares,
        ],
    );
    insert_fact(conn, "share_transfer", "share_transfers", &key, &transfer.id, transfer, insert)
}

pub fn get_share_transfers(conn: &Connection, entity_id: &str) -> Result<Vec<ShareTransfer>> {
    query_all(
        conn,
        "SELECT seq, id, entity_id, holder_id, date, shares FROM share_transfers
         WHERE entity_id = ?1 ORDER BY seq",
        entity_id,
        |row| {
            Ok(ShareTransfer {
                seq: row.get(0)?,
                id: row.get(1)?,
                entity_id: row.get(2)?,
                holder_id: row.get(3)?,
                date: date_col(row, 4)?,
                shares: row.get(5)?,
            })
        },
    )
}

/// Holders with a positive position on `as_of`, keyed by owner id
pub fn get_holders_as_of(conn: &Connection, entity_id: &str, as_of: NaiveDate) -> Result<Snapshot<i64>> {
    ensure_exists(conn, "legal entity", "legal_entities", entity_id)?;
    let transfers = get_share_transfers(conn, entity_id)?;
    Ok(dwellings::holders_as_of(&transfers, as_of))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_building, insert_estate, insert_person, insert_unit, open_in_memory};
    use crate::error::RecordError;
    use crate::people::Person;
    use crate::places::{Building, Estate, Unit};
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    struct Fixture {
        conn: Connection,
        land: PropertyRef,
        house: PropertyRef,
        unit: Unit,
        alice: Owner,
        bob: Owner,
        tenant: Person,
    }

    fn fixture() -> Fixture {
        let conn = open_in_memory().unwrap();
        let estate = Estate::new("12 Elm St", "Joplin", "MO", "64801");
        insert_estate(&conn, &estate).unwrap();
        let building = Building::new(&estate.id);
        insert_building(&conn, &building).unwrap();
        let house = PropertyRef::Building(building.id.clone());
        let unit = Unit::new(house.clone(), "Apt 1");
        insert_unit(&conn, &unit).unwrap();

        let mut people = Vec::new();
        for _ in 0..3 {
            let person = Person::new();
            insert_person(&conn, &person).unwrap();
            people.push(person);
        }
        let alice = Owner::person(&people[0].id);
        let bob = Owner::person(&people[1].id);
        insert_owner(&conn, &alice).unwrap();
        insert_owner(&conn, &bob).unwrap();

        Fixture {
            conn,
            land: PropertyRef::Land(estate.id),
            house,
            unit,
            alice,
            bob,
            tenant: people.remove(2),
        }
    }

    #[test]
    fn test_owner_as_of() {
        let f = fixture();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.alice.id, f.house.clone(), d(1990, 4, 1), money("50000"))).unwrap();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.bob.id, f.house.clone(), d(2004, 9, 15), money("95000.50"))).unwrap();

        assert!(get_owner_as_of(&f.conn, &f.house, d(1990, 3, 31)).unwrap_err().is_missing());
        assert_eq!(get_owner_as_of(&f.conn, &f.house, d(2004, 9, 14)).unwrap().id, f.alice.id);
        assert_eq!(get_owner_as_of(&f.conn, &f.house, d(2004, 9, 15)).unwrap().id, f.bob.id);

        let history = get_property_history(&f.conn, &f.house).unwrap();
        assert_eq!(history.latest().unwrap().price, money("95000.50"));
    }

    #[test]
    fn test_same_day_transfers_resolve_to_later_entry() {
        let f = fixture();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.alice.id, f.land.clone(), d(2010, 1, 1), money("1"))).unwrap();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.bob.id, f.land.clone(), d(2010, 1, 1), money("1"))).unwrap();
        assert_eq!(get_owner_as_of(&f.conn, &f.land, d(2010, 1, 1)).unwrap().id, f.bob.id);
    }

    #[test]
    fn test_duplicate_transfer() {
        let f = fixture();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.alice.id, f.land.clone(), d(2010, 1, 1), money("100"))).unwrap();
        let err = insert_prop_transfer(&f.conn, &PropTransfer::new(&f.alice.id, f.land.clone(), d(2010, 1, 1), money("100.00")))
            .unwrap_err();
        assert!(matches!(err, RecordError::Duplicate { kind: "prop_transfer" }));
    }

    #[test]
    fn test_same_day_correction_back_to_earlier_value() {
        let f = fixture();
        let day = d(2020, 1, 1);
        insert_occupant_transfer(&f.conn, &OccupantTransfer::move_in(&f.unit.id, &f.tenant.id, day)).unwrap();
        insert_occupant_transfer(&f.conn, &OccupantTransfer::vacate(&f.unit.id, day)).unwrap();
        assert_eq!(get_occupant_as_of(&f.conn, &f.unit.id, day).unwrap(), None);

        // vacating was a mistake: the tenant is re-entered for the same day
        insert_occupant_transfer(&f.conn, &OccupantTransfer::move_in(&f.unit.id, &f.tenant.id, day)).unwrap();
        assert_eq!(get_occupant_as_of(&f.conn, &f.unit.id, day).unwrap(), Some(f.tenant.id.clone()));
        assert_eq!(get_occupancy_history(&f.conn, &f.unit.id).unwrap().len(), 3);

        // restating what is already in effect is still a duplicate
        let err = insert_occupant_transfer(&f.conn, &OccupantTransfer::move_in(&f.unit.id, &f.tenant.id, day))
            .unwrap_err();
        assert!(matches!(err, RecordError::Duplicate { kind: "occupant_transfer" }));

        insert_rate(&f.conn, &Rate::new(&f.unit.id, RateKind::UnitRate, day, money("700"))).unwrap();
        insert_rate(&f.conn, &Rate::new(&f.unit.id, RateKind::UnitRate, day, money("750"))).unwrap();
        insert_rate(&f.conn, &Rate::new(&f.unit.id, RateKind::UnitRate, day, money("700"))).unwrap();
        assert_eq!(get_rate_as_of(&f.conn, &f.unit.id, RateKind::UnitRate, day).unwrap().amount, money("700"));
    }

    #[test]
    fn test_failed_insert_leaves_no_row() {
        let f = fixture();
        f.conn
            .execute_batch(
                "CREATE TRIGGER audit_offline BEFORE INSERT ON events
                 BEGIN SELECT RAISE(ABORT, 'audit offline'); END;",
            )
            .unwrap();

        let move_in = OccupantTransfer::move_in(&f.unit.id, &f.tenant.id, d(2020, 1, 1));
        assert!(insert_occupant_transfer(&f.conn, &move_in).is_err());
        assert!(get_occupancy_history(&f.conn, &f.unit.id).unwrap().is_empty());

        f.conn.execute_batch("DROP TRIGGER audit_offline").unwrap();
        insert_occupant_transfer(&f.conn, &move_in).unwrap();
        assert_eq!(get_occupancy_history(&f.conn, &f.unit.id).unwrap().len(), 1);
    }

    #[test]
    fn test_landlord_follows_holdings() {
        let f = fixture();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.alice.id, f.house.clone(), d(2000, 1, 1), money("1"))).unwrap();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.alice.id, f.land.clone(), d(2000, 1, 1), money("1"))).unwrap();
        insert_prop_transfer(&f.conn, &PropTransfer::new(&f.bob.id, f.house.clone(), d(2008, 1, 1), money("1"))).unwrap();

        assert!(is_landlord_as_of(&f.conn, &f.alice.id, d(2007, 12, 31)).unwrap());
        assert!(!is_landlord_as_of(&f.conn, &f.alice.id, d(2008, 1, 1)).unwrap());
        assert!(is_landlord_as_of(&f.conn, &f.bob.id, d(2008, 1, 1)).unwrap());
        assert_eq!(get_holdings_as_of(&f.conn, &f.alice.id, d(2009, 1, 1)).unwrap(), vec![f.land.clone()]);
    }

    #[test]
    fn test_occupancy() {
        let f = fixture();
        insert_occupant_transfer(&f.conn, &OccupantTransfer::move_in(&f.unit.id, &f.tenant.id, d(2018, 6, 1))).unwrap();
        insert_occupant_transfer(&f.conn, &OccupantTransfer::vacate(&f.unit.id, d(2020, 5, 31))).unwrap();

        assert!(get_occupant_as_of(&f.conn, &f.unit.id, d(2018, 5, 1)).unwrap_err().is_missing());
        assert_eq!(get_occupant_as_of(&f.conn, &f.unit.id, d(2019, 1, 1)).unwrap(), Some(f.tenant.id.clone()));
        assert_eq!(get_occupant_as_of(&f.conn, &f.unit.id, d(2021, 1, 1)).unwrap(), None);

        let stranger = OccupantTransfer::move_in(&f.unit.id, "nobody", d(2021, 1, 1));
        assert!(insert_occupant_transfer(&f.conn, &stranger).unwrap_err().is_missing());
    }

    #[test]
    fn test_rates() {
        let f = fixture();
        insert_rate(&f.conn, &Rate::new(&f.unit.id, RateKind::UnitRate, d(2019, 1, 1), money("750"))).unwrap();
        insert_rate(&f.conn, &Rate::new(&f.unit.id, RateKind::UnitRate, d(2021, 1, 1), money("800"))).unwrap();
        insert_rate(
            &f.conn,
            &Rate::new(&f.unit.id, RateKind::PayRate, d(2019, 1, 1), money("300")).paid_by(PayerType::Agency),
        )
        .unwrap();

        assert_eq!(get_rate_as_of(&f.conn, &f.unit.id, RateKind::UnitRate, d(2020, 6, 1)).unwrap().amount, money("750"));
        assert_eq!(get_rate_as_of(&f.conn, &f.unit.id, RateKind::UnitRate, d(2021, 1, 1)).unwrap().amount, money("800"));
        let pay = get_rate_as_of(&f.conn, &f.unit.id, RateKind::PayRate, d(2020, 1, 1)).unwrap();
        assert_eq!(pay.payer_type, Some(PayerType::Agency));

        let err = get_rate_as_of(&f.conn, &f.unit.id, RateKind::SubletRate, d(2020, 1, 1)).unwrap_err();
        assert!(err.to_string().contains(&f.unit.id));
    }

    #[test]
    fn test_share_holders() {
        let f = fixture();
        let llc = LegalEntity::new("Elm Holdings LLC", EntityKind::Llc);
        insert_legal_entity(&f.conn, &llc).unwrap();
        assert_eq!(get_legal_entity(&f.conn, &llc.id).unwrap().kind, EntityKind::Llc);

        insert_share_transfer(&f.conn, &ShareTransfer::new(&llc.id, &f.alice.id, d(2010, 1, 1), 100)).unwrap();
        insert_share_transfer(&f.conn, &ShareTransfer::new(&llc.id, &f.bob.id, d(2012, 1, 1), 40)).unwrap();
        insert_share_transfer(&f.conn, &ShareTransfer::new(&llc.id, &f.alice.id, d(2012, 1, 1), 60)).unwrap();
        insert_share_transfer(&f.conn, &ShareTransfer::new(&llc.id, &f.alice.id, d(2015, 1, 1), 0)).unwrap();

        let holders = get_holders_as_of(&f.conn, &llc.id, d(2013, 1, 1)).unwrap();
        assert_eq!(holders.get(&f.alice.id), Some(&60));
        assert_eq!(holders.get(&f.bob.id), Some(&40));

        let later = get_holders_as_of(&f.conn, &llc.id, d(2016, 1, 1)).unwrap();
        assert_eq!(later.count(), 1);
        assert!(later.get(&f.alice.id).is_none());

        // an entity can itself be an owner
        let llc_owner = Owner::entity(&llc.id);
        insert_owner(&f.conn, &llc_owner).unwrap();
        assert_eq!(get_owner(&f.conn, &llc_owner.id).unwrap().party, Party::Entity(llc.id.clone()));
    }
}
