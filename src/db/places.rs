// Places persistence: land, buildings, building names, units

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use super::{
    date_text, ensure_exists, get_by_id, insert_fact, insert_record, opt_date_col, opt_date_text,
    query_all, FactKey,
};
use crate::error::Result;
use crate::places::{Building, BuildingName, Estate, PropertyRef, Unit};

// ============================================================================
// ESTATES
// ============================================================================

pub fn insert_estate(conn: &Connection, estate: &Estate) -> Result<i64> {
    estate.validate()?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO estates (
            id, tax_parcel_number, tax_property_description, address, city, state, zip_code
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            estate.id,
            estate.tax_parcel_number,
            estate.tax_property_description,
            estate.address,
            estate.city,
            estate.state,
            estate.zip_code,
        ],
    );
    insert_record(conn, "estate", &estate.id, estate, insert)
}

pub fn get_estate(conn: &Connection, id: &str) -> Result<Estate> {
    get_by_id(
        conn,
        "estate",
        "SELECT seq, id, tax_parcel_number, tax_property_description, address, city, state, zip_code
         FROM estates WHERE id = ?1",
        id,
        |row| {
            Ok(Estate {
                seq: row.get(0)?,
                id: row.get(1)?,
                tax_parcel_number: row.get(2)?,
                tax_property_description: row.get(3)?,
                address: row.get(4)?,
                city: row.get(5)?,
                state: row.get(6)?,
                zip_code: row.get(7)?,
            })
        },
    )
}

// ============================================================================
// BUILDINGS
// ============================================================================

pub fn insert_building(conn: &Connection, building: &Building) -> Result<i64> {
    building.validate()?;
    ensure_exists(conn, "estate", "estates", &building.estate_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO buildings (
            id, estate_id, date, building_area, bedrooms, bathrooms, partial_bathrooms,
            rooms, pool, fire_place, type_construction, number_of_stories, style,
            basement, roof_cover, foundation, elevator
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            building.id,
            building.estate_id,
            opt_date_text(building.date),
            building.building_area,
            building.bedrooms,
            building.bathrooms,
            building.partial_bathrooms,
            building.rooms,
            building.pool,
            building.fire_place,
            building.type_construction,
            building.number_of_stories,
            building.style,
            building.basement,
            building.roof_cover,
            building.foundation,
            building.elevator,
        ],
    );
    insert_record(conn, "building", &building.id, building, insert)
}

const BUILDING_COLUMNS: &str = "seq, id, estate_id, date, building_area, bedrooms, bathrooms,
    partial_bathrooms, rooms, pool, fire_place, type_construction, number_of_stories, style,
    basement, roof_cover, foundation, elevator";

fn building_from_row(row: &Row<'_>) -> rusqlite::Result<Building> {
    Ok(Building {
        seq: row.get(0)?,
        id: row.get(1)?,
        estate_id: row.get(2)?,
        date: opt_date_col(row, 3)?,
        building_area: row.get(4)?,
        bedrooms: row.get(5)?,
        bathrooms: row.get(6)?,
        partial_bathrooms: row.get(7)?,
        rooms: row.get(8)?,
        pool: row.get(9)?,
        fire_place: row.get(10)?,
        type_construction: row.get(11)?,
        number_of_stories: row.get(12)?,
        style: row.get(13)?,
        basement: row.get(14)?,
        roof_cover: row.get(15)?,
        foundation: row.get(16)?,
        elevator: row.get(17)?,
    })
}

pub fn get_building(conn: &Connection, id: &str) -> Result<Building> {
    get_by_id(
        conn,
        "building",
        &format!("SELECT {} FROM buildings WHERE id = ?1", BUILDING_COLUMNS),
        id,
        building_from_row,
    )
}

pub fn get_buildings_on_estate(conn: &Connection, estate_id: &str) -> Result<Vec<Building>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM buildings WHERE estate_id = ?1 ORDER BY seq",
            BUILDING_COLUMNS
        ),
        estate_id,
        building_from_row,
    )
}

pub fn insert_building_name(conn: &Connection, name: &BuildingName) -> Result<i64> {
    name.validate()?;
    ensure_exists(conn, "building", "buildings", &name.building_id)?;
    let date = opt_date_text(name.date);
    let key = FactKey::new(&[&name.building_id, date.as_deref().unwrap_or("")], &[&name.name]);
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO building_names (id, slot, fingerprint, building_id, date, name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![name.id, key.slot, key.fingerprint, name.building_id, date, name.name],
    );
    insert_fact(conn, "building_name", "building_names", &key, &name.id, name, insert)
}

pub fn get_building_names(conn: &Connection, building_id: &str) -> Result<Vec<BuildingName>> {
    query_all(
        conn,
        "SELECT seq, id, building_id, date, name FROM building_names
         WHERE building_id = ?1 ORDER BY seq",
        building_id,
        |row| {
            Ok(BuildingName {
                seq: row.get(0)?,
                id: row.get(1)?,
                building_id: row.get(2)?,
                date: opt_date_col(row, 3)?,
                name: row.get(4)?,
            })
        },
    )
}

pub fn get_building_name_as_of(
    conn: &Connection,
    building_id: &str,
    as_of: NaiveDate,
) -> Result<Option<String>> {
    let names = get_building_names(conn, building_id)?;
    Ok(crate::places::building_name_as_of(&names, as_of).map(str::to_string))
}

// ============================================================================
// UNITS
// ============================================================================

/// `NotFound` unless the land or building behind `property` exists
pub fn ensure_property(conn: &Connection, property: &PropertyRef) -> Result<()> {
    match property {
        PropertyRef::Land(id) => ensure_exists(conn, "estate", "estates", id),
        PropertyRef::Building(id) => ensure_exists(conn, "building", "buildings", id),
    }
}

pub fn insert_unit(conn: &Connection, unit: &Unit) -> Result<i64> {
    unit.validate()?;
    ensure_property(conn, &unit.property)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO units (id, property_kind, property_id, label, bedrooms, bathrooms)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            unit.id,
            unit.property.kind(),
            unit.property.id(),
            unit.label,
            unit.bedrooms,
            unit.bathrooms,
        ],
    );
    insert_record(conn, "unit", &unit.id, unit, insert)
}

fn unit_from_row(row: &Row<'_>) -> rusqlite::Result<Unit> {
    let kind: String = row.get(2)?;
    let property_id: String = row.get(3)?;
    let property = PropertyRef::from_parts(&kind, property_id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Unit {
        seq: row.get(0)?,
        id: row.get(1)?,
        property,
        label: row.get(4)?,
        bedrooms: row.get(5)?,
        bathrooms: row.get(6)?,
    })
}

pub fn get_unit(conn: &Connection, id: &str) -> Result<Unit> {
    get_by_id(
        conn,
        "unit",
        "SELECT seq, id, property_kind, property_id, label, bedrooms, bathrooms
         FROM units WHERE id = ?1",
        id,
        unit_from_row,
    )
}

pub fn get_units_for_property(conn: &Connection, property: &PropertyRef) -> Result<Vec<Unit>> {
    let mut stmt = conn.prepare(
        "SELECT seq, id, property_kind, property_id, label, bedrooms, bathrooms
         FROM units WHERE property_kind = ?1 AND property_id = ?2 ORDER BY seq",
    )?;
    let units = stmt
        .query_map(params![property.kind(), property.id()], unit_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(units)
}
