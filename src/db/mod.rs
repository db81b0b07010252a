// 🗄️ SQLite persistence
//
// One table per record type plus the `events` audit log. Rows are inserted,
// never updated or deleted; the one exception is `name_changes.date_registered`
// which follows the registrations as they arrive. Each row and its audit
// event are committed together.
//
// Fact tables carry a `slot` (SHA-256 of the subject and date a fact speaks
// for) and a `fingerprint` (the same plus the fact's content). Restating the
// fact currently in effect for a slot is reported as a duplicate; a later
// correction to a different value, or back to an earlier one, is a new row.

pub mod dwellings;
pub mod people;
pub mod places;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{RecordError, Result};

pub use dwellings::*;
pub use people::*;
pub use places::*;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Who wrote an event when the caller doesn't say
pub const DEFAULT_ACTOR: &str = "records";

// ============================================================================
// CONNECTION
// ============================================================================

/// Open (creating if needed) the database file and make sure the schema exists
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    setup_database(&conn)?;
    info!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(PEOPLE_SCHEMA)?;
    conn.execute_batch(PLACES_SCHEMA)?;
    conn.execute_batch(DWELLINGS_SCHEMA)?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )?;

    Ok(())
}

const PEOPLE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS people (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    hispanic_or_latino INTEGER,
    white_or_caucasian INTEGER,
    european INTEGER,
    middle_eastern INTEGER,
    arab_world_african INTEGER,
    black_african INTEGER,
    american_indian INTEGER,
    eskimo_or_inuit INTEGER,
    asian INTEGER,
    pacific_islander INTEGER,
    hawaiian INTEGER,
    other INTEGER,
    additional_ancestry_information TEXT NOT NULL DEFAULT '',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS nicks (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    name TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_nicks_slot ON nicks(slot, seq);
CREATE INDEX IF NOT EXISTS idx_nicks_person_date ON nicks(person_id, date);

CREATE TABLE IF NOT EXISTS name_changes (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    prime_given_name TEXT NOT NULL,
    other_given_name TEXT NOT NULL,
    first_family_name TEXT NOT NULL,
    second_family_name TEXT NOT NULL,
    use_first INTEGER NOT NULL,
    use_second INTEGER NOT NULL,
    reason TEXT NOT NULL,
    date_registered TEXT,
    method TEXT NOT NULL,
    method_info TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_name_changes_slot ON name_changes(slot, seq);
CREATE INDEX IF NOT EXISTS idx_name_changes_person_date ON name_changes(person_id, date);

CREATE TABLE IF NOT EXISTS name_registrations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    name_change_id TEXT NOT NULL REFERENCES name_changes(id),
    date TEXT NOT NULL,
    registered_with TEXT NOT NULL,
    reg_info TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_name_registrations_slot ON name_registrations(slot, seq);
CREATE INDEX IF NOT EXISTS idx_name_registrations_name ON name_registrations(name_change_id, date);

CREATE TABLE IF NOT EXISTS id_docs (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    name_registration_id TEXT NOT NULL REFERENCES name_registrations(id),
    name_on_id TEXT NOT NULL,
    name TEXT NOT NULL,
    number TEXT NOT NULL,
    date TEXT NOT NULL,
    expire TEXT,
    info TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS phones (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    start_date TEXT,
    end_date TEXT,
    valid_date TEXT NOT NULL,
    invalid_date TEXT,
    phone_number TEXT NOT NULL,
    carrier TEXT NOT NULL,
    private INTEGER NOT NULL,
    belongs INTEGER
);
CREATE INDEX IF NOT EXISTS idx_phones_person ON phones(person_id);

CREATE TABLE IF NOT EXISTS emails (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    addr TEXT NOT NULL,
    term TEXT
);

CREATE TABLE IF NOT EXISTS profiles (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    uri TEXT NOT NULL,
    del_date TEXT
);

CREATE TABLE IF NOT EXISTS convictions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    jurisdiction TEXT NOT NULL,
    offense TEXT NOT NULL,
    case_number TEXT NOT NULL,
    sentence TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS immunizations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    vaccine TEXT NOT NULL,
    dose INTEGER NOT NULL,
    administered_by TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pet_licenses (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    person_id TEXT NOT NULL REFERENCES people(id),
    date TEXT NOT NULL,
    expire TEXT,
    pet_name TEXT NOT NULL,
    species TEXT NOT NULL,
    license_number TEXT NOT NULL,
    jurisdiction TEXT NOT NULL
);
";

const PLACES_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS estates (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    tax_parcel_number TEXT NOT NULL,
    tax_property_description TEXT NOT NULL,
    address TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zip_code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS buildings (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    estate_id TEXT NOT NULL REFERENCES estates(id),
    date TEXT,
    building_area TEXT NOT NULL,
    bedrooms INTEGER,
    bathrooms INTEGER,
    partial_bathrooms INTEGER,
    rooms INTEGER,
    pool TEXT NOT NULL,
    fire_place TEXT NOT NULL,
    type_construction TEXT NOT NULL,
    number_of_stories INTEGER,
    style TEXT NOT NULL,
    basement TEXT NOT NULL,
    roof_cover TEXT NOT NULL,
    foundation TEXT NOT NULL,
    elevator TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS building_names (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    building_id TEXT NOT NULL REFERENCES buildings(id),
    date TEXT,
    name TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_building_names_slot ON building_names(slot, seq);
CREATE INDEX IF NOT EXISTS idx_building_names_building ON building_names(building_id, date);

CREATE TABLE IF NOT EXISTS units (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    property_kind TEXT NOT NULL,
    property_id TEXT NOT NULL,
    label TEXT NOT NULL,
    bedrooms INTEGER,
    bathrooms INTEGER
);
CREATE INDEX IF NOT EXISTS idx_units_property ON units(property_kind, property_id);
";

const DWELLINGS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS legal_entities (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    formed TEXT
);

CREATE TABLE IF NOT EXISTS owners (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    party_kind TEXT NOT NULL,
    party_id TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_owners_party ON owners(party_kind, party_id);

CREATE TABLE IF NOT EXISTS prop_transfers (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    owner_id TEXT NOT NULL REFERENCES owners(id),
    property_kind TEXT NOT NULL,
    property_id TEXT NOT NULL,
    date TEXT NOT NULL,
    price TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_prop_transfers_slot ON prop_transfers(slot, seq);
CREATE INDEX IF NOT EXISTS idx_prop_transfers_property ON prop_transfers(property_kind, property_id, date);
CREATE INDEX IF NOT EXISTS idx_prop_transfers_owner ON prop_transfers(owner_id);

CREATE TABLE IF NOT EXISTS occupant_transfers (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    unit_id TEXT NOT NULL REFERENCES units(id),
    occupant_id TEXT REFERENCES people(id),
    date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_occupant_transfers_slot ON occupant_transfers(slot, seq);
CREATE INDEX IF NOT EXISTS idx_occupant_transfers_unit ON occupant_transfers(unit_id, date);

CREATE TABLE IF NOT EXISTS rates (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    unit_id TEXT NOT NULL REFERENCES units(id),
    kind TEXT NOT NULL,
    date TEXT NOT NULL,
    amount TEXT NOT NULL,
    frequency TEXT NOT NULL,
    payer_type TEXT
);
CREATE INDEX IF NOT EXISTS idx_rates_slot ON rates(slot, seq);
CREATE INDEX IF NOT EXISTS idx_rates_unit_kind ON rates(unit_id, kind, date);

CREATE TABLE IF NOT EXISTS share_transfers (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT UNIQUE NOT NULL,
    slot TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    entity_id TEXT NOT NULL REFERENCES legal_entities(id),
    holder_id TEXT NOT NULL REFERENCES owners(id),
    date TEXT NOT NULL,
    shares INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_share_transfers_slot ON share_transfers(slot, seq);
CREATE INDEX IF NOT EXISTS idx_share_transfers_entity ON share_transfers(entity_id, holder_id, date);
";

// ============================================================================
// AUDIT EVENTS
// ============================================================================

/// Event for audit trail: every insert is an event
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }

    /// `<entity>_recorded` event carrying the full record
    pub fn recorded<T: Serialize>(entity_type: &str, entity_id: &str, record: &T) -> Result<Self> {
        Ok(Event::new(
            &format!("{}_recorded", entity_type),
            entity_type,
            entity_id,
            serde_json::to_value(record)?,
            DEFAULT_ACTOR,
        ))
    }
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Get events for a specific entity, newest first
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                    .map_err(|e| conversion_failure(1, e))?
                    .with_timezone(&Utc),
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: serde_json::from_str(&data_json).map_err(|e| conversion_failure(5, e))?,
                actor: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(events)
}

pub fn count_events(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?)
}

// ============================================================================
// INSERT HELPERS
// ============================================================================

/// Content hash identifying a fact regardless of its record id
pub fn fingerprint(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0x1f]);
    }
    format!("{:x}", hasher.finalize())
}

/// Where a fact sits in its log and what it says
///
/// Two rows share a `slot` when they speak for the same subject on the same
/// date; the later one wins. Record sets such as names use their whole
/// content as the slot, so any identical row is a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FactKey {
    pub slot: String,
    pub fingerprint: String,
}

impl FactKey {
    pub(crate) fn new(slot: &[&str], content: &[&str]) -> Self {
        let parts: Vec<&str> = slot.iter().chain(content).copied().collect();
        FactKey {
            slot: fingerprint(slot),
            fingerprint: fingerprint(&parts),
        }
    }

    pub(crate) fn whole(parts: &[&str]) -> Self {
        let hash = fingerprint(parts);
        FactKey {
            slot: hash.clone(),
            fingerprint: hash,
        }
    }
}

/// `Duplicate` when the fact in effect for this slot already says the same
fn check_restated(
    conn: &Connection,
    kind: &'static str,
    table: &'static str,
    key: &FactKey,
) -> Result<()> {
    let sql = format!(
        "SELECT fingerprint FROM {} WHERE slot = ?1 ORDER BY seq DESC LIMIT 1",
        table
    );
    let in_effect: Option<String> = conn
        .query_row(&sql, params![key.slot], |row| row.get(0))
        .optional()?;
    if in_effect.as_deref() == Some(key.fingerprint.as_str()) {
        warn!(kind, "duplicate fact skipped");
        return Err(RecordError::Duplicate { kind });
    }
    Ok(())
}

/// Run `work` inside one transaction; nothing is kept unless it all succeeds
pub(crate) fn in_transaction<T, F>(conn: &Connection, work: F) -> Result<T>
where
    F: FnOnce(&Connection) -> Result<T>,
{
    let tx = conn.unchecked_transaction()?;
    let value = work(&*tx)?;
    tx.commit()?;
    Ok(value)
}

/// Run an INSERT and write its audit event, returning the new row's sequence
/// number. UNIQUE violations come back as `Duplicate`.
fn write_row<T, F>(conn: &Connection, kind: &'static str, id: &str, record: &T, insert: F) -> Result<i64>
where
    T: Serialize,
    F: FnOnce(&Connection) -> rusqlite::Result<usize>,
{
    match insert(conn) {
        Ok(_) => {
            let seq = conn.last_insert_rowid();
            insert_event(conn, &Event::recorded(kind, id, record)?)?;
            info!(kind, id, seq, "recorded");
            Ok(seq)
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            warn!(kind, id, "duplicate record skipped");
            Err(RecordError::Duplicate { kind })
        }
        Err(e) => Err(e.into()),
    }
}

/// Insert a plain record together with its audit event
pub(crate) fn insert_record<T, F>(
    conn: &Connection,
    kind: &'static str,
    id: &str,
    record: &T,
    insert: F,
) -> Result<i64>
where
    T: Serialize,
    F: FnOnce(&Connection) -> rusqlite::Result<usize>,
{
    in_transaction(conn, |conn| write_row(conn, kind, id, record, insert))
}

/// Insert a fact row into `table` unless it restates the fact in effect for
/// its slot. `insert` must store `key.slot` and `key.fingerprint`.
pub(crate) fn insert_fact<T, F>(
    conn: &Connection,
    kind: &'static str,
    table: &'static str,
    key: &FactKey,
    id: &str,
    record: &T,
    insert: F,
) -> Result<i64>
where
    T: Serialize,
    F: FnOnce(&Connection) -> rusqlite::Result<usize>,
{
    in_transaction(conn, |conn| write_fact(conn, kind, table, key, id, record, insert))
}

/// [`insert_fact`] for callers already inside a transaction
pub(crate) fn write_fact<T, F>(
    conn: &Connection,
    kind: &'static str,
    table: &'static str,
    key: &FactKey,
    id: &str,
    record: &T,
    insert: F,
) -> Result<i64>
where
    T: Serialize,
    F: FnOnce(&Connection) -> rusqlite::Result<usize>,
{
    check_restated(conn, kind, table, key)?;
    write_row(conn, kind, id, record, insert)
}

/// `NotFound` unless `table` has a row with this id
pub(crate) fn ensure_exists(
    conn: &Connection,
    kind: &'static str,
    table: &'static str,
    id: &str,
) -> Result<()> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table);
    let found: bool = conn.query_row(&sql, params![id], |row| row.get(0))?;
    if found {
        Ok(())
    } else {
        debug!(kind, id, "missing reference");
        Err(RecordError::NotFound {
            kind,
            id: id.to_string(),
        })
    }
}

/// Like `query_row` but a missing row is `NotFound`
pub(crate) fn get_by_id<T, F>(
    conn: &Connection,
    kind: &'static str,
    sql: &str,
    id: &str,
    map: F,
) -> Result<T>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    match conn.query_row(sql, params![id], map) {
        Ok(value) => Ok(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(RecordError::NotFound {
            kind,
            id: id.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Run a query bound to one text parameter and collect every row
pub(crate) fn query_all<T, F>(conn: &Connection, sql: &str, param: &str, map: F) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![param], map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============================================================================
// COLUMN CODECS
// ============================================================================

fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn opt_date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(date_text)
}

pub(crate) fn date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn opt_date_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| NaiveDate::parse_from_str(&t, DATE_FORMAT).map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

pub(crate) fn decimal_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    text.parse::<Decimal>().map_err(|e| conversion_failure(idx, e))
}

/// Decode a short choice code stored as text
pub(crate) fn code_col<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Result<T>,
) -> rusqlite::Result<T> {
    let code: String = row.get(idx)?;
    parse(&code).map_err(|e| conversion_failure(idx, e))
}
