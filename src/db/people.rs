// People persistence: identities, names, registrations, documents, contacts
// and incidental records

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use super::{
    code_col, date_col, date_text, ensure_exists, get_by_id, in_transaction, insert_event,
    insert_fact, insert_record, opt_date_col, opt_date_text, query_all, write_fact, Event,
    FactKey,
};
use crate::error::{RecordError, Result};
use crate::people::{
    latest_dose, Agency, Ancestry, Conviction, Email, IdDoc, Immunization, NameChange, NameMethod,
    NameParts, NameRegistration, NameStatus, Nick, Person, PersonNames, PetLicense, Phone, Profile,
};

// ============================================================================
// PERSON
// ============================================================================

pub fn insert_person(conn: &Connection, person: &Person) -> Result<i64> {
    person.validate()?;
    let a = person.ancestry.as_array();
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO people (
            id, hispanic_or_latino, white_or_caucasian, european, middle_eastern,
            arab_world_african, black_african, american_indian, eskimo_or_inuit,
            asian, pacific_islander, hawaiian, other, additional_ancestry_information
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            person.id, a[0], a[1], a[2], a[3], a[4], a[5], a[6], a[7], a[8], a[9], a[10], a[11],
            person.additional_ancestry_information,
        ],
    );
    insert_record(conn, "person", &person.id, person, insert)
}

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    let mut ancestry = [None; 12];
    for (i, slot) in ancestry.iter_mut().enumerate() {
        *slot = row.get(2 + i)?;
    }
    Ok(Person {
        seq: row.get(0)?,
        id: row.get(1)?,
        ancestry: Ancestry::from_array(ancestry),
        additional_ancestry_information: row.get(14)?,
    })
}

pub fn get_person(conn: &Connection, id: &str) -> Result<Person> {
    get_by_id(
        conn,
        "person",
        "SELECT seq, id, hispanic_or_latino, white_or_caucasian, european, middle_eastern,
                arab_world_african, black_african, american_indian, eskimo_or_inuit,
                asian, pacific_islander, hawaiian, other, additional_ancestry_information
         FROM people WHERE id = ?1",
        id,
        person_from_row,
    )
}

pub fn count_people(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))?)
}

// ============================================================================
// NICKNAMES
// ============================================================================

pub fn insert_nick(conn: &Connection, nick: &Nick) -> Result<i64> {
    nick.validate()?;
    ensure_exists(conn, "person", "people", &nick.person_id)?;
    let date = date_text(nick.date);
    let key = FactKey::new(&[&nick.person_id, &date], &[&nick.name]);
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO nicks (id, slot, fingerprint, person_id, date, name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![nick.id, key.slot, key.fingerprint, nick.person_id, date, nick.name],
    );
    insert_fact(conn, "nick", "nicks", &key, &nick.id, nick, insert)
}

pub fn get_nicks(conn: &Connection, person_id: &str) -> Result<Vec<Nick>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, date, name FROM nicks WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(Nick {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                date: date_col(row, 3)?,
                name: row.get(4)?,
            })
        },
    )
}

/// Nickname in use on `as_of`; `None` when there was none or it was dropped
pub fn get_nickname_as_of(conn: &Connection, person_id: &str, as_of: NaiveDate) -> Result<Option<String>> {
    let nicks = get_nicks(conn, person_id)?;
    Ok(crate::people::nickname_as_of(&nicks, as_of).map(str::to_string))
}

// ============================================================================
// NAMES
// ============================================================================

const NAME_CHANGE_COLUMNS: &str = "seq, id, person_id, date, prime_given_name, other_given_name,
    first_family_name, second_family_name, use_first, use_second, reason, date_registered,
    method, method_info";

fn name_change_from_row(row: &Row<'_>) -> rusqlite::Result<NameChange> {
    Ok(NameChange {
        seq: row.get(0)?,
        id: row.get(1)?,
        person_id: row.get(2)?,
        name: NameParts {
            date: date_col(row, 3)?,
            prime_given_name: row.get(4)?,
            other_given_name: row.get(5)?,
            first_family_name: row.get(6)?,
            second_family_name: row.get(7)?,
            use_first: row.get(8)?,
            use_second: row.get(9)?,
        },
        reason: row.get(10)?,
        date_registered: opt_date_col(row, 11)?,
        method: code_col(row, 12, NameMethod::from_code)?,
        method_info: row.get(13)?,
    })
}

/// Record a name. A new name has no registrations yet, so an entered
/// `date_registered` is rejected the same way `NameChange::clean` rejects it.
pub fn insert_name_change(conn: &Connection, name: &NameChange) -> Result<i64> {
    name.validate()?;
    let mut cleaned = name.clone();
    cleaned.clean(&[])?;
    ensure_exists(conn, "person", "people", &name.person_id)?;

    let parts = &name.name;
    let date = date_text(parts.date);
    let key = FactKey::whole(&[
        &name.person_id,
        &date,
        &parts.prime_given_name,
        &parts.other_given_name,
        &parts.first_family_name,
        &parts.second_family_name,
        name.method.code(),
    ]);
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO name_changes (
            id, slot, fingerprint, person_id, date, prime_given_name, other_given_name,
            first_family_name, second_family_name, use_first, use_second, reason,
            date_registered, method, method_info
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, ?13, ?14)",
        params![
            name.id,
            key.slot,
            key.fingerprint,
            name.person_id,
            date,
            parts.prime_given_name,
            parts.other_given_name,
            parts.first_family_name,
            parts.second_family_name,
            parts.use_first,
            parts.use_second,
            name.reason,
            name.method.code(),
            name.method_info,
        ],
    );
    insert_fact(conn, "name_change", "name_changes", &key, &name.id, &cleaned, insert)
}

pub fn get_name_change(conn: &Connection, id: &str) -> Result<NameChange> {
    get_by_id(
        conn,
        "name change",
        &format!("SELECT {} FROM name_changes WHERE id = ?1", NAME_CHANGE_COLUMNS),
        id,
        name_change_from_row,
    )
}

pub fn insert_name_registration(conn: &Connection, registration: &NameRegistration) -> Result<i64> {
    registration.validate()?;
    ensure_exists(conn, "name change", "name_changes", &registration.name_change_id)?;
    let date = date_text(registration.date);
    let key = FactKey::whole(&[
        &registration.name_change_id,
        &date,
        registration.registered_with.code(),
        &registration.reg_info,
    ]);
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO name_registrations (id, slot, fingerprint, name_change_id, date, registered_with, reg_info)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            registration.id,
            key.slot,
            key.fingerprint,
            registration.name_change_id,
            date,
            registration.registered_with.code(),
            registration.reg_info,
        ],
    );
    in_transaction(conn, |conn| {
        let seq = write_fact(
            conn,
            "name_registration",
            "name_registrations",
            &key,
            &registration.id,
            registration,
            insert,
        )?;
        // the stored first-registration date follows the registrations
        let name = get_name_change(conn, &registration.name_change_id)?;
        let registrations = get_registrations_for_name(conn, &name.id)?;
        let first = name.date_first_registered(&registrations);
        if name.date_registered != first {
            store_date_registered(conn, &name.id, first)?;
        }
        Ok(seq)
    })
}

fn registration_from_row(row: &Row<'_>) -> rusqlite::Result<NameRegistration> {
    Ok(NameRegistration {
        seq: row.get(0)?,
        id: row.get(1)?,
        name_change_id: row.get(2)?,
        date: date_col(row, 3)?,
        registered_with: code_col(row, 4, Agency::from_code)?,
        reg_info: row.get(5)?,
    })
}

pub fn get_registrations_for_name(conn: &Connection, name_change_id: &str) -> Result<Vec<NameRegistration>> {
    query_all(
        conn,
        "SELECT seq, id, name_change_id, date, registered_with, reg_info
         FROM name_registrations WHERE name_change_id = ?1 ORDER BY seq",
        name_change_id,
        registration_from_row,
    )
}

/// Enter (or leave blank) the first-registration date of a name and store the
/// cleaned value. Blank is filled in from the registrations; returns what was stored.
pub fn set_date_registered(
    conn: &Connection,
    name_change_id: &str,
    entered: Option<NaiveDate>,
) -> Result<Option<NaiveDate>> {
    in_transaction(conn, |conn| {
        let mut name = get_name_change(conn, name_change_id)?;
        let stored = name.date_registered;
        let registrations = get_registrations_for_name(conn, name_change_id)?;
        name.date_registered = entered;
        name.clean(&registrations)?;

        if name.date_registered != stored {
            store_date_registered(conn, &name.id, name.date_registered)?;
        }
        Ok(name.date_registered)
    })
}

fn store_date_registered(
    conn: &Connection,
    name_change_id: &str,
    date_registered: Option<NaiveDate>,
) -> Result<()> {
    conn.execute(
        "UPDATE name_changes SET date_registered = ?1 WHERE id = ?2",
        params![opt_date_text(date_registered), name_change_id],
    )?;
    insert_event(
        conn,
        &Event::new(
            "name_change_cleaned",
            "name_change",
            name_change_id,
            serde_json::json!({ "date_registered": date_registered }),
            super::DEFAULT_ACTOR,
        ),
    )?;
    info!(id = name_change_id, ?date_registered, "registration date set");
    Ok(())
}

/// Every name of a person with the registrations of those names
pub fn get_person_names(conn: &Connection, person_id: &str) -> Result<PersonNames> {
    ensure_exists(conn, "person", "people", person_id)?;
    let mut names = PersonNames::new(person_id);
    names.names = query_all(
        conn,
        &format!(
            "SELECT {} FROM name_changes WHERE person_id = ?1 ORDER BY seq",
            NAME_CHANGE_COLUMNS
        ),
        person_id,
        name_change_from_row,
    )?;
    names.registrations = query_all(
        conn,
        "SELECT r.seq, r.id, r.name_change_id, r.date, r.registered_with, r.reg_info
         FROM name_registrations r
         JOIN name_changes n ON n.id = r.name_change_id
         WHERE n.person_id = ?1
         ORDER BY r.seq",
        person_id,
        registration_from_row,
    )?;
    debug!(
        person_id,
        names = names.names.len(),
        registrations = names.registrations.len(),
        "loaded names"
    );
    Ok(names)
}

/// Names current on `as_of`, each with how it is current
pub fn get_current_names(
    conn: &Connection,
    person_id: &str,
    as_of: NaiveDate,
) -> Result<Vec<(NameChange, NameStatus)>> {
    let names = get_person_names(conn, person_id)?;
    Ok(names
        .all_current_names(as_of)
        .into_iter()
        .map(|(name, status)| (name.clone(), status))
        .collect())
}

pub fn get_legal_name(conn: &Connection, person_id: &str, as_of: NaiveDate) -> Result<NameChange> {
    let names = get_person_names(conn, person_id)?;
    names.legal_name(as_of).cloned()
}

// ============================================================================
// ID DOCUMENTS
// ============================================================================

pub fn insert_id_doc(conn: &Connection, doc: &IdDoc) -> Result<i64> {
    doc.validate()?;
    ensure_exists(conn, "name registration", "name_registrations", &doc.name_registration_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO id_docs (id, name_registration_id, name_on_id, name, number, date, expire, info)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            doc.id,
            doc.name_registration_id,
            doc.name_on_id,
            doc.name,
            doc.number,
            date_text(doc.date),
            opt_date_text(doc.expire),
            doc.info,
        ],
    );
    insert_record(conn, "id_doc", &doc.id, doc, insert)
}

/// Documents issued under any of a person's registered names
pub fn get_id_docs(conn: &Connection, person_id: &str) -> Result<Vec<IdDoc>> {
    query_all(
        conn,
        "SELECT d.seq, d.id, d.name_registration_id, d.name_on_id, d.name, d.number, d.date, d.expire, d.info
         FROM id_docs d
         JOIN name_registrations r ON r.id = d.name_registration_id
         JOIN name_changes n ON n.id = r.name_change_id
         WHERE n.person_id = ?1
         ORDER BY d.seq",
        person_id,
        |row| {
            Ok(IdDoc {
                seq: row.get(0)?,
                id: row.get(1)?,
                name_registration_id: row.get(2)?,
                name_on_id: row.get(3)?,
                name: row.get(4)?,
                number: row.get(5)?,
                date: date_col(row, 6)?,
                expire: opt_date_col(row, 7)?,
                info: row.get(8)?,
            })
        },
    )
}

// ============================================================================
// CONTACTS
// ============================================================================

pub fn insert_phone(conn: &Connection, phone: &Phone) -> Result<i64> {
    phone.validate()?;
    ensure_exists(conn, "person", "people", &phone.person_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO phones (
            id, person_id, start_date, end_date, valid_date, invalid_date,
            phone_number, carrier, private, belongs
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            phone.id,
            phone.person_id,
            opt_date_text(phone.start_date),
            opt_date_text(phone.end_date),
            date_text(phone.valid_date),
            opt_date_text(phone.invalid_date),
            phone.phone_number,
            phone.carrier,
            phone.private,
            phone.belongs,
        ],
    );
    insert_record(conn, "phone", &phone.id, phone, insert)
}

pub fn get_phones(conn: &Connection, person_id: &str) -> Result<Vec<Phone>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, start_date, end_date, valid_date, invalid_date,
                phone_number, carrier, private, belongs
         FROM phones WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(Phone {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                start_date: opt_date_col(row, 3)?,
                end_date: opt_date_col(row, 4)?,
                valid_date: date_col(row, 5)?,
                invalid_date: opt_date_col(row, 6)?,
                phone_number: row.get(7)?,
                carrier: row.get(8)?,
                private: row.get(9)?,
                belongs: row.get(10)?,
            })
        },
    )
}

pub fn insert_email(conn: &Connection, email: &Email) -> Result<i64> {
    email.validate()?;
    ensure_exists(conn, "person", "people", &email.person_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO emails (id, person_id, date, addr, term) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            email.id,
            email.person_id,
            date_text(email.date),
            email.addr,
            opt_date_text(email.term),
        ],
    );
    insert_record(conn, "email", &email.id, email, insert)
}

pub fn get_emails(conn: &Connection, person_id: &str) -> Result<Vec<Email>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, date, addr, term FROM emails WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(Email {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                date: date_col(row, 3)?,
                addr: row.get(4)?,
                term: opt_date_col(row, 5)?,
            })
        },
    )
}

pub fn insert_profile(conn: &Connection, profile: &Profile) -> Result<i64> {
    profile.validate()?;
    ensure_exists(conn, "person", "people", &profile.person_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO profiles (id, person_id, date, uri, del_date) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            profile.id,
            profile.person_id,
            date_text(profile.date),
            profile.uri,
            opt_date_text(profile.del_date),
        ],
    );
    insert_record(conn, "profile", &profile.id, profile, insert)
}

pub fn get_profiles(conn: &Connection, person_id: &str) -> Result<Vec<Profile>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, date, uri, del_date FROM profiles WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(Profile {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                date: date_col(row, 3)?,
                uri: row.get(4)?,
                del_date: opt_date_col(row, 5)?,
            })
        },
    )
}

// ============================================================================
// INCIDENTAL RECORDS
// ============================================================================

pub fn insert_conviction(conn: &Connection, conviction: &Conviction) -> Result<i64> {
    conviction.validate()?;
    ensure_exists(conn, "person", "people", &conviction.person_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO convictions (id, person_id, date, jurisdiction, offense, case_number, sentence)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            conviction.id,
            conviction.person_id,
            date_text(conviction.date),
            conviction.jurisdiction,
            conviction.offense,
            conviction.case_number,
            conviction.sentence,
        ],
    );
    insert_record(conn, "conviction", &conviction.id, conviction, insert)
}

pub fn get_convictions(conn: &Connection, person_id: &str) -> Result<Vec<Conviction>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, date, jurisdiction, offense, case_number, sentence
         FROM convictions WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(Conviction {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                date: date_col(row, 3)?,
                jurisdiction: row.get(4)?,
                offense: row.get(5)?,
                case_number: row.get(6)?,
                sentence: row.get(7)?,
            })
        },
    )
}

pub fn insert_immunization(conn: &Connection, immunization: &Immunization) -> Result<i64> {
    immunization.validate()?;
    ensure_exists(conn, "person", "people", &immunization.person_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO immunizations (id, person_id, date, vaccine, dose, administered_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            immunization.id,
            immunization.person_id,
            date_text(immunization.date),
            immunization.vaccine,
            immunization.dose,
            immunization.administered_by,
        ],
    );
    insert_record(conn, "immunization", &immunization.id, immunization, insert)
}

pub fn get_immunizations(conn: &Connection, person_id: &str) -> Result<Vec<Immunization>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, date, vaccine, dose, administered_by
         FROM immunizations WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(Immunization {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                date: date_col(row, 3)?,
                vaccine: row.get(4)?,
                dose: row.get(5)?,
                administered_by: row.get(6)?,
            })
        },
    )
}

pub fn insert_pet_license(conn: &Connection, license: &PetLicense) -> Result<i64> {
    license.validate()?;
    ensure_exists(conn, "person", "people", &license.person_id)?;
    let insert = |conn: &Connection| conn.execute(
        "INSERT INTO pet_licenses (
            id, person_id, date, expire, pet_name, species, license_number, jurisdiction
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            license.id,
            license.person_id,
            date_text(license.date),
            opt_date_text(license.expire),
            license.pet_name,
            license.species,
            license.license_number,
            license.jurisdiction,
        ],
    );
    insert_record(conn, "pet_license", &license.id, license, insert)
}

pub fn get_pet_licenses(conn: &Connection, person_id: &str) -> Result<Vec<PetLicense>> {
    query_all(
        conn,
        "SELECT seq, id, person_id, date, expire, pet_name, species, license_number, jurisdiction
         FROM pet_licenses WHERE person_id = ?1 ORDER BY seq",
        person_id,
        |row| {
            Ok(PetLicense {
                seq: row.get(0)?,
                id: row.get(1)?,
                person_id: row.get(2)?,
                date: date_col(row, 3)?,
                expire: opt_date_col(row, 4)?,
                pet_name: row.get(5)?,
                species: row.get(6)?,
                license_number: row.get(7)?,
                jurisdiction: row.get(8)?,
            })
        },
    )
}

/// Latest dose of `vaccine` a person had received by `as_of`
pub fn get_latest_dose(
    conn: &Connection,
    person_id: &str,
    vaccine: &str,
    as_of: NaiveDate,
) -> Result<Immunization> {
    let immunizations = get_immunizations(conn, person_id)?;
    latest_dose(&immunizations, vaccine, as_of)
        .cloned()
        .ok_or_else(|| RecordError::DoesNotExist {
            kind: "immunization",
            subject: person_id.to_string(),
            as_of,
        })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{count_events, get_events_for_entity, open_in_memory};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn setup_person(conn: &Connection) -> Person {
        let mut person = Person::new();
        person.seq = insert_person(conn, &person).unwrap();
        person
    }

    fn name(person: &Person, date: NaiveDate, family: &str, method: NameMethod) -> NameChange {
        NameChange::new(
            &person.id,
            NameParts::new(date, family).with_given("Jane", ""),
            "test",
            method,
        )
    }

    #[test]
    fn test_person_round_trip() {
        let conn = open_in_memory().unwrap();
        let mut ancestry = Ancestry::default();
        ancestry.european = Some(true);
        ancestry.asian = Some(false);
        let person = Person::new().with_ancestry(ancestry.clone());
        let seq = insert_person(&conn, &person).unwrap();

        let loaded = get_person(&conn, &person.id).unwrap();
        assert_eq!(loaded.seq, seq);
        assert_eq!(loaded.ancestry, ancestry);
        assert!(get_person(&conn, "nobody").unwrap_err().is_missing());
        assert_eq!(count_people(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_nick_is_rejected() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);

        insert_nick(&conn, &Nick::new(&person.id, d(2000, 1, 1), "Ace")).unwrap();
        let again = Nick::new(&person.id, d(2000, 1, 1), "Ace");
        let err = insert_nick(&conn, &again).unwrap_err();
        assert!(matches!(err, RecordError::Duplicate { kind: "nick" }));
        assert_eq!(get_nicks(&conn, &person.id).unwrap().len(), 1);
    }

    #[test]
    fn test_nickname_as_of() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        insert_nick(&conn, &Nick::new(&person.id, d(2000, 1, 1), "Ace")).unwrap();
        insert_nick(&conn, &Nick::stopped(&person.id, d(2005, 1, 1))).unwrap();

        assert_eq!(get_nickname_as_of(&conn, &person.id, d(1999, 1, 1)).unwrap(), None);
        assert_eq!(
            get_nickname_as_of(&conn, &person.id, d(2003, 1, 1)).unwrap(),
            Some("Ace".to_string())
        );
        assert_eq!(get_nickname_as_of(&conn, &person.id, d(2005, 1, 1)).unwrap(), None);
    }

    #[test]
    fn test_nick_needs_person() {
        let conn = open_in_memory().unwrap();
        let err = insert_nick(&conn, &Nick::new("ghost", d(2000, 1, 1), "Ace")).unwrap_err();
        assert!(matches!(err, RecordError::NotFound { kind: "person", .. }));
    }

    #[test]
    fn test_legal_name_from_database() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);

        let birth = name(&person, d(1980, 5, 1), "Smith", NameMethod::Birth);
        insert_name_change(&conn, &birth).unwrap();
        insert_name_registration(&conn, &NameRegistration::new(&birth.id, d(1980, 6, 1), Agency::SocialSecurity)).unwrap();

        let married = name(&person, d(2005, 7, 1), "Jones", NameMethod::Marriage);
        insert_name_change(&conn, &married).unwrap();
        insert_name_registration(&conn, &NameRegistration::new(&married.id, d(2005, 8, 1), Agency::MotorVehicles)).unwrap();

        let nickname = name(&person, d(1999, 1, 1), "Smitty", NameMethod::Pseudonym);
        insert_name_change(&conn, &nickname).unwrap();

        assert_eq!(get_legal_name(&conn, &person.id, d(2005, 7, 31)).unwrap().id, birth.id);
        assert_eq!(get_legal_name(&conn, &person.id, d(2005, 8, 1)).unwrap().id, married.id);
        assert!(get_legal_name(&conn, &person.id, d(1980, 5, 31)).unwrap_err().is_missing());

        let current = get_current_names(&conn, &person.id, d(2010, 1, 1)).unwrap();
        let statuses: Vec<NameStatus> = current.iter().map(|(_, s)| *s).collect();
        assert_eq!(statuses, vec![NameStatus::Legal, NameStatus::Alias]);
    }

    #[test]
    fn test_loaded_names_match_in_memory() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let mut in_memory = PersonNames::new(&person.id);

        for (year, family) in [(1990, "Ames"), (2000, "Baker"), (2010, "Cole")] {
            let mut change = name(&person, d(year, 1, 1), family, NameMethod::Court);
            change.seq = insert_name_change(&conn, &change).unwrap();
            let mut reg = NameRegistration::new(&change.id, d(year, 2, 1), Agency::CountyClerk);
            reg.seq = insert_name_registration(&conn, &reg).unwrap();
            in_memory.add_name(change);
            in_memory.add_registration(reg);
        }

        let loaded = get_person_names(&conn, &person.id).unwrap();
        for as_of in [d(1990, 1, 31), d(1995, 1, 1), d(2000, 2, 1), d(2020, 1, 1)] {
            let a: Vec<(&str, NameStatus)> = loaded
                .all_current_names(as_of)
                .into_iter()
                .map(|(n, s)| (n.id.as_str(), s))
                .collect();
            let b: Vec<(&str, NameStatus)> = in_memory
                .all_current_names(as_of)
                .into_iter()
                .map(|(n, s)| (n.id.as_str(), s))
                .collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_date_registered_is_cleaned() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let change = name(&person, d(2001, 1, 1), "Doe", NameMethod::Court);
        insert_name_change(&conn, &change).unwrap();

        let err = set_date_registered(&conn, &change.id, Some(d(2001, 2, 1))).unwrap_err();
        assert!(err.to_string().contains("First enter some registrations"));

        insert_name_registration(&conn, &NameRegistration::new(&change.id, d(2001, 3, 1), Agency::PostalService)).unwrap();
        insert_name_registration(&conn, &NameRegistration::new(&change.id, d(2001, 2, 1), Agency::SocialSecurity)).unwrap();

        assert!(set_date_registered(&conn, &change.id, Some(d(2001, 3, 1))).is_err());
        assert_eq!(set_date_registered(&conn, &change.id, None).unwrap(), Some(d(2001, 2, 1)));
        assert_eq!(
            get_name_change(&conn, &change.id).unwrap().date_registered,
            Some(d(2001, 2, 1))
        );
    }

    #[test]
    fn test_registration_fills_date_registered() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let change = name(&person, d(2001, 1, 1), "Doe", NameMethod::Court);
        insert_name_change(&conn, &change).unwrap();
        assert_eq!(get_name_change(&conn, &change.id).unwrap().date_registered, None);

        insert_name_registration(&conn, &NameRegistration::new(&change.id, d(2001, 3, 1), Agency::PostalService)).unwrap();
        assert_eq!(get_name_change(&conn, &change.id).unwrap().date_registered, Some(d(2001, 3, 1)));

        // an earlier registration moves the first-registration date back
        insert_name_registration(&conn, &NameRegistration::new(&change.id, d(2001, 2, 1), Agency::SocialSecurity)).unwrap();
        assert_eq!(get_name_change(&conn, &change.id).unwrap().date_registered, Some(d(2001, 2, 1)));

        insert_name_registration(&conn, &NameRegistration::new(&change.id, d(2001, 4, 1), Agency::MotorVehicles)).unwrap();
        assert_eq!(get_name_change(&conn, &change.id).unwrap().date_registered, Some(d(2001, 2, 1)));

        let cleaned: Vec<Event> = get_events_for_entity(&conn, "name_change", &change.id)
            .unwrap()
            .into_iter()
            .filter(|e| e.event_type == "name_change_cleaned")
            .collect();
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_registration_rolled_back_without_audit() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let change = name(&person, d(2001, 1, 1), "Doe", NameMethod::Court);
        insert_name_change(&conn, &change).unwrap();
        let events_before = count_events(&conn).unwrap();

        conn.execute_batch(
            "CREATE TRIGGER audit_offline BEFORE INSERT ON events
             BEGIN SELECT RAISE(ABORT, 'audit offline'); END;",
        )
        .unwrap();
        let reg = NameRegistration::new(&change.id, d(2001, 2, 1), Agency::SocialSecurity);
        assert!(insert_name_registration(&conn, &reg).is_err());
        assert!(insert_nick(&conn, &Nick::new(&person.id, d(2001, 1, 1), "Dee")).is_err());

        assert!(get_registrations_for_name(&conn, &change.id).unwrap().is_empty());
        assert!(get_nicks(&conn, &person.id).unwrap().is_empty());
        assert_eq!(get_name_change(&conn, &change.id).unwrap().date_registered, None);
        assert_eq!(count_events(&conn).unwrap(), events_before);
    }

    #[test]
    fn test_entered_registration_date_rejected_on_insert() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let mut change = name(&person, d(2001, 1, 1), "Doe", NameMethod::Court);
        change.date_registered = Some(d(2001, 1, 5));
        assert!(insert_name_change(&conn, &change).is_err());
    }

    #[test]
    fn test_documents_and_contacts() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let change = name(&person, d(1990, 1, 1), "Roe", NameMethod::Birth);
        insert_name_change(&conn, &change).unwrap();
        let reg = NameRegistration::new(&change.id, d(1990, 2, 1), Agency::MotorVehicles);
        insert_name_registration(&conn, &reg).unwrap();

        let doc = IdDoc::new(&reg.id, "JANE ROE", "Missouri Driver License", "R123", d(2015, 1, 1))
            .expiring(d(2021, 1, 1));
        insert_id_doc(&conn, &doc).unwrap();
        let docs = get_id_docs(&conn, &person.id).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].expire, Some(d(2021, 1, 1)));

        let phone = Phone::new(&person.id, "(417) 555-0100", d(2019, 1, 1)).owned_since(d(2018, 6, 1));
        insert_phone(&conn, &phone).unwrap();
        let phones = get_phones(&conn, &person.id).unwrap();
        assert_eq!(phones[0].phone_number, "417-555-0100");
        assert_eq!(phones[0].belongs, Some(true));

        insert_email(&conn, &Email::new(&person.id, "jane@example.com", d(2010, 1, 1))).unwrap();
        insert_profile(&conn, &Profile::new(&person.id, "https://example.com/jane", d(2012, 1, 1))).unwrap();
        assert_eq!(get_emails(&conn, &person.id).unwrap().len(), 1);
        assert_eq!(get_profiles(&conn, &person.id).unwrap().len(), 1);
    }

    #[test]
    fn test_incidental_records() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);

        insert_conviction(&conn, &Conviction::new(&person.id, d(2011, 3, 1), "Greene County", "Trespass")).unwrap();
        insert_immunization(&conn, &Immunization::new(&person.id, d(2021, 3, 1), "COVID-19", 1)).unwrap();
        insert_immunization(&conn, &Immunization::new(&person.id, d(2021, 4, 1), "covid-19", 2)).unwrap();
        insert_pet_license(&conn, &PetLicense::new(&person.id, d(2022, 1, 1), "Rex", "dog", "PL-1")).unwrap();

        assert_eq!(get_convictions(&conn, &person.id).unwrap().len(), 1);
        assert_eq!(get_pet_licenses(&conn, &person.id).unwrap()[0].pet_name, "Rex");
        assert_eq!(get_latest_dose(&conn, &person.id, "COVID-19", d(2021, 3, 15)).unwrap().dose, 1);
        assert_eq!(get_latest_dose(&conn, &person.id, "COVID-19", d(2022, 1, 1)).unwrap().dose, 2);
        let err = get_latest_dose(&conn, &person.id, "measles", d(2022, 1, 1)).unwrap_err();
        assert!(matches!(err, RecordError::DoesNotExist { kind: "immunization", .. }));
        assert!(get_latest_dose(&conn, &person.id, "covid-19", d(2021, 2, 1)).unwrap_err().is_missing());
    }

    #[test]
    fn test_inserts_are_audited() {
        let conn = open_in_memory().unwrap();
        let person = setup_person(&conn);
        let nick = Nick::new(&person.id, d(2000, 1, 1), "Ace");
        insert_nick(&conn, &nick).unwrap();

        let events = get_events_for_entity(&conn, "nick", &nick.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "nick_recorded");
        assert_eq!(events[0].data["name"], "Ace");
        assert_eq!(count_events(&conn).unwrap(), 2);
    }
}
