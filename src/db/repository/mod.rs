//! Repository layer: entity-scoped database operations.
//!
//! Functions take a `&rusqlite::Connection`; the single-user desktop model
//! means writes are serialized by SQLite itself and no application-level
//! locking is layered on top.

mod doctor;
mod note;
mod patient;

pub use doctor::*;
pub use note::*;
pub use patient::*;

use chrono::NaiveDateTime;

use super::DatabaseError;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, truncated to whole seconds for stable storage.
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Bad timestamp '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::*;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_doctor(conn: &Connection) -> Doctor {
        create_doctor(conn, "Alice Carter", "alice@clinic.test", "hunter2!").unwrap()
    }

    fn basic_fields(name: &str) -> PatientFields {
        PatientFields {
            name: name.into(),
            age: 42,
            gender: "F".into(),
            contact: "555-0100".into(),
            diagnosis: "Essential hypertension".into(),
            icd_code: "I10".into(),
            notes: "Follow up in 3 months".into(),
        }
    }

    #[test]
    fn doctor_create_and_authenticate() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        assert_eq!(doc.email, "alice@clinic.test");

        let authed = authenticate(&conn, "alice@clinic.test", "hunter2!").unwrap();
        assert_eq!(authed.id, doc.id);
        assert_eq!(authed.name, "Alice Carter");
    }

    #[test]
    fn duplicate_email_rejected() {
        let conn = test_db();
        make_doctor(&conn);
        let err = create_doctor(&conn, "Other", "alice@clinic.test", "pw123").unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateEmail));
    }

    #[test]
    fn authenticate_unknown_email_is_not_found() {
        let conn = test_db();
        let err = authenticate(&conn, "nobody@clinic.test", "pw").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn authenticate_wrong_password_is_invalid_credentials() {
        let conn = test_db();
        make_doctor(&conn);
        let err = authenticate(&conn, "alice@clinic.test", "wrong").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidCredentials));
    }

    #[test]
    fn password_is_not_stored_in_plaintext() {
        let conn = test_db();
        make_doctor(&conn);
        let stored: String = conn
            .query_row("SELECT password_hash FROM doctors", [], |row| row.get(0))
            .unwrap();
        assert_ne!(stored, "hunter2!");
        assert_eq!(stored.len(), 64); // SHA-256 hex digest
    }

    #[test]
    fn doctor_signup_validation() {
        let conn = test_db();
        let err = create_doctor(&conn, "", "a@b.test", "pw").unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { .. }));
        let err = create_doctor(&conn, "Name", "", "pw").unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { .. }));
    }

    #[test]
    fn patient_create_then_get_round_trips() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        let fields = basic_fields("John Smith");
        let patient = create_patient(&conn, doc.id, &fields).unwrap();

        let fetched = get_patient(&conn, patient.id).unwrap();
        assert_eq!(fetched.doctor_id, doc.id);
        assert_eq!(fetched.name, "John Smith");
        assert_eq!(fetched.age, 42);
        assert_eq!(fetched.gender, "F");
        assert_eq!(fetched.contact, "555-0100");
        assert_eq!(fetched.diagnosis, "Essential hypertension");
        assert_eq!(fetched.icd_code, "I10");
        assert_eq!(fetched.notes, "Follow up in 3 months");
    }

    #[test]
    fn invalid_patient_fields_create_no_row() {
        let conn = test_db();
        let doc = make_doctor(&conn);

        let mut fields = basic_fields("");
        fields.age = -3;
        let err = create_patient(&conn, doc.id, &fields).unwrap_err();
        match err {
            DatabaseError::Validation { fields } => {
                assert!(fields.contains(&"name".to_string()));
                assert!(fields.contains(&"age".to_string()));
            }
            other => panic!("expected Validation, got {other}"),
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn update_patient_revalidates_and_persists() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        let patient = create_patient(&conn, doc.id, &basic_fields("Jane Doe")).unwrap();

        let mut fields = patient.fields();
        fields.diagnosis = "Type 2 diabetes mellitus".into();
        fields.icd_code = "E11.9".into();
        update_patient(&conn, patient.id, &fields).unwrap();

        let fetched = get_patient(&conn, patient.id).unwrap();
        assert_eq!(fetched.diagnosis, "Type 2 diabetes mellitus");
        assert_eq!(fetched.icd_code, "E11.9");

        fields.age = -1;
        let err = update_patient(&conn, patient.id, &fields).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation { .. }));
    }

    #[test]
    fn get_missing_patient_is_not_found() {
        let conn = test_db();
        let err = get_patient(&conn, 999).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn list_patients_is_scoped_to_doctor() {
        let conn = test_db();
        let doc_a = make_doctor(&conn);
        let doc_b = create_doctor(&conn, "Bob Reyes", "bob@clinic.test", "pw456").unwrap();

        create_patient(&conn, doc_a.id, &basic_fields("Patient A")).unwrap();
        create_patient(&conn, doc_b.id, &basic_fields("Patient B")).unwrap();

        let list = list_patients(&conn, doc_a.id).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Patient A");
    }

    #[test]
    fn search_matches_name_diagnosis_or_code_case_insensitively() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        let other = create_doctor(&conn, "Eve", "eve@clinic.test", "pw789").unwrap();

        create_patient(&conn, doc.id, &basic_fields("John Smith")).unwrap();

        let mut by_diag = basic_fields("Mary Major");
        by_diag.diagnosis = "Johnson syndrome".into();
        by_diag.icd_code = "L51.1".into();
        create_patient(&conn, doc.id, &by_diag).unwrap();

        let mut unrelated = basic_fields("Pat Quinn");
        unrelated.diagnosis = "Asthma".into();
        unrelated.icd_code = "J45.909".into();
        create_patient(&conn, doc.id, &unrelated).unwrap();

        // Same name under another doctor must not leak into results.
        create_patient(&conn, other.id, &basic_fields("John Smith")).unwrap();

        let hits = search_patients(&conn, doc.id, "JOHN").unwrap();
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(hits.len(), 2);
        assert!(names.contains(&"John Smith"));
        assert!(names.contains(&"Mary Major"));

        let by_code = search_patients(&conn, doc.id, "j45").unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].name, "Pat Quinn");
    }

    #[test]
    fn notes_create_list_and_round_trip_codes() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        let patient = create_patient(&conn, doc.id, &basic_fields("John Smith")).unwrap();

        let note = create_note(
            &conn,
            patient.id,
            doc.id,
            NoteType::Soap,
            "Subjective: headache.\nObjective: BP 120/80.",
            &["R51".to_string(), "I10".to_string()],
        )
        .unwrap();
        assert_eq!(note.icd_codes, vec!["R51", "I10"]);

        create_note(&conn, patient.id, doc.id, NoteType::Referral, "Referral text", &[]).unwrap();

        let notes = list_notes_for_patient(&conn, patient.id).unwrap();
        assert_eq!(notes.len(), 2);
        // Newest first, ties broken by insertion order descending.
        assert_eq!(notes[0].note_type, NoteType::Referral);
        assert!(notes[1].icd_codes.contains(&"R51".to_string()));

        let fetched = get_note(&conn, note.id).unwrap();
        assert_eq!(fetched.content, note.content);
        assert_eq!(fetched.icd_codes, note.icd_codes);
    }

    #[test]
    fn empty_codes_round_trip_as_empty_list() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        let patient = create_patient(&conn, doc.id, &basic_fields("P")).unwrap();
        let note = create_note(&conn, patient.id, doc.id, NoteType::Discharge, "text", &[]).unwrap();
        let fetched = get_note(&conn, note.id).unwrap();
        assert!(fetched.icd_codes.is_empty());
    }

    #[test]
    fn delete_patient_cascades_to_its_notes_only() {
        let conn = test_db();
        let doc = make_doctor(&conn);
        let keep = create_patient(&conn, doc.id, &basic_fields("Keep Me")).unwrap();
        let gone = create_patient(&conn, doc.id, &basic_fields("Delete Me")).unwrap();

        create_note(&conn, keep.id, doc.id, NoteType::Soap, "keep note", &[]).unwrap();
        create_note(&conn, gone.id, doc.id, NoteType::Soap, "gone note 1", &[]).unwrap();
        create_note(&conn, gone.id, doc.id, NoteType::Referral, "gone note 2", &[]).unwrap();

        delete_patient(&conn, gone.id).unwrap();

        assert!(matches!(
            get_patient(&conn, gone.id),
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(list_notes_for_patient(&conn, gone.id).unwrap().is_empty());

        let kept = list_notes_for_patient(&conn, keep.id).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].content, "keep note");
    }

    #[test]
    fn timestamp_round_trip() {
        let ts = now_timestamp();
        let parsed = parse_timestamp(&ts).unwrap();
        assert_eq!(parsed.format(TIMESTAMP_FORMAT).to_string(), ts);
    }
}
