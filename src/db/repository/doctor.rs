use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::db::DatabaseError;
use crate::models::Doctor;

use super::{now_timestamp, parse_timestamp};

/// SHA-256 hex digest of a password, matching the stored format.
fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut hex = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Create a new doctor account. Fails with `DuplicateEmail` if the email is
/// already registered.
pub fn create_doctor(
    conn: &Connection,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Doctor, DatabaseError> {
    let mut bad = Vec::new();
    if name.trim().is_empty() {
        bad.push("name".to_string());
    }
    if email.trim().is_empty() {
        bad.push("email".to_string());
    }
    if password.is_empty() {
        bad.push("password".to_string());
    }
    if !bad.is_empty() {
        return Err(DatabaseError::Validation { fields: bad });
    }

    let created = now_timestamp();
    let result = conn.execute(
        "INSERT INTO doctors (name, email, password_hash, date_created)
         VALUES (?1, ?2, ?3, ?4)",
        params![name, email, hash_password(password), created],
    );

    match result {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            tracing::info!(doctor_id = id, "Doctor account created");
            Ok(Doctor {
                id,
                name: name.to_string(),
                email: email.to_string(),
                date_created: parse_timestamp(&created)?,
            })
        }
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DatabaseError::DuplicateEmail)
        }
        Err(e) => Err(e.into()),
    }
}

/// Authenticate by email and password.
///
/// Unknown email is `NotFound`; a hash mismatch is `InvalidCredentials`.
/// The hash comparison is constant-time.
pub fn authenticate(
    conn: &Connection,
    email: &str,
    password: &str,
) -> Result<Doctor, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, email, password_hash, date_created
             FROM doctors WHERE email = ?1",
            params![email],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let (id, name, email, stored_hash, created) = row.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "doctor".into(),
        id: email.to_string(),
    })?;

    let candidate = hash_password(password);
    if stored_hash.as_bytes().ct_eq(candidate.as_bytes()).into() {
        Ok(Doctor {
            id,
            name,
            email,
            date_created: parse_timestamp(&created)?,
        })
    } else {
        Err(DatabaseError::InvalidCredentials)
    }
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Doctor, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, email, date_created FROM doctors WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let (id, name, email, created) = row.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "doctor".into(),
        id: id.to_string(),
    })?;

    Ok(Doctor {
        id,
        name,
        email,
        date_created: parse_timestamp(&created)?,
    })
}
