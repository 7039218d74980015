//! In-memory login session. Nothing about authentication state touches disk;
//! closing the application is logout.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::{repository, DatabaseError};
use crate::models::Doctor;

#[derive(Debug, Clone)]
pub struct Session {
    pub doctor: Doctor,
    pub started_at: NaiveDateTime,
}

impl Session {
    /// Authenticate and open a session for the doctor. Error cases come
    /// straight from `authenticate`: `NotFound` for an unknown email,
    /// `InvalidCredentials` for a wrong password.
    pub fn login(conn: &Connection, email: &str, password: &str) -> Result<Self, DatabaseError> {
        let doctor = repository::authenticate(conn, email, password)?;
        tracing::info!(doctor_id = doctor.id, "Doctor logged in");
        Ok(Self {
            doctor,
            started_at: chrono::Local::now().naive_local(),
        })
    }
}
