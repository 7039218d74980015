use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A clinician account. Immutable after signup: there is no update or
/// delete path for doctor records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub date_created: NaiveDateTime,
}
