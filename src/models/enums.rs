use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Kind of clinical note produced by the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    Soap,
    Referral,
    Discharge,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soap => "SOAP",
            Self::Referral => "Referral",
            Self::Discharge => "Discharge",
        }
    }

    /// Human-facing document title used in headers and exports.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Soap => "SOAP Note",
            Self::Referral => "Referral Note",
            Self::Discharge => "Discharge Summary",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SOAP" => Ok(Self::Soap),
            "REFERRAL" => Ok(Self::Referral),
            "DISCHARGE" => Ok(Self::Discharge),
            _ => Err(DatabaseError::InvalidEnum {
                field: "note_type".into(),
                value: s.into(),
            }),
        }
    }
}
