//! Database models for O.S.A answers.

use crate::types::RsvpId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a guest is coming, stored as `yes`, `no` or `ceremony_only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attendance {
    #[serde(rename = "yes")]
    Attending,
    #[serde(rename = "no")]
    NotAttending,
    #[serde(rename = "ceremony_only")]
    CeremonyOnly,
}

impl Attendance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attendance::Attending => "yes",
            Attendance::NotAttending => "no",
            Attendance::CeremonyOnly => "ceremony_only",
        }
    }

    /// Read a stored value. Anything that is not `yes` or `ceremony_only` counts as not attending.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "yes" => Attendance::Attending,
            "ceremony_only" => Attendance::CeremonyOnly,
            _ => Attendance::NotAttending,
        }
    }

    /// Swedish status label used in the guest list export
    pub fn label(&self) -> &'static str {
        match self {
            Attendance::Attending => "Kommer",
            Attendance::CeremonyOnly => "Endast vigsel",
            Attendance::NotAttending => "Kommer ej",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attendance {
    type Err = String;

    /// Strict parse, used for form input
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Attendance::Attending),
            "no" => Ok(Attendance::NotAttending),
            "ceremony_only" => Ok(Attendance::CeremonyOnly),
            other => Err(format!("unknown attendance '{other}'")),
        }
    }
}

/// Database request for storing a guest's answer
#[derive(Debug, Clone)]
pub struct RsvpCreateDBRequest {
    pub name: String,
    pub email: String,
    pub attending: Attendance,
    pub wants_speech: bool,
    pub song: Option<String>,
    pub has_dietary: bool,
    /// Always `None` when `has_dietary` is false
    pub dietary: Option<String>,
    pub fun_fact: Option<String>,
}

/// Database response for a guest's answer
#[derive(Debug, Clone, Serialize)]
pub struct RsvpDBResponse {
    pub id: RsvpId,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub attending: Attendance,
    pub wants_speech: bool,
    pub song: Option<String>,
    pub has_dietary: bool,
    pub dietary: Option<String>,
    pub fun_fact: Option<String>,
}

/// Filter for listing answers; results are always newest first
#[derive(Debug, Clone, Default)]
pub struct RsvpFilter {
    pub attending: Option<Attendance>,
}
