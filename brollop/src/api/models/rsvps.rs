//! API models for O.S.A answers: the guest form and the dashboard rows.

use serde::{Deserialize, Serialize};

use crate::db::models::rsvps::{Attendance, RsvpCreateDBRequest, RsvpDBResponse};
use crate::errors::Error;
use crate::types::RsvpId;

/// The O.S.A form as posted by the browser.
///
/// Every field is optional at this layer so a missing field surfaces as a validation error on
/// that field rather than a generic body rejection. Radio groups post `yes`/`no`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RsvpForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub attending: Option<String>,
    pub wants_speech: Option<String>,
    pub song: Option<String>,
    pub has_dietary: Option<String>,
    pub dietary: Option<String>,
    pub fun_fact: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, Error> {
    non_empty(value).ok_or_else(|| Error::Validation {
        field,
        message: "is required".to_string(),
    })
}

fn is_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim() == "yes")
}

impl RsvpForm {
    /// Validate and normalize the form into a storable answer.
    ///
    /// The speech, song, dietary and fun fact fields are only kept for guests who attend the
    /// whole day, and the dietary detail only when specialkost was answered with yes.
    pub fn into_create_request(self) -> Result<RsvpCreateDBRequest, Error> {
        let name = required(self.name, "name")?;

        let email = required(self.email, "email")?;
        if !email.contains('@') {
            return Err(Error::Validation {
                field: "email",
                message: "is not an email address".to_string(),
            });
        }

        let attending: Attendance = required(self.attending, "attending")?
            .parse()
            .map_err(|message| Error::Validation {
                field: "attending",
                message,
            })?;

        if attending != Attendance::Attending {
            return Ok(RsvpCreateDBRequest {
                name,
                email,
                attending,
                wants_speech: false,
                song: None,
                has_dietary: false,
                dietary: None,
                fun_fact: None,
            });
        }

        let has_dietary = is_yes(self.has_dietary.as_deref());
        Ok(RsvpCreateDBRequest {
            name,
            email,
            attending,
            wants_speech: is_yes(self.wants_speech.as_deref()),
            song: non_empty(self.song),
            has_dietary,
            dietary: if has_dietary { non_empty(self.dietary) } else { None },
            fun_fact: non_empty(self.fun_fact),
        })
    }
}

/// Headline numbers on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceCounts {
    pub attending: usize,
    pub ceremony_only: usize,
    pub not_attending: usize,
}

impl AttendanceCounts {
    pub fn from_rsvps(rsvps: &[RsvpDBResponse]) -> Self {
        rsvps.iter().fold(Self::default(), |mut counts, rsvp| {
            match rsvp.attending {
                Attendance::Attending => counts.attending += 1,
                Attendance::CeremonyOnly => counts.ceremony_only += 1,
                Attendance::NotAttending => counts.not_attending += 1,
            }
            counts
        })
    }
}

/// One row of the dashboard guest table, with `-` for missing values
#[derive(Debug, Clone, Serialize)]
pub struct RsvpRow {
    pub id: RsvpId,
    pub name: String,
    pub email: String,
    /// Raw value, used for the badge style
    pub attending: Attendance,
    pub status: &'static str,
    pub speech: &'static str,
    pub diet: String,
    pub song: String,
    pub fun_fact: String,
}

const PLACEHOLDER: &str = "-";

impl From<RsvpDBResponse> for RsvpRow {
    fn from(rsvp: RsvpDBResponse) -> Self {
        let status = match rsvp.attending {
            Attendance::Attending => "Kommer",
            Attendance::CeremonyOnly => "Vigsel",
            Attendance::NotAttending => "Nej",
        };
        let diet = match (rsvp.has_dietary, rsvp.dietary) {
            (true, Some(dietary)) => dietary,
            (true, None) => "Ja".to_string(),
            (false, _) => PLACEHOLDER.to_string(),
        };

        Self {
            id: rsvp.id,
            name: rsvp.name,
            email: rsvp.email,
            attending: rsvp.attending,
            status,
            speech: if rsvp.wants_speech { "Ja" } else { PLACEHOLDER },
            diet,
            song: rsvp.song.unwrap_or_else(|| PLACEHOLDER.to_string()),
            fun_fact: rsvp.fun_fact.unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}
