//! Birth detail input and validation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timezone assumed when the caller does not supply one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Reasons a birth-detail submission is rejected before any chart work.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BirthDetailsError {
    /// A required field was absent or blank.
    #[error("Missing required birth detail: {field}")]
    MissingField { field: &'static str },

    /// Date of birth was not `YYYY-MM-DD`.
    #[error("Invalid date of birth '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Time of birth was not `HH:MM` or `HH:MM:SS`.
    #[error("Invalid time of birth '{value}', expected HH:MM")]
    InvalidTime { value: String },
}

/// Raw, unvalidated birth fields as submitted by a form or JSON body.
///
/// Accepts both the snake-case keys (`dob`, `tob`, `pob`) and the camel-case
/// keys sent by the browser form (`birthDate`, `birthTime`, `birthPlace`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BirthDetailsForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, alias = "birthDate", alias = "date_of_birth")]
    pub dob: Option<String>,
    #[serde(default, alias = "birthTime", alias = "time_of_birth")]
    pub tob: Option<String>,
    #[serde(default, alias = "birthPlace", alias = "place_of_birth")]
    pub pob: Option<String>,
    #[serde(default, alias = "timezone_str")]
    pub timezone: Option<String>,
}

impl BirthDetailsForm {
    /// Check every required field and parse date and time.
    ///
    /// Fields are checked in form order, so the first missing one is reported.
    pub fn validate(&self) -> Result<BirthDetails, BirthDetailsError> {
        let name = required(&self.name, "name")?;
        let gender = required(&self.gender, "gender")?;
        let dob_raw = required(&self.dob, "dob")?;
        let tob_raw = required(&self.tob, "tob")?;
        let pob = required(&self.pob, "pob")?;
        let timezone = match &self.timezone {
            None => DEFAULT_TIMEZONE.to_string(),
            Some(_) => required(&self.timezone, "timezone")?,
        };

        Ok(BirthDetails {
            name,
            gender,
            dob: parse_date(&dob_raw)?,
            tob: parse_time(&tob_raw)?,
            pob,
            timezone,
        })
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, BirthDetailsError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(BirthDetailsError::MissingField { field }),
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, BirthDetailsError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BirthDetailsError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// Parse an `HH:MM` or `HH:MM:SS` time.
pub fn parse_time(value: &str) -> Result<NaiveTime, BirthDetailsError> {
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M:%S"))
        .map_err(|_| BirthDetailsError::InvalidTime {
            value: value.to_string(),
        })
}

/// Validated birth details. Immutable once a session has been started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDetails {
    /// Full name.
    pub name: String,
    pub gender: String,
    /// Date of birth.
    pub dob: NaiveDate,
    /// Time of birth (local to `timezone`).
    pub tob: NaiveTime,
    /// Place of birth, free text (e.g. "Kolkata, India").
    pub pob: String,
    /// IANA timezone name, e.g. "Asia/Kolkata".
    pub timezone: String,
}
