//! Birth details and the astrological chart derived from them.
//!
//! - [`birth`] - Raw form input, validation, and the immutable [`BirthDetails`]
//! - [`calculator`] - The chart producer ([`calculate_chart`])
//!
//! The chart is a mock: planetary content is fixed and only the birth fields
//! (and the birth year, for dasha boundaries) flow into the record.

pub mod birth;
pub mod calculator;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use birth::{BirthDetails, BirthDetailsError, BirthDetailsForm};
pub use calculator::calculate_chart;

// ---------------------------------------------------------------------------
// Bodies and signs
// ---------------------------------------------------------------------------

/// A point placed in the chart: the nine grahas plus the ascendant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    /// North lunar node.
    Rahu,
    /// South lunar node.
    Ketu,
    Ascendant,
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mars => "Mars",
            Self::Mercury => "Mercury",
            Self::Jupiter => "Jupiter",
            Self::Venus => "Venus",
            Self::Saturn => "Saturn",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
            Self::Ascendant => "Ascendant",
        };
        f.write_str(name)
    }
}

/// Zodiac sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Chart record
// ---------------------------------------------------------------------------

/// Sign and degree of a single body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub body: Body,
    pub sign: Sign,
    /// Degree within the sign.
    pub degree: f64,
}

/// A planetary period attributed to the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashaPeriod {
    pub planet: Body,
    pub start_year: i32,
    pub end_year: i32,
}

/// Panchang summary for the birth moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panchang {
    pub tithi: String,
    pub nakshatra: String,
    pub yoga: String,
    pub karana: String,
}

/// A named chart condition flagged present or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dosha {
    #[serde(rename = "type")]
    pub kind: String,
    pub present: bool,
    pub details: String,
}

/// Everything the rule matcher reads about a birth moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// The submitted birth fields, echoed verbatim.
    pub birth_details: BirthDetails,
    /// Positions in display order.
    pub planet_positions: Vec<PlanetPosition>,
    pub dasha_periods: Vec<DashaPeriod>,
    pub basic_panchang: Panchang,
    pub doshas: Vec<Dosha>,
}

impl ChartRecord {
    /// Look up the position of a body, if the chart places it.
    pub fn position(&self, body: Body) -> Option<&PlanetPosition> {
        self.planet_positions.iter().find(|p| p.body == body)
    }

    /// Sign occupied by the Moon.
    pub fn moon_sign(&self) -> Option<Sign> {
        self.position(Body::Moon).map(|p| p.sign)
    }

    /// Sign rising at the birth moment.
    pub fn ascendant_sign(&self) -> Option<Sign> {
        self.position(Body::Ascendant).map(|p| p.sign)
    }

    /// Whether the first listed dosha is flagged present.
    ///
    /// Only the first entry is consulted; an empty list counts as absent.
    pub fn first_dosha_present(&self) -> bool {
        self.doshas.first().map_or(false, |d| d.present)
    }
}
