//! Chart producer.
//!
//! Returns a fixed chart for any birth moment. The birth fields are echoed
//! and the birth year anchors the dasha sequence; nothing else depends on
//! the input. Swapping in a real ephemeris means replacing this function.

use chrono::Datelike;

use super::{BirthDetails, Body, ChartRecord, DashaPeriod, Dosha, Panchang, PlanetPosition, Sign};

/// Fixed placements, in display order.
const PLACEMENTS: &[(Body, Sign, f64)] = &[
    (Body::Sun, Sign::Aries, 15.23),
    (Body::Moon, Sign::Cancer, 22.78),
    (Body::Mars, Sign::Leo, 5.11),
    (Body::Mercury, Sign::Taurus, 28.01),
    (Body::Jupiter, Sign::Scorpio, 10.99),
    (Body::Venus, Sign::Gemini, 7.45),
    (Body::Saturn, Sign::Aquarius, 1.67),
    (Body::Rahu, Sign::Libra, 8.00),
    (Body::Ketu, Sign::Aries, 8.00),
    (Body::Ascendant, Sign::Virgo, 20.50),
];

/// Dasha lords with offsets (in years) from the birth year.
const DASHA_SEQUENCE: &[(Body, i32, i32)] = &[
    (Body::Moon, 0, 6),
    (Body::Mars, 6, 13),
    (Body::Rahu, 13, 31),
    (Body::Jupiter, 31, 47),
];

/// Produce the chart for a birth moment. Always succeeds.
pub fn calculate_chart(details: &BirthDetails) -> ChartRecord {
    let birth_year = details.dob.year();

    log::debug!("Calculating chart for {} born {}", details.name, details.dob);

    ChartRecord {
        birth_details: details.clone(),
        planet_positions: PLACEMENTS
            .iter()
            .map(|&(body, sign, degree)| PlanetPosition { body, sign, degree })
            .collect(),
        dasha_periods: DASHA_SEQUENCE
            .iter()
            .map(|&(planet, start, end)| DashaPeriod {
                planet,
                start_year: birth_year + start,
                end_year: birth_year + end,
            })
            .collect(),
        basic_panchang: Panchang {
            tithi: "Shukla Paksha Dashami".into(),
            nakshatra: "Purva Phalguni".into(),
            yoga: "Shukla".into(),
            karana: "Garija".into(),
        },
        doshas: vec![Dosha {
            kind: "Mangal Dosha".into(),
            present: true,
            details: "Mars in 7th house from Lagna".into(),
        }],
    }
}
