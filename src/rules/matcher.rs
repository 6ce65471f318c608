//! Rule matcher.
//!
//! The checks below are the complete rule vocabulary: there is no general
//! rule grammar. Each check reads one chart field and one rule key path; if
//! the key path is absent the sentence is left out.

use crate::chart::{ChartRecord, Sign};

use super::RuleSet;

/// Ordered short sentences handed to the narrative rewriter.
pub type Prediction = Vec<String>;

const DASHA_OUTLOOK: &str = "Planetary periods (Dashas) indicate dynamic shifts ahead.";
const VASTU_OUTLOOK: &str = "Vastu principles suggest alignment with cosmic energies.";

/// Match a chart against the loaded rules.
///
/// Never fails. The three opening sentences and the two closing sentences
/// are always present; rule-backed sentences sit between them in a fixed
/// order (house, dosha, general).
pub fn match_rules(chart: &ChartRecord, rules: &RuleSet) -> Prediction {
    let name = &chart.birth_details.name;
    let moon_sign = chart.moon_sign();
    let ascendant_sign = chart.ascendant_sign();

    let mut predictions = vec![
        format!("Analyzing {}'s chart...", name),
        format!(
            "Moon is strongly placed in the sign of {}.",
            display_sign(moon_sign)
        ),
        format!("Ascendant is in {}.", display_sign(ascendant_sign)),
    ];

    if moon_sign == Some(Sign::Cancer) {
        if let Some(effect) = rules.lookup_str("house_rules", &["moon_in_cancer", "effect"]) {
            predictions.push(format!("Rule: Moon in Cancer suggests '{}'.", effect));
        }
    }

    if chart.first_dosha_present() {
        if let Some(effect) = rules.lookup_str("dosha_rules", &["mangal_dosha", "effect"]) {
            predictions.push(format!("Dosha: Mangal Dosha present. {}.", effect));
        }
    }

    if let Some(summary) =
        rules.lookup_str("general_predictions", &["life_path_summary", "summary"])
    {
        predictions.push(format!("General outlook: {}", summary));
    }

    predictions.push(DASHA_OUTLOOK.to_string());
    predictions.push(VASTU_OUTLOOK.to_string());

    log::debug!("Matched rules against chart: {} predictions", predictions.len());
    predictions
}

fn display_sign(sign: Option<Sign>) -> String {
    sign.map_or_else(|| "an unknown sign".to_string(), |s| s.to_string())
}
