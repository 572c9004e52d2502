//! Pattern-rule extraction of a [`SignalBag`] from one block of text.

use regex::Regex;

use super::patterns::{self, EQUIPMENT_BRANDS};
use super::{HazardType, SignalBag};
use crate::types::Record;

/// Scan `text` and return every signal the pattern rules recognize.
///
/// Absent or blank input yields an empty bag. Scalar fields take the first
/// match; list fields keep first-appearance order without duplicates.
pub fn extract(text: Option<&str>) -> SignalBag {
    let original = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return SignalBag::default(),
    };
    let lower = original.to_lowercase();
    let mut bag = SignalBag::default();

    // Hazard category: first group in priority order wins.
    bag.hazard_type = HazardType::PRIORITY
        .iter()
        .copied()
        .find(|h| patterns::hazard_regex(*h).is_match(&lower));

    bag.evacuation_needed = match bag.hazard_type {
        Some(HazardType::CarbonMonoxide) => true,
        Some(HazardType::Gas) if patterns::re_exposure().is_match(&lower) => true,
        _ => patterns::re_evacuation().is_match(&lower),
    };

    bag.shut_off_action = first_match(patterns::re_shut_off(), &lower);
    bag.occupants = all_matches(patterns::re_occupant(), &lower);

    bag.equipment_make = patterns::re_brand().find(&lower).and_then(|m| {
        EQUIPMENT_BRANDS
            .iter()
            .find(|(key, _)| *key == m.as_str())
            .map(|(_, display)| display.to_string())
    });
    bag.equipment_age = patterns::re_age()
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    bag.refrigerant_type = patterns::re_refrigerant()
        .captures(&lower)
        .map(|caps| format!("R-{}", caps[1].to_uppercase()));
    bag.unit_location = first_match(patterns::re_unit_location(), &lower);

    bag.gate_code = first_capture(patterns::re_gate_code(), &lower);
    bag.pet_warning = first_match(patterns::re_pet_warning(), &lower);
    bag.key_location = first_capture(patterns::re_key_location(), &lower);
    bag.access_notes = all_matches(patterns::re_access(), &lower);

    for caps in patterns::re_quote().captures_iter(original) {
        if let Some(quote) = caps.get(1).or_else(|| caps.get(2)) {
            SignalBag::push_unique(&mut bag.quotes, quote.as_str());
        }
    }

    bag.sentiment_keywords = all_matches(patterns::re_sentiment(), &lower);
    bag.urgency_keywords = all_matches(patterns::re_urgency(), &lower);
    bag.financing_mentioned = patterns::re_financing().is_match(&lower);
    bag.replacement_mentioned = patterns::re_replacement().is_match(&lower);

    bag.competitor_mention = patterns::re_competitor().captures(&lower).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim().to_string())
    });
    bag.problem_keywords = all_matches(patterns::re_problem(), &lower);
    bag.prior_attempt = first_match(patterns::re_prior_attempt(), &lower);

    bag
}

/// Extract from every free-text field of a record: summary, then reason,
/// then transcript.
pub fn extract_record(record: &Record) -> SignalBag {
    let combined = [
        record.ai_summary.as_deref(),
        record.priority_reason.as_deref(),
        record.transcript.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join("\n");

    let bag = extract(Some(&combined));
    if bag.is_empty() {
        log::debug!("record {}: no signals extracted", record.id);
    }
    bag
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().trim().to_string())
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn all_matches(re: &Regex, text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for m in re.find_iter(text) {
        SignalBag::push_unique(&mut out, m.as_str());
    }
    out
}
