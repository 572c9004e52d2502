//! Rule-based signal extraction from free text.
//!
//! Summaries, transcripts and operator notes are scanned with a fixed list of
//! pattern rules. Each rule fills one field of a [`SignalBag`]. Extraction is
//! best-effort: it may miss or over-match, but it never fails.

pub mod extract;
mod patterns;

use serde::{Deserialize, Serialize};

pub use extract::{extract, extract_record};

/// Hazard category recognized in text. Declaration order is match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardType {
    CarbonMonoxide,
    Gas,
    Electrical,
    Fire,
    Water,
}

impl HazardType {
    /// Priority order in which phrase groups are evaluated.
    pub const PRIORITY: [HazardType; 5] = [
        HazardType::CarbonMonoxide,
        HazardType::Gas,
        HazardType::Electrical,
        HazardType::Fire,
        HazardType::Water,
    ];

    /// Short noun phrase for headlines ("Gas leak reported").
    pub fn describe(&self) -> &'static str {
        match self {
            Self::CarbonMonoxide => "Carbon monoxide alarm",
            Self::Gas => "Gas leak",
            Self::Electrical => "Electrical hazard",
            Self::Fire => "Fire or smoke",
            Self::Water => "Active water leak",
        }
    }

    /// Display tag label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CarbonMonoxide => "CO Alert",
            Self::Gas => "Gas Leak",
            Self::Electrical => "Electrical Fire",
            Self::Fire => "Fire",
            Self::Water => "Flooding",
        }
    }

    /// Gas, CO, electrical and fire threaten life directly; water does not.
    pub fn is_life_safety(&self) -> bool {
        !matches!(self, Self::Water)
    }
}

/// Structured facts pulled from one block of free text.
///
/// All fields default to absent/empty. List fields are ordered by first
/// appearance and deduplicated case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalBag {
    pub hazard_type: Option<HazardType>,
    pub evacuation_needed: bool,
    pub shut_off_action: Option<String>,
    pub occupants: Vec<String>,
    pub equipment_make: Option<String>,
    pub equipment_age: Option<u32>,
    pub refrigerant_type: Option<String>,
    pub unit_location: Option<String>,
    pub gate_code: Option<String>,
    pub pet_warning: Option<String>,
    pub key_location: Option<String>,
    pub access_notes: Vec<String>,
    pub quotes: Vec<String>,
    pub sentiment_keywords: Vec<String>,
    pub urgency_keywords: Vec<String>,
    pub financing_mentioned: bool,
    pub replacement_mentioned: bool,
    pub competitor_mention: Option<String>,
    pub problem_keywords: Vec<String>,
    pub prior_attempt: Option<String>,
}

impl SignalBag {
    /// True when nothing was extracted (signal starvation).
    pub fn is_empty(&self) -> bool {
        *self == SignalBag::default()
    }

    /// Any site-access detail a technician would need on arrival.
    pub fn has_access_details(&self) -> bool {
        self.gate_code.is_some()
            || self.pet_warning.is_some()
            || self.key_location.is_some()
            || self.unit_location.is_some()
            || !self.access_notes.is_empty()
    }

    /// Any equipment or purchase-intent detail.
    pub fn has_equipment_details(&self) -> bool {
        self.equipment_make.is_some()
            || self.equipment_age.is_some()
            || self.replacement_mentioned
            || self.refrigerant_type.is_some()
    }

    /// Push `value` onto `list` unless already present (case-insensitive).
    pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if !list.iter().any(|v| v.eq_ignore_ascii_case(value)) {
            list.push(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bag_is_empty() {
        assert!(SignalBag::default().is_empty());
        let bag = SignalBag {
            financing_mentioned: true,
            ..Default::default()
        };
        assert!(!bag.is_empty());
    }

    #[test]
    fn equipment_details_ignore_access_and_financing() {
        let access = SignalBag {
            gate_code: Some("4521".to_string()),
            financing_mentioned: true,
            ..Default::default()
        };
        assert!(access.has_access_details());
        assert!(!access.has_equipment_details());

        let refrigerant = SignalBag {
            refrigerant_type: Some("R-22".to_string()),
            ..Default::default()
        };
        assert!(refrigerant.has_equipment_details());
    }

    #[test]
    fn push_unique_dedupes_case_insensitively() {
        let mut list = Vec::new();
        SignalBag::push_unique(&mut list, "Baby");
        SignalBag::push_unique(&mut list, "baby");
        SignalBag::push_unique(&mut list, "  ");
        SignalBag::push_unique(&mut list, "elderly");
        assert_eq!(list, vec!["Baby".to_string(), "elderly".to_string()]);
    }

    #[test]
    fn hazard_priority_starts_with_co() {
        assert_eq!(HazardType::PRIORITY[0], HazardType::CarbonMonoxide);
        assert_eq!(HazardType::PRIORITY[4], HazardType::Water);
        assert!(!HazardType::Water.is_life_safety());
    }

    #[test]
    fn hazard_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&HazardType::CarbonMonoxide).unwrap(),
            "\"carbon_monoxide\""
        );
    }
}
