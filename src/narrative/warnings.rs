//! UI warnings and the highlight flag. Independent of template tier.

use crate::config::EngineConfig;
use crate::signals::SignalBag;
use crate::types::{Archetype, Record, UiWarning, WarningKind};
use crate::vocabulary::REPUTATION_THREAT_TAGS;

fn warning(kind: WarningKind, field: &str, message: String, icon: &str) -> UiWarning {
    UiWarning {
        kind,
        field: field.to_string(),
        message,
        icon: Some(icon.to_string()),
    }
}

pub fn warnings_for(
    record: &Record,
    archetype: Archetype,
    bag: &SignalBag,
    config: &EngineConfig,
) -> Vec<UiWarning> {
    let mut out = Vec::new();

    if archetype == Archetype::Hazard {
        let address_ok = record
            .display_address()
            .is_some_and(|a| a.chars().count() >= config.narrative.min_address_chars);
        if !address_ok {
            out.push(warning(
                WarningKind::Unverified,
                "address",
                "Address unverified: confirm location before dispatch".to_string(),
                "map-pin-off",
            ));
        }
        if !bag.occupants.is_empty() {
            out.push(warning(
                WarningKind::Info,
                "occupants",
                format!("Occupants present: {}", bag.occupants.join(", ")),
                "users",
            ));
        }
    }

    if archetype == Archetype::Logistics {
        if let Some(pet) = &bag.pet_warning {
            out.push(warning(
                WarningKind::Caution,
                "access",
                format!("Pet on site: {}", pet),
                "dog",
            ));
        }
    }

    let has_phone = record
        .phone
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    if !has_phone {
        out.push(warning(
            WarningKind::Missing,
            "phone",
            "No callback number on file".to_string(),
            "phone-off",
        ));
    }

    out
}

/// Hazard with evacuation, or Recovery with a review or legal threat.
pub fn highlight_for(record: &Record, archetype: Archetype, bag: &SignalBag) -> bool {
    match archetype {
        Archetype::Hazard => bag.evacuation_needed,
        Archetype::Recovery => record.category_tags.has_recovery(REPUTATION_THREAT_TAGS),
        Archetype::Revenue | Archetype::Logistics => false,
    }
}
