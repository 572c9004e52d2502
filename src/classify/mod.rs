//! Archetype classification.
//!
//! Precedence (first match wins):
//!   1. Hazard: urgency emergency/high, or any hazard tag
//!   2. Recovery: red priority color, or any recovery tag
//!   3. Revenue: replacement/major-repair tier, value at or over threshold,
//!      green priority color, or any revenue tag
//!   4. Logistics: everything else
//!
//! Recovery is evaluated before Revenue. An unhappy customer with a large
//! ticket is worked as a recovery first; swapping the two rules is a bug.

pub mod tags;

use crate::config::EngineConfig;
use crate::signals::SignalBag;
use crate::types::{Archetype, PriorityColor, Record, RevenueTier, UrgencyLevel};
use crate::vocabulary::{HAZARD_TRIGGERS, RECOVERY_TRIGGERS, REVENUE_TRIGGERS};

pub use tags::display_tags;

/// Classify from structured fields alone.
pub fn classify(record: &Record, config: &EngineConfig) -> Archetype {
    let (archetype, reason) = decide(record, None, config);
    log::debug!("record {}: {} ({})", record.id, archetype.label(), reason);
    archetype
}

/// Classify from structured fields, letting a life-safety hazard found in the
/// record's text count as a hazard match when `promote_text_hazards` is set.
pub fn classify_with_signals(record: &Record, bag: &SignalBag, config: &EngineConfig) -> Archetype {
    let (archetype, reason) = decide(record, Some(bag), config);
    log::debug!("record {}: {} ({})", record.id, archetype.label(), reason);
    archetype
}

fn decide(
    record: &Record,
    bag: Option<&SignalBag>,
    config: &EngineConfig,
) -> (Archetype, &'static str) {
    let tags = &record.category_tags;

    // ---- Step 1: Hazard ----
    if matches!(
        record.urgency,
        Some(UrgencyLevel::Emergency) | Some(UrgencyLevel::High)
    ) {
        return (Archetype::Hazard, "urgency");
    }
    if tags.has_hazard(HAZARD_TRIGGERS) {
        return (Archetype::Hazard, "hazard tag");
    }
    if config.promote_text_hazards
        && bag
            .and_then(|b| b.hazard_type)
            .is_some_and(|h| h.is_life_safety())
    {
        return (Archetype::Hazard, "hazard in text");
    }

    // ---- Step 2: Recovery (before Revenue) ----
    if record.priority_color == Some(PriorityColor::Red) {
        return (Archetype::Recovery, "red priority color");
    }
    if tags.has_recovery(RECOVERY_TRIGGERS) {
        return (Archetype::Recovery, "recovery tag");
    }

    // ---- Step 3: Revenue ----
    if matches!(
        record.revenue_tier,
        Some(RevenueTier::Replacement) | Some(RevenueTier::MajorRepair)
    ) {
        return (Archetype::Revenue, "revenue tier");
    }
    if record
        .estimated_value
        .is_some_and(|v| v >= config.revenue_value_threshold)
    {
        return (Archetype::Revenue, "estimated value");
    }
    if record.priority_color == Some(PriorityColor::Green) {
        return (Archetype::Revenue, "green priority color");
    }
    if tags.has_revenue(REVENUE_TRIGGERS) {
        return (Archetype::Revenue, "revenue tag");
    }

    // ---- Step 4: Logistics ----
    (Archetype::Logistics, "default")
}
