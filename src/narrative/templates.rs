//! Headline templates, one Full and one Fallback builder per archetype.
//!
//! Full builders return `None` when their minimum signal combination is
//! missing. Fallback builders use only fields every record can have and
//! always produce a headline.

use crate::types::{Record, RecordKind};
use crate::util::{
    address_locality, capitalize, clean_summary, format_currency, is_placeholder,
    relative_day_phrase, truncate_at_word,
};

use super::{Draft, NarrativeContext};

/// Longest free-text excerpt placed in a subtext.
const REASON_MAX_CHARS: usize = 90;

// ---------------------------------------------------------------------------
// Shared phrasing
// ---------------------------------------------------------------------------

/// "from Dana Ruiz", "at 12 Elm St", or "from an unknown caller".
fn subject(record: &Record) -> String {
    match (record.display_name(), record.display_address()) {
        (Some(name), _) => format!("from {}", name),
        (None, Some(address)) => format!("at {}", address),
        (None, None) => "from an unknown caller".to_string(),
    }
}

/// Customer name, else "Customer".
fn who(record: &Record) -> &str {
    record.display_name().unwrap_or("Customer")
}

/// "Called today.", "Called 3 days ago.", plus the visit date for jobs.
fn timing(ctx: &NarrativeContext<'_>) -> String {
    let record = ctx.record;
    let verb = match record.kind {
        RecordKind::Lead => "Called",
        RecordKind::Job => "Booked",
    };
    let mut out = format!("{} {}.", verb, relative_day_phrase(record.created_at, ctx.now));
    if let (RecordKind::Job, Some(at)) = (record.kind, record.scheduled_at) {
        out.push_str(&format!(" Visit {}.", at.format("%b %-d")));
    }
    out
}

/// Operator reason, else a usable AI summary, cut at a word boundary.
fn reason_excerpt(record: &Record) -> Option<String> {
    let from_reason = record
        .priority_reason
        .as_deref()
        .and_then(clean_summary)
        .filter(|s| !is_placeholder(s));
    let text = from_reason.or_else(|| {
        record
            .ai_summary
            .as_deref()
            .and_then(clean_summary)
            .filter(|s| !is_placeholder(s))
    })?;
    Some(truncate_at_word(&text, REASON_MAX_CHARS))
}

/// Join non-empty sentences with single spaces.
fn sentences(parts: Vec<String>) -> Option<String> {
    let joined = parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn end_sentence(text: &str) -> String {
    let text = text.trim();
    if text.ends_with(['.', '!', '?', '…']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

/// Generic urgency word for fallback headlines.
fn urgency_word(ctx: &NarrativeContext<'_>) -> String {
    use crate::types::UrgencyLevel;
    match ctx.record.urgency {
        Some(UrgencyLevel::Emergency) => "Emergency".to_string(),
        Some(UrgencyLevel::High) => "Urgent".to_string(),
        _ => ctx
            .bag
            .urgency_keywords
            .first()
            .map(|k| capitalize(k))
            .unwrap_or_else(|| "Possible".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Hazard
// ---------------------------------------------------------------------------

pub(super) fn hazard_full(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let bag = ctx.bag;
    let hazard = bag.hazard_type?;

    let headline = if bag.evacuation_needed {
        format!("{}, evacuation advised", hazard.describe())
    } else if bag.shut_off_action.is_some() {
        format!("{}, supply shut off", hazard.describe())
    } else {
        format!("{} reported", hazard.describe())
    };

    let mut parts = Vec::new();
    if let Some(problem) = bag.problem_keywords.first() {
        parts.push(format!("Caller reports {}.", problem));
    }
    if let Some(action) = &bag.shut_off_action {
        parts.push(format!("{}.", capitalize(action)));
    }
    if !bag.occupants.is_empty() {
        parts.push(format!("On site: {}.", bag.occupants.join(", ")));
    }
    if let Some(address) = ctx.record.display_address() {
        parts.push(format!("At {}.", address));
    }
    parts.push(timing(ctx));

    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

pub(super) fn hazard_fallback(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let headline = format!(
        "{} safety call {}",
        urgency_word(ctx),
        subject(ctx.record)
    );
    let mut parts = Vec::new();
    if let Some(reason) = reason_excerpt(ctx.record) {
        parts.push(end_sentence(&reason));
    }
    parts.push("Hazard type not identified from call notes; confirm on callback.".to_string());
    parts.push(timing(ctx));
    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

pub(super) fn recovery_full(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let bag = ctx.bag;
    let quote_max = ctx.config.narrative.quote_max_chars;

    let headline = if let Some(quote) = bag.quotes.first() {
        format!("{}: \"{}\"", who(ctx.record), truncate_at_word(quote, quote_max))
    } else if let Some(keyword) = bag.sentiment_keywords.first() {
        format!("{} is upset (\"{}\")", who(ctx.record), keyword)
    } else {
        return None;
    };

    let mut parts = Vec::new();
    if let Some(attempt) = &bag.prior_attempt {
        parts.push(end_sentence(&capitalize(attempt)));
    }
    if let Some(problem) = bag.problem_keywords.first() {
        parts.push(format!("Issue: {}.", problem));
    }
    if let Some(competitor) = &bag.competitor_mention {
        parts.push(format!("Mentioned {}.", competitor));
    }
    if let Some(value) = ctx.record.estimated_value.filter(|v| *v > 0.0) {
        parts.push(format!("{} at stake.", format_currency(value)));
    }
    parts.push(timing(ctx));

    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

pub(super) fn recovery_fallback(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let headline = format!("Service recovery needed {}", subject(ctx.record));
    let mut parts = Vec::new();
    if let Some(reason) = reason_excerpt(ctx.record) {
        parts.push(end_sentence(&reason));
    }
    parts.push("Complaint details not captured; review the call before reaching out.".to_string());
    parts.push(timing(ctx));
    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// "aging 15-year-old Carrier unit", "Trane unit", "R-22 system".
fn equipment_phrase(ctx: &NarrativeContext<'_>) -> Option<String> {
    let bag = ctx.bag;
    let old = ctx.config.old_equipment_years;
    let aged = |age: u32| {
        if age >= old {
            format!("aging {}-year-old", age)
        } else {
            format!("{}-year-old", age)
        }
    };
    match (bag.equipment_age, bag.equipment_make.as_deref()) {
        (Some(age), Some(make)) => Some(format!("{} {} unit", aged(age), make)),
        (Some(age), None) => Some(format!("{} unit", aged(age))),
        (None, Some(make)) => Some(format!("{} unit", make)),
        (None, None) => bag.refrigerant_type.as_ref().map(|r| format!("{} system", r)),
    }
}

pub(super) fn revenue_full(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let bag = ctx.bag;
    if !bag.has_equipment_details() && !bag.financing_mentioned {
        return None;
    }
    let equipment = equipment_phrase(ctx);

    let mut intents = Vec::new();
    if bag.replacement_mentioned {
        intents.push("replacement interest");
    }
    if bag.financing_mentioned {
        intents.push("asking about financing");
    }

    let headline = match (&equipment, intents.is_empty()) {
        (Some(unit), true) => format!("{} opportunity", capitalize(unit)),
        (Some(unit), false) => format!("{}, {}", capitalize(unit), intents.join(" and ")),
        (None, _) => format!("{} {}", capitalize(&intents.join(" and ")), subject(ctx.record)),
    };

    let mut parts = Vec::new();
    if let Some(value) = ctx.record.estimated_value.filter(|v| *v > 0.0) {
        parts.push(format!("Estimated {}.", format_currency(value)));
    }
    if bag.refrigerant_type.as_deref() == Some("R-22") && equipment.is_some() {
        parts.push("Runs on R-22 refrigerant.".to_string());
    }
    if let Some(location) = &bag.unit_location {
        parts.push(format!("Unit in the {}.", location));
    }
    if let Some(competitor) = &bag.competitor_mention {
        parts.push(format!("Also has {}.", competitor));
    }
    parts.push(timing(ctx));

    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

pub(super) fn revenue_fallback(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let mut headline = format!("Sales opportunity {}", subject(ctx.record));
    if let Some(value) = ctx.record.estimated_value.filter(|v| *v > 0.0) {
        headline.push_str(&format!(", est. {}", format_currency(value)));
    }
    let mut parts = Vec::new();
    if let Some(reason) = reason_excerpt(ctx.record) {
        parts.push(end_sentence(&reason));
    }
    parts.push("Equipment details not captured; qualify on callback.".to_string());
    parts.push(timing(ctx));
    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

// ---------------------------------------------------------------------------
// Logistics
// ---------------------------------------------------------------------------

pub(super) fn logistics_full(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let bag = ctx.bag;
    let problem = bag.problem_keywords.first();
    if problem.is_none() && !bag.has_access_details() {
        return None;
    }

    let place = ctx
        .record
        .address
        .as_deref()
        .and_then(address_locality)
        .map(|l| format!(" in {}", l))
        .unwrap_or_default();
    let headline = match problem {
        Some(p) => format!("{}{}, {}", capitalize(p), place, who(ctx.record)),
        None => format!("Site visit{}, {}", place, who(ctx.record)),
    };

    let mut parts = Vec::new();
    if let Some(code) = &bag.gate_code {
        parts.push(format!("Gate code {}.", code));
    }
    if let Some(pet) = &bag.pet_warning {
        parts.push(format!("Pet: {}.", pet));
    }
    if let Some(key) = &bag.key_location {
        parts.push(format!("Key {}.", key));
    }
    if let Some(location) = &bag.unit_location {
        parts.push(format!("Unit in the {}.", location));
    }
    if !bag.access_notes.is_empty() {
        parts.push(format!("Access: {}.", bag.access_notes.join(", ")));
    }
    parts.push(timing(ctx));

    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}

pub(super) fn logistics_fallback(ctx: &NarrativeContext<'_>) -> Option<Draft> {
    let service = ctx
        .record
        .service_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(capitalize)
        .unwrap_or_else(|| "Service".to_string());
    let headline = format!("{} request {}", service, subject(ctx.record));
    let mut parts = Vec::new();
    if let Some(reason) = reason_excerpt(ctx.record) {
        parts.push(end_sentence(&reason));
    }
    parts.push("No job details extracted; confirm scope on callback.".to_string());
    parts.push(timing(ctx));
    Some(Draft {
        headline,
        subtext: sentences(parts),
    })
}
