//! Narrative synthesis: a short headline, optional subtext and UI warnings.
//!
//! Each archetype has an ordered chain of candidate builders, tried in turn:
//! a Full template over extracted signals, then a Fallback template over
//! fields every record has. The first non-empty headline wins, so a record
//! with no usable text still gets a sentence.

mod templates;
mod warnings;

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::signals::SignalBag;
use crate::types::{Archetype, NarrativeResult, NarrativeTier, Record, RecordKind};
use crate::util::{clean_summary, is_placeholder, truncate_at_sentence};

pub use warnings::{highlight_for, warnings_for};

/// Inputs shared by every template builder.
pub(crate) struct NarrativeContext<'a> {
    pub record: &'a Record,
    pub bag: &'a SignalBag,
    pub now: DateTime<Utc>,
    pub config: &'a EngineConfig,
}

/// A builder's output before warnings and highlight are attached.
pub(crate) struct Draft {
    pub headline: String,
    pub subtext: Option<String>,
}

type Builder = fn(&NarrativeContext<'_>) -> Option<Draft>;

const HAZARD_CHAIN: &[(NarrativeTier, Builder)] = &[
    (NarrativeTier::Full, templates::hazard_full as Builder),
    (NarrativeTier::Fallback, templates::hazard_fallback as Builder),
];

const RECOVERY_CHAIN: &[(NarrativeTier, Builder)] = &[
    (NarrativeTier::Full, templates::recovery_full as Builder),
    (NarrativeTier::Fallback, templates::recovery_fallback as Builder),
];

const REVENUE_CHAIN: &[(NarrativeTier, Builder)] = &[
    (NarrativeTier::Full, templates::revenue_full as Builder),
    (NarrativeTier::Fallback, templates::revenue_fallback as Builder),
];

const LOGISTICS_CHAIN: &[(NarrativeTier, Builder)] = &[
    (NarrativeTier::Full, templates::logistics_full as Builder),
    (NarrativeTier::Fallback, templates::logistics_fallback as Builder),
];

fn chain(archetype: Archetype) -> &'static [(NarrativeTier, Builder)] {
    match archetype {
        Archetype::Hazard => HAZARD_CHAIN,
        Archetype::Recovery => RECOVERY_CHAIN,
        Archetype::Revenue => REVENUE_CHAIN,
        Archetype::Logistics => LOGISTICS_CHAIN,
    }
}

/// Build the narrative for a record from its extracted signals.
///
/// `bag` of `None` is treated as an empty bag. The headline is never empty.
pub fn narrate(
    record: &Record,
    archetype: Archetype,
    bag: Option<&SignalBag>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> NarrativeResult {
    let empty = SignalBag::default();
    let bag = bag.unwrap_or(&empty);
    let ctx = NarrativeContext {
        record,
        bag,
        now,
        config,
    };

    let (tier, draft) = chain(archetype)
        .iter()
        .find_map(|(tier, build)| {
            build(&ctx)
                .filter(|d| !d.headline.trim().is_empty())
                .map(|d| (*tier, d))
        })
        .unwrap_or_else(|| (NarrativeTier::Fallback, last_resort(record)));

    if tier == NarrativeTier::Fallback {
        log::debug!(
            "record {}: {} narrative fell back to generic template",
            record.id,
            archetype.label()
        );
    }

    NarrativeResult {
        headline: draft.headline,
        subtext: draft.subtext,
        warnings: warnings_for(record, archetype, bag, config),
        highlight: highlight_for(record, archetype, bag),
        tier,
    }
}

/// Like [`narrate`], but prefers the record's own AI summary when it is
/// substantive: longer than `summary_min_chars` after cleaning and not a
/// placeholder. The summary is cut at a sentence end near
/// `summary_target_chars`.
pub fn narrate_inline(
    record: &Record,
    archetype: Archetype,
    bag: Option<&SignalBag>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> NarrativeResult {
    match usable_summary(record, config) {
        Some(summary) => {
            let empty = SignalBag::default();
            let bag = bag.unwrap_or(&empty);
            NarrativeResult {
                headline: truncate_at_sentence(&summary, config.narrative.summary_target_chars),
                subtext: None,
                warnings: warnings_for(record, archetype, bag, config),
                highlight: highlight_for(record, archetype, bag),
                tier: NarrativeTier::Summary,
            }
        }
        None => narrate(record, archetype, bag, now, config),
    }
}

fn usable_summary(record: &Record, config: &EngineConfig) -> Option<String> {
    let cleaned = clean_summary(record.ai_summary.as_deref()?)?;
    if cleaned.chars().count() <= config.narrative.summary_min_chars || is_placeholder(&cleaned) {
        return None;
    }
    Some(cleaned)
}

fn last_resort(record: &Record) -> Draft {
    let kind = match record.kind {
        RecordKind::Lead => "lead",
        RecordKind::Job => "job",
    };
    Draft {
        headline: format!("New {} needs review", kind),
        subtext: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::extract;
    use crate::types::UrgencyLevel;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 5, 15, 0, 0).unwrap()
    }

    fn record() -> Record {
        Record::new("n-1", now() - Duration::hours(1))
    }

    #[test]
    fn test_all_absent_record_never_has_empty_headline() {
        let r = record();
        for archetype in Archetype::PRECEDENCE {
            let n = narrate(&r, archetype, None, now(), &EngineConfig::default());
            assert!(!n.headline.trim().is_empty(), "{:?}", archetype);
            assert_eq!(n.tier, NarrativeTier::Fallback);
            let inline = narrate_inline(&r, archetype, None, now(), &EngineConfig::default());
            assert!(!inline.headline.trim().is_empty());
        }
    }

    #[test]
    fn test_logistics_fallback_mentions_customer_name() {
        let mut r = record();
        r.customer_name = Some("Dana Ruiz".to_string());
        r.phone = Some("555-0100".to_string());
        r.address = Some("12 Elm St, Springfield, IL".to_string());
        let n = narrate(&r, Archetype::Logistics, None, now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Fallback);
        assert_eq!(n.headline, "Service request from Dana Ruiz");
        assert!(n.subtext.unwrap().contains("confirm scope"));
        assert!(n.warnings.is_empty());
    }

    #[test]
    fn test_hazard_full_template() {
        let mut r = record();
        r.urgency = Some(UrgencyLevel::Emergency);
        r.address = Some("881 Birch Rd, Lakewood".to_string());
        r.phone = Some("555-0101".to_string());
        let bag = extract(Some(
            "Customer smells gas near the furnace and evacuated the house",
        ));
        let n = narrate(&r, Archetype::Hazard, Some(&bag), now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Full);
        assert_eq!(n.headline, "Gas leak, evacuation advised");
        assert_eq!(
            n.subtext.as_deref(),
            Some("At 881 Birch Rd, Lakewood. Called today.")
        );
        assert!(n.highlight);
        assert!(n.warnings.is_empty());
    }

    #[test]
    fn test_hazard_fallback_is_explicit_about_missing_detail() {
        let mut r = record();
        r.urgency = Some(UrgencyLevel::High);
        r.priority_reason = Some("Caller said something is wrong with the furnace".to_string());
        let n = narrate(&r, Archetype::Hazard, Some(&SignalBag::default()), now(), &EngineConfig::default());
        assert_eq!(n.headline, "Urgent safety call from an unknown caller");
        let subtext = n.subtext.unwrap();
        assert!(subtext.starts_with("Caller said something is wrong with the furnace."));
        assert!(subtext.contains("Hazard type not identified"));
        assert_eq!(n.warnings[0].field, "address");
    }

    #[test]
    fn test_recovery_prefers_quote() {
        let mut r = record();
        r.customer_name = Some("Sam Ortiz".to_string());
        let bag = extract(Some(
            r#"Very frustrated. "Third time this month the AC quit on us" and got a quote from acme air."#,
        ));
        let n = narrate(&r, Archetype::Recovery, Some(&bag), now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Full);
        assert_eq!(n.headline, "Sam Ortiz: \"Third time this month the AC quit on us\"");
        assert!(n.subtext.unwrap().contains("Mentioned a quote from acme air."));
    }

    #[test]
    fn test_recovery_uses_sentiment_keyword_without_quote() {
        let bag = extract(Some("Customer is furious about the last visit"));
        let n = narrate(&record(), Archetype::Recovery, Some(&bag), now(), &EngineConfig::default());
        assert_eq!(n.headline, "Customer is upset (\"furious\")");
    }

    #[test]
    fn test_revenue_mentions_aging_equipment() {
        let bag = extract(Some(
            "Carrier unit is 15 years old, wants a replacement, asked about financing",
        ));
        let mut r = record();
        r.estimated_value = Some(12_000.0);
        let n = narrate(&r, Archetype::Revenue, Some(&bag), now(), &EngineConfig::default());
        assert_eq!(
            n.headline,
            "Aging 15-year-old Carrier unit, replacement interest and asking about financing"
        );
        assert!(n.subtext.unwrap().starts_with("Estimated $12,000."));
    }

    #[test]
    fn test_young_equipment_is_not_aging() {
        let bag = extract(Some("Lennox is 5 years old"));
        let n = narrate(&record(), Archetype::Revenue, Some(&bag), now(), &EngineConfig::default());
        assert_eq!(n.headline, "5-year-old Lennox unit opportunity");
    }

    #[test]
    fn test_revenue_full_needs_equipment_or_intent() {
        let financing = SignalBag {
            financing_mentioned: true,
            ..Default::default()
        };
        let n = narrate(&record(), Archetype::Revenue, Some(&financing), now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Full);
        assert!(n.headline.starts_with("Asking about financing"));

        let nothing = SignalBag {
            gate_code: Some("4521".to_string()),
            ..Default::default()
        };
        let n = narrate(&record(), Archetype::Revenue, Some(&nothing), now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Fallback);
    }

    #[test]
    fn test_logistics_full_uses_access_details() {
        let mut r = record();
        r.customer_name = Some("Lee Park".to_string());
        r.address = Some("4 Pine Ct, Fairview, OR".to_string());
        let bag = extract(Some("Not cooling. Gate code 4521, beware of dog."));
        let n = narrate(&r, Archetype::Logistics, Some(&bag), now(), &EngineConfig::default());
        assert_eq!(n.headline, "Not cooling in Fairview, Lee Park");
        let subtext = n.subtext.unwrap();
        assert!(subtext.starts_with("Gate code 4521. Pet: beware of dog."));
        assert_eq!(n.warnings[0].field, "access");
    }

    #[test]
    fn test_inline_prefers_clean_summary() {
        let mut r = record();
        r.ai_summary = Some(
            "[EMERGENCY] Summary: Furnace short cycling and the house is down to 55 degrees. \
             Customer has two small kids at home and wants someone out before tonight."
                .to_string(),
        );
        let n = narrate_inline(&r, Archetype::Logistics, None, now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Summary);
        assert_eq!(
            n.headline,
            "Furnace short cycling and the house is down to 55 degrees."
        );
    }

    #[test]
    fn test_inline_skips_trivial_summary() {
        let mut r = record();
        r.ai_summary = Some("[LEAD] HVAC".to_string());
        let n = narrate_inline(&r, Archetype::Logistics, None, now(), &EngineConfig::default());
        assert_eq!(n.tier, NarrativeTier::Fallback);

        r.ai_summary = Some("No heat at all".to_string());
        let n = narrate_inline(&r, Archetype::Logistics, None, now(), &EngineConfig::default());
        assert_ne!(n.tier, NarrativeTier::Summary);
    }

    #[test]
    fn test_time_phrase_counts_days() {
        let mut r = record();
        r.created_at = now() - Duration::days(3);
        let n = narrate(&r, Archetype::Logistics, None, now(), &EngineConfig::default());
        assert!(n.subtext.unwrap().ends_with("Called 3 days ago."));
    }

    #[test]
    fn test_job_mentions_visit_date() {
        let mut r = record();
        r.kind = RecordKind::Job;
        r.scheduled_at = Some(Utc.with_ymd_and_hms(2026, 3, 9, 14, 0, 0).unwrap());
        let n = narrate(&r, Archetype::Logistics, None, now(), &EngineConfig::default());
        assert!(n.subtext.unwrap().ends_with("Booked today. Visit Mar 9."));
    }

    #[test]
    fn test_narration_is_deterministic() {
        let mut r = record();
        r.ai_summary = Some("Gas smell in the basement, baby at home".to_string());
        let bag = extract(r.ai_summary.as_deref());
        let config = EngineConfig::default();
        let a = narrate(&r, Archetype::Hazard, Some(&bag), now(), &config);
        let b = narrate(&r, Archetype::Hazard, Some(&bag), now(), &config);
        assert_eq!(a, b);
    }
}
