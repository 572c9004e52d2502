//! One-call pipeline: extract, classify, tag, score and narrate a record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{classify_with_signals, display_tags};
use crate::config::EngineConfig;
use crate::narrative::{narrate, narrate_inline};
use crate::scoring::{compare_ranked, score_breakdown, ScoreBreakdown};
use crate::signals::{extract_record, SignalBag};
use crate::types::{Archetype, DisplayTag, NarrativeResult, Record};

/// Everything the UI needs to render one row, derived fresh per read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageView {
    pub id: String,
    pub archetype: Archetype,
    pub score: f64,
    pub tags: Vec<DisplayTag>,
    pub narrative: NarrativeResult,
    /// Compact variant that prefers the record's own AI summary.
    pub inline: NarrativeResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<SignalBag>,
}

/// Engine bound to a configuration. Holds no per-record state.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    config: EngineConfig,
    explain: bool,
}

impl TriageEngine {
    pub fn new(config: EngineConfig) -> Self {
        TriageEngine {
            config,
            explain: false,
        }
    }

    /// Attach the score breakdown and signal bag to every view.
    pub fn explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn triage(&self, record: &Record, now: DateTime<Utc>) -> TriageView {
        let config = &self.config;
        let bag = extract_record(record);
        let archetype = classify_with_signals(record, &bag, config);
        let breakdown = score_breakdown(record, archetype, now, config);
        let tags = display_tags(record, archetype, Some(&bag), config);
        let narrative = narrate(record, archetype, Some(&bag), now, config);
        let inline = narrate_inline(record, archetype, Some(&bag), now, config);

        TriageView {
            id: record.id.clone(),
            archetype,
            score: breakdown.total,
            tags,
            narrative,
            inline,
            breakdown: self.explain.then_some(breakdown),
            signals: self.explain.then_some(bag),
        }
    }

    /// Views for all records, in rank order.
    pub fn triage_all(&self, records: &[Record], now: DateTime<Utc>) -> Vec<TriageView> {
        let mut views: Vec<(&Record, TriageView)> =
            records.iter().map(|r| (r, self.triage(r, now))).collect();
        views.sort_by(|(ra, a), (rb, b)| compare_ranked(a.score, ra, b.score, rb));
        log::debug!("triaged {} records", views.len());
        views.into_iter().map(|(_, view)| view).collect()
    }
}

pub fn triage(record: &Record, now: DateTime<Utc>, config: &EngineConfig) -> TriageView {
    TriageEngine::new(config.clone()).triage(record, now)
}

pub fn triage_all(records: &[Record], now: DateTime<Utc>, config: &EngineConfig) -> Vec<TriageView> {
    TriageEngine::new(config.clone()).triage_all(records, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::scoring::rank;
    use crate::signals::HazardType;
    use crate::types::{PriorityColor, RevenueTier, UrgencyLevel};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap()
    }

    fn record(id: &str) -> Record {
        let mut r = Record::new(id, now() - Duration::hours(1));
        r.phone = Some("555-0100".to_string());
        r
    }

    #[test]
    fn test_hazard_scenario_end_to_end() {
        let mut r = record("gas");
        r.created_at = now();
        r.urgency = Some(UrgencyLevel::Emergency);
        r.ai_summary = Some("Customer smells gas near the furnace and evacuated the house".to_string());

        let view = TriageEngine::new(EngineConfig::default())
            .explain(true)
            .triage(&r, now());
        let bag = view.signals.as_ref().unwrap();
        assert_eq!(bag.hazard_type, Some(HazardType::Gas));
        assert!(bag.evacuation_needed);
        assert_eq!(view.archetype, Archetype::Hazard);
        assert!(view.score >= 1030.0);
        assert!(view.narrative.highlight);
        assert!(view.breakdown.is_some());
    }

    #[test]
    fn test_recovery_beats_revenue_end_to_end() {
        let mut r = record("rec");
        r.priority_color = Some(PriorityColor::Red);
        r.revenue_tier = Some(RevenueTier::Replacement);
        r.estimated_value = Some(12_000.0);
        let view = triage(&r, now(), &EngineConfig::default());
        assert_eq!(view.archetype, Archetype::Recovery);
        assert!(view.breakdown.is_none());
        assert!(view.signals.is_none());
    }

    #[test]
    fn test_text_alone_does_not_change_archetype_by_default() {
        let mut r = record("smoke");
        r.priority_color = Some(PriorityColor::Red);
        r.ai_summary =
            Some("Customer upset the tech left a mess; smoke detector keeps chirping".to_string());
        let config = EngineConfig::default();

        let view = triage(&r, now(), &config);
        assert_eq!(view.archetype, Archetype::Recovery);
        assert_eq!(view.archetype, classify(&r, &config));
        assert!(view.score < config.scoring.hazard_base);

        let opted_in = EngineConfig {
            promote_text_hazards: true,
            ..EngineConfig::default()
        };
        assert_eq!(extract_record(&r).hazard_type, Some(HazardType::Fire));
        assert_eq!(triage(&r, now(), &opted_in).archetype, Archetype::Hazard);
    }

    #[test]
    fn test_triage_all_matches_rank_order() {
        let config = EngineConfig::default();
        let mut hazard = record("h");
        hazard.urgency = Some(UrgencyLevel::High);
        let mut revenue = record("v");
        revenue.estimated_value = Some(1800.0);
        let mut recovery = record("r");
        recovery.priority_color = Some(PriorityColor::Red);
        let logistics = record("l");
        let records = vec![logistics, revenue, hazard, recovery];

        let views = triage_all(&records, now(), &config);
        let view_ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(view_ids, vec!["h", "r", "v", "l"]);

        let ranked_ids: Vec<&str> = rank(&records, now(), &config)
            .iter()
            .map(|(r, _)| r.id.as_str())
            .collect();
        assert_eq!(view_ids, ranked_ids);
    }

    #[test]
    fn test_triage_is_idempotent() {
        let mut r = record("idem");
        r.ai_summary = Some("Gate code 1234, not cooling upstairs".to_string());
        r.address = Some("9 Ash Ln, Dover, DE".to_string());
        let before = r.clone();
        let config = EngineConfig::default();
        let a = triage(&r, now(), &config);
        let b = triage(&r, now(), &config);
        assert_eq!(a, b);
        assert_eq!(r, before);
        assert!(a.tags.len() <= config.tag_cap);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let view = triage(&record("json"), now(), &EngineConfig::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["archetype"], "logistics");
        assert!(json.get("inline").is_some());
        assert!(json.get("createdAt").is_none());
        assert!(json.get("breakdown").is_none());
    }
}
