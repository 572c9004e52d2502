//! Velocity scoring: one real-valued rank key per record.
//!
//! `score = base(archetype) + time adjustment + bonuses`. Bases are spaced so
//! that archetype bands never overlap under the capped adjustments:
//!
//! | archetype | base | max adjustments |
//! |-----------|------|-----------------|
//! | Hazard    | 1000 | +175            |
//! | Recovery  |  700 | +215            |
//! | Revenue   |  400 | +170            |
//! | Logistics |  100 | +85             |
//!
//! The time adjustment grows with record age. A fixed record drifts upward
//! between reads, which keeps old low-priority work from starving.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::classify_with_signals;
use crate::config::{EngineConfig, ScoringConfig};
use crate::signals::extract_record;
use crate::types::{Archetype, Record, RevenueTier, UrgencyLevel};
use crate::vocabulary::{
    HazardTag, RecoveryTag, RevenueTag, ACCOUNT_SCALE_TAGS, REPUTATION_THREAT_TAGS,
    SITE_ENTRY_TAGS, TOXIC_GAS_TAGS, VULNERABLE_OCCUPANT_TAGS,
};

// Hazard
const EMERGENCY_URGENCY_BONUS: f64 = 30.0;
const TOXIC_GAS_BONUS: f64 = 40.0;
const ELECTRICAL_FIRE_BONUS: f64 = 35.0;
const VULNERABLE_OCCUPANT_BONUS: f64 = 20.0;

// Recovery
const HIGH_VALUE_AT_RISK_BONUS: f64 = 40.0;
const REPLACEMENT_TIER_BONUS: f64 = 30.0;
const VERY_NEGATIVE_SENTIMENT_BONUS: f64 = 25.0;
const NEGATIVE_SENTIMENT_BONUS: f64 = 10.0;
const REPUTATION_THREAT_BONUS: f64 = 35.0;
const ESCALATION_BONUS: f64 = 25.0;

// Revenue
const VALUE_DIVISOR: f64 = 100.0;
const VALUE_BONUS_CAP: f64 = 50.0;
const HOT_LEAD_BONUS: f64 = 25.0;
const ACCOUNT_SCALE_BONUS: f64 = 20.0;
const R22_RETROFIT_BONUS: f64 = 15.0;

// Logistics
const SITE_ENTRY_BONUS: f64 = 5.0;

/// One named contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBonus {
    pub reason: &'static str,
    pub points: f64,
}

/// Every component of a record's score, for debugging and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub archetype: Archetype,
    pub base: f64,
    /// Hours since creation, clamped to zero.
    pub age_hours: f64,
    /// Capped time-decay adjustment, including any staleness bonus.
    pub time_adjustment: f64,
    pub bonuses: Vec<ScoreBonus>,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Comma-separated bonus reasons, e.g. "emergency urgency, gas or CO tag".
    pub fn reason(&self) -> String {
        self.bonuses
            .iter()
            .map(|b| b.reason)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Largest amount an archetype can add on top of its base: the decay cap,
/// every bonus at once, and for Logistics the staleness bonus.
pub fn max_adjustment(archetype: Archetype, rates: &ScoringConfig) -> f64 {
    match archetype {
        Archetype::Hazard => {
            rates.hazard_decay.cap
                + EMERGENCY_URGENCY_BONUS
                + TOXIC_GAS_BONUS
                + ELECTRICAL_FIRE_BONUS
                + VULNERABLE_OCCUPANT_BONUS
        }
        Archetype::Recovery => {
            rates.recovery_decay.cap
                + HIGH_VALUE_AT_RISK_BONUS
                + REPLACEMENT_TIER_BONUS
                + VERY_NEGATIVE_SENTIMENT_BONUS.max(NEGATIVE_SENTIMENT_BONUS)
                + REPUTATION_THREAT_BONUS
                + ESCALATION_BONUS
        }
        Archetype::Revenue => {
            rates.revenue_decay.cap
                + VALUE_BONUS_CAP
                + REPLACEMENT_TIER_BONUS
                + HOT_LEAD_BONUS
                + ACCOUNT_SCALE_BONUS
                + R22_RETROFIT_BONUS
        }
        Archetype::Logistics => {
            rates.logistics_decay.cap + rates.logistics_stale_bonus.max(0.0) + SITE_ENTRY_BONUS
        }
    }
}

/// Full pipeline score: extract, classify, then score.
pub fn score(record: &Record, now: DateTime<Utc>, config: &EngineConfig) -> f64 {
    let bag = extract_record(record);
    let archetype = classify_with_signals(record, &bag, config);
    score_for(record, archetype, now, config)
}

/// Score a record under an archetype the caller already computed.
pub fn score_for(
    record: &Record,
    archetype: Archetype,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> f64 {
    score_breakdown(record, archetype, now, config).total
}

pub fn score_breakdown(
    record: &Record,
    archetype: Archetype,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> ScoreBreakdown {
    let rates = &config.scoring;
    let tags = &record.category_tags;
    let hours = record.hours_since_created(now);
    let mut bonuses = Vec::new();
    let mut add = |reason: &'static str, points: f64| {
        if points > 0.0 {
            bonuses.push(ScoreBonus { reason, points });
        }
    };

    let (base, time_adjustment) = match archetype {
        Archetype::Hazard => {
            if record.urgency == Some(UrgencyLevel::Emergency) {
                add("emergency urgency", EMERGENCY_URGENCY_BONUS);
            }
            if tags.has_hazard(TOXIC_GAS_TAGS) {
                add("gas or CO tag", TOXIC_GAS_BONUS);
            }
            if tags.has_hazard(&[HazardTag::ElectricalFire]) {
                add("electrical fire tag", ELECTRICAL_FIRE_BONUS);
            }
            if tags.has_context(VULNERABLE_OCCUPANT_TAGS) {
                add("vulnerable occupant", VULNERABLE_OCCUPANT_BONUS);
            }
            (rates.hazard_base, rates.hazard_decay.apply(hours))
        }
        Archetype::Recovery => {
            if record
                .estimated_value
                .is_some_and(|v| v >= config.revenue_value_threshold)
            {
                add("high value at risk", HIGH_VALUE_AT_RISK_BONUS);
            }
            if record.revenue_tier == Some(RevenueTier::Replacement) {
                add("replacement tier", REPLACEMENT_TIER_BONUS);
            }
            match record.sentiment_score {
                Some(s) if s <= 2.0 => add("very negative sentiment", VERY_NEGATIVE_SENTIMENT_BONUS),
                Some(s) if s <= 3.0 => add("negative sentiment", NEGATIVE_SENTIMENT_BONUS),
                _ => {}
            }
            if tags.has_recovery(REPUTATION_THREAT_TAGS) {
                add("review or legal threat", REPUTATION_THREAT_BONUS);
            }
            if tags.has_recovery(&[RecoveryTag::EscalationRequested]) {
                add("escalation requested", ESCALATION_BONUS);
            }
            (rates.recovery_base, rates.recovery_decay.apply(hours))
        }
        Archetype::Revenue => {
            let value = record.estimated_value.unwrap_or(0.0).max(0.0);
            add(
                "estimated value",
                (value / VALUE_DIVISOR).min(VALUE_BONUS_CAP),
            );
            if record.revenue_tier == Some(RevenueTier::Replacement) {
                add("replacement tier", REPLACEMENT_TIER_BONUS);
            }
            if tags.has_revenue(&[RevenueTag::HotLead]) {
                add("hot lead", HOT_LEAD_BONUS);
            }
            if tags.has_revenue(ACCOUNT_SCALE_TAGS) {
                add("commercial or multi-property", ACCOUNT_SCALE_BONUS);
            }
            if tags.has_revenue(&[RevenueTag::R22Retrofit]) {
                add("R-22 retrofit", R22_RETROFIT_BONUS);
            }
            (rates.revenue_base, rates.revenue_decay.apply(hours))
        }
        Archetype::Logistics => {
            if tags.has_logistics(SITE_ENTRY_TAGS) {
                add("gate code or lockbox", SITE_ENTRY_BONUS);
            }
            let mut time = rates.logistics_decay.apply(hours);
            if hours > rates.logistics_stale_hours {
                time += rates.logistics_stale_bonus;
            }
            (rates.logistics_base, time)
        }
    };

    let total = base + time_adjustment + bonuses.iter().map(|b| b.points).sum::<f64>();
    ScoreBreakdown {
        archetype,
        base,
        age_hours: hours,
        time_adjustment,
        bonuses,
        total,
    }
}

/// Required ordering: score descending, then older first, then id.
pub fn compare_ranked(a_score: f64, a: &Record, b_score: f64, b: &Record) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Records paired with their scores, in required display order.
pub fn rank<'a>(
    records: &'a [Record],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<(&'a Record, f64)> {
    let mut scored: Vec<(&Record, f64)> = records
        .iter()
        .map(|r| (r, score(r, now, config)))
        .collect();
    scored.sort_by(|(a, sa), (b, sb)| compare_ranked(*sa, a, *sb, b));
    scored
}
