use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::vocabulary::CategoryTags;

// =============================================================================
// Inbound record
// =============================================================================

/// Which upstream table a record came from. Both share the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Lead,
    Job,
}

/// Caller-reported urgency. Ordered: low < medium < high < emergency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Emergency,
}

/// Operator- or upstream-assigned color hint. Distinct from the computed archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityColor {
    /// Alert: an unhappy customer.
    Red,
    Orange,
    Yellow,
    /// Commercial or high-value work.
    Green,
    Blue,
    Gray,
}

/// Size of the expected ticket. Ordered from smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueTier {
    Diagnostic,
    Minor,
    StandardRepair,
    MajorRepair,
    Replacement,
}

/// An inbound call, lead or job as delivered by the persistence layer.
///
/// Every field other than `id` and `created_at` is optional; the engine
/// treats absence as "no signal" rather than as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub kind: RecordKind,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Free-text "reason not booked" or priority reason.
    #[serde(default, alias = "reasonNotBooked", skip_serializing_if = "Option::is_none")]
    pub priority_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_color: Option<PriorityColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_tier: Option<RevenueTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    /// 1 to 5, lower is more negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub category_tags: CategoryTags,
}

impl Record {
    /// A record with only identity set. Useful as a base for builders and tests.
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Record {
            id: id.into(),
            kind: RecordKind::Lead,
            created_at,
            scheduled_at: None,
            customer_name: None,
            phone: None,
            address: None,
            service_type: None,
            ai_summary: None,
            transcript: None,
            priority_reason: None,
            urgency: None,
            priority_color: None,
            revenue_tier: None,
            estimated_value: None,
            sentiment_score: None,
            category_tags: CategoryTags::default(),
        }
    }

    /// Customer name if present and non-blank.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.customer_name.as_deref())
    }

    pub fn display_address(&self) -> Option<&str> {
        non_blank(self.address.as_deref())
    }

    /// Fractional hours between creation and `now`, clamped at zero.
    pub fn hours_since_created(&self, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.created_at).num_seconds() as f64;
        (secs / 3600.0).max(0.0)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an RFC3339/ISO-8601 timestamp, falling back to SQLite datetime format.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {}", raw)))
}

// =============================================================================
// Derived, per-read outputs
// =============================================================================

/// One of four mutually exclusive priority classes, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Hazard,
    Recovery,
    Revenue,
    Logistics,
}

impl Archetype {
    /// Evaluation order of the precedence chain.
    pub const PRECEDENCE: [Archetype; 4] = [
        Archetype::Hazard,
        Archetype::Recovery,
        Archetype::Revenue,
        Archetype::Logistics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hazard => "Hazard",
            Self::Recovery => "Recovery",
            Self::Revenue => "Revenue",
            Self::Logistics => "Logistics",
        }
    }
}

/// Severity of a display tag; drives chip color in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagVariant {
    Critical,
    Warning,
    Positive,
    Info,
    Neutral,
}

/// A compact labeled chip summarizing one classification signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTag {
    pub label: String,
    pub variant: TagVariant,
    /// Lower sorts first.
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl DisplayTag {
    pub fn new(label: impl Into<String>, variant: TagVariant, priority: u8) -> Self {
        DisplayTag {
            label: label.into(),
            variant,
            priority,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Unverified,
    Missing,
    Caution,
    Info,
}

/// A UI warning attached to a narrative, independent of template tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiWarning {
    pub kind: WarningKind,
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Which template produced a narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeTier {
    /// Pre-existing cleaned AI summary.
    Summary,
    /// Rich template over extracted signals.
    Full,
    /// Generic template over universally available fields.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeResult {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default)]
    pub warnings: Vec<UiWarning>,
    #[serde(default)]
    pub highlight: bool,
    pub tier: NarrativeTier,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn urgency_and_tier_are_ordered() {
        assert!(UrgencyLevel::Low < UrgencyLevel::Medium);
        assert!(UrgencyLevel::High < UrgencyLevel::Emergency);
        assert!(RevenueTier::Diagnostic < RevenueTier::StandardRepair);
        assert!(RevenueTier::MajorRepair < RevenueTier::Replacement);
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_and_sqlite() {
        let a = parse_timestamp("2026-03-01T10:00:00Z").unwrap();
        let b = parse_timestamp("2026-03-01 10:00:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday-ish").is_none());
    }

    #[test]
    fn minimal_record_deserializes() {
        let json = r#"{"id": "lead-1", "createdAt": "2026-03-01 08:30:00"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "lead-1");
        assert_eq!(record.kind, RecordKind::Lead);
        assert!(record.urgency.is_none());
        assert!(record.category_tags.is_empty());
    }

    #[test]
    fn full_record_deserializes() {
        let json = r#"{
            "id": "job-7",
            "kind": "job",
            "createdAt": "2026-03-01T08:30:00Z",
            "customerName": "Dana Ruiz",
            "urgency": "emergency",
            "priorityColor": "red",
            "revenueTier": "standard_repair",
            "estimatedValue": 420.0,
            "sentimentScore": 2,
            "reasonNotBooked": "wants a second opinion",
            "categoryTags": {"hazard": ["gas_leak"], "urgency": ["no_heat"]}
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, RecordKind::Job);
        assert_eq!(record.urgency, Some(UrgencyLevel::Emergency));
        assert_eq!(record.priority_color, Some(PriorityColor::Red));
        assert_eq!(record.revenue_tier, Some(RevenueTier::StandardRepair));
        assert_eq!(record.sentiment_score, Some(2.0));
        assert_eq!(record.priority_reason.as_deref(), Some("wants a second opinion"));
        assert_eq!(record.category_tags.hazard.len(), 1);
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let json = r#"{"id": "x", "createdAt": "not a date"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn hours_since_created_clamps_future() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let record = Record::new("r", created);
        let earlier = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 3, 1, 13, 30, 0).unwrap();
        assert_eq!(record.hours_since_created(earlier), 0.0);
        assert!((record.hours_since_created(later) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn display_helpers_skip_blank_values() {
        let mut record = Record::new("r", Utc::now());
        record.customer_name = Some("   ".to_string());
        record.address = Some(" 12 Elm St ".to_string());
        assert!(record.display_name().is_none());
        assert_eq!(record.display_address(), Some("12 Elm St"));
    }
}
