//! Closed category-tag vocabulary shared by classification and scoring.
//!
//! Upstream ingestion attaches a category-tag bag to each record: a map from
//! category name to a list of tag strings. Every tag string the engine
//! understands is declared exactly once here, as a variant of the enum for its
//! category. Classifier and scorer both match on these enums, never on string
//! literals, so the two cannot drift apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lowercase, trim, and fold spaces/hyphens to underscores.
///
/// "Gas Leak", "gas-leak" and "GAS_LEAK" all normalize to "gas_leak".
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// A closed tag enum for one category.
pub trait TagVocabulary: Sized + Copy + PartialEq {
    /// Category name as it appears in the tag bag.
    const CATEGORY: &'static str;

    /// Parse a wire string (after normalization). Unknown tags yield `None`.
    fn parse(raw: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

macro_rules! tag_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident in $category:literal {
            $( $variant:ident => $wire:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];
        }

        impl TagVocabulary for $name {
            const CATEGORY: &'static str = $category;

            fn parse(raw: &str) -> Option<Self> {
                match normalize_tag(raw).as_str() {
                    $( $wire $(| $alias)* => Some($name::$variant), )+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$name as TagVocabulary>::parse(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} tag: {}", $category, raw))
                })
            }
        }
    };
}

tag_vocabulary! {
    /// Life-safety conditions. Any of these forces the Hazard archetype.
    HazardTag in "hazard" {
        GasLeak => "gas_leak" | "gas",
        CoEvent => "co_event" | "carbon_monoxide" | "co_alarm",
        ElectricalFire => "electrical_fire",
        ActiveFlooding => "active_flooding" | "flooding",
        HealthRisk => "health_risk",
        RefrigerantLeak => "refrigerant_leak",
    }
}

tag_vocabulary! {
    /// Time pressure expressed by the caller.
    UrgencyTag in "urgency" {
        NoHeat => "no_heat",
        NoCooling => "no_cooling" | "no_ac",
        SameDay => "same_day" | "same_day_requested",
        AfterHours => "after_hours",
        ExtremeWeather => "extreme_weather",
    }
}

tag_vocabulary! {
    /// Sales opportunity markers.
    RevenueTag in "revenue" {
        HotLead => "hot_lead",
        R22Retrofit => "r22_retrofit" | "r_22_retrofit",
        ReplacementOpportunity => "replacement_opportunity",
        CommercialLead => "commercial_lead" | "commercial",
        MultiProperty => "multi_property",
        FinancingRequested => "financing_requested" | "financing",
    }
}

tag_vocabulary! {
    /// Reputation and complaint markers.
    RecoveryTag in "recovery" {
        CallbackRisk => "callback_risk",
        RepeatIssue => "repeat_issue",
        WarrantyDispute => "warranty_dispute",
        ServiceComplaint => "service_complaint",
        TechComplaint => "tech_complaint",
        PriceComplaint => "price_complaint",
        EscalationRequested => "escalation_requested" | "escalation",
        ReviewThreat => "review_threat",
        LegalMention => "legal_mention" | "legal",
        MissedAppointment => "missed_appointment",
    }
}

tag_vocabulary! {
    /// Site access and scheduling notes.
    LogisticsTag in "logistics" {
        GateCode => "gate_code",
        Lockbox => "lockbox",
        PetOnSite => "pet_on_site" | "pet",
        RestrictedAccess => "restricted_access",
        TimeWindow => "time_window",
        TenantOccupied => "tenant_occupied",
        LandlordApproval => "landlord_approval",
    }
}

tag_vocabulary! {
    /// Facts about the customer or household.
    ContextTag in "context" {
        ElderlyOccupant => "elderly_occupant" | "elderly",
        InfantOccupant => "infant_occupant" | "infant" | "baby",
        MedicalCondition => "medical_condition" | "medical",
        FirstTimeCustomer => "first_time_customer",
        RepeatCustomer => "repeat_customer",
        PropertyManager => "property_manager",
    }
}

// ---------------------------------------------------------------------------
// Trigger sets consulted by the classifier and the scorer
// ---------------------------------------------------------------------------

/// Hazard tags that force the Hazard archetype.
pub const HAZARD_TRIGGERS: &[HazardTag] = &[
    HazardTag::GasLeak,
    HazardTag::CoEvent,
    HazardTag::ElectricalFire,
    HazardTag::ActiveFlooding,
    HazardTag::HealthRisk,
    HazardTag::RefrigerantLeak,
];

/// Recovery tags that select the Recovery archetype.
pub const RECOVERY_TRIGGERS: &[RecoveryTag] = &[
    RecoveryTag::CallbackRisk,
    RecoveryTag::RepeatIssue,
    RecoveryTag::WarrantyDispute,
    RecoveryTag::ServiceComplaint,
    RecoveryTag::TechComplaint,
    RecoveryTag::PriceComplaint,
    RecoveryTag::EscalationRequested,
    RecoveryTag::ReviewThreat,
    RecoveryTag::LegalMention,
    RecoveryTag::MissedAppointment,
];

/// Revenue tags that select the Revenue archetype.
pub const REVENUE_TRIGGERS: &[RevenueTag] = &[
    RevenueTag::HotLead,
    RevenueTag::R22Retrofit,
    RevenueTag::ReplacementOpportunity,
    RevenueTag::CommercialLead,
    RevenueTag::MultiProperty,
    RevenueTag::FinancingRequested,
];

pub const TOXIC_GAS_TAGS: &[HazardTag] = &[HazardTag::GasLeak, HazardTag::CoEvent];
pub const VULNERABLE_OCCUPANT_TAGS: &[ContextTag] =
    &[ContextTag::ElderlyOccupant, ContextTag::InfantOccupant];
pub const REPUTATION_THREAT_TAGS: &[RecoveryTag] =
    &[RecoveryTag::ReviewThreat, RecoveryTag::LegalMention];
pub const ACCOUNT_SCALE_TAGS: &[RevenueTag] =
    &[RevenueTag::CommercialLead, RevenueTag::MultiProperty];
pub const SITE_ENTRY_TAGS: &[LogisticsTag] = &[LogisticsTag::GateCode, LogisticsTag::Lockbox];

// ---------------------------------------------------------------------------
// Category-tag bag
// ---------------------------------------------------------------------------

/// A record's externally supplied classification hints, one list per category.
///
/// Unknown tag strings are dropped during deserialization so that a single
/// unexpected tag from ingestion does not reject the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTags {
    #[serde(default, deserialize_with = "lenient_list")]
    pub hazard: Vec<HazardTag>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub urgency: Vec<UrgencyTag>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub revenue: Vec<RevenueTag>,
    #[serde(default, alias = "complaint", deserialize_with = "lenient_list")]
    pub recovery: Vec<RecoveryTag>,
    #[serde(default, alias = "access", deserialize_with = "lenient_list")]
    pub logistics: Vec<LogisticsTag>,
    #[serde(
        default,
        alias = "customer",
        alias = "customerContext",
        alias = "customer_context",
        deserialize_with = "lenient_list"
    )]
    pub context: Vec<ContextTag>,
}

impl CategoryTags {
    pub fn is_empty(&self) -> bool {
        self.hazard.is_empty()
            && self.urgency.is_empty()
            && self.revenue.is_empty()
            && self.recovery.is_empty()
            && self.logistics.is_empty()
            && self.context.is_empty()
    }

    pub fn has_hazard(&self, set: &[HazardTag]) -> bool {
        contains_any(&self.hazard, set)
    }

    pub fn has_recovery(&self, set: &[RecoveryTag]) -> bool {
        contains_any(&self.recovery, set)
    }

    pub fn has_revenue(&self, set: &[RevenueTag]) -> bool {
        contains_any(&self.revenue, set)
    }

    pub fn has_logistics(&self, set: &[LogisticsTag]) -> bool {
        contains_any(&self.logistics, set)
    }

    pub fn has_context(&self, set: &[ContextTag]) -> bool {
        contains_any(&self.context, set)
    }
}

fn contains_any<T: PartialEq>(present: &[T], wanted: &[T]) -> bool {
    present.iter().any(|t| wanted.contains(t))
}

/// Deserialize a tag list, skipping unknown entries and duplicates.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TagVocabulary,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    let mut out: Vec<T> = Vec::new();
    for tag in raw.unwrap_or_default() {
        match T::parse(&tag) {
            Some(parsed) if !out.contains(&parsed) => out.push(parsed),
            Some(_) => {}
            None => log::debug!("dropping unknown {} tag '{}'", T::CATEGORY, tag),
        }
    }
    Ok(out)
}
