//! Display tags: compact labeled chips per record.
//!
//! Each archetype reads the category-tag bag through its own table, so the
//! same tag can rank differently depending on why the record is on screen.
//! A gate code is the headline of a Logistics row but a footnote on a Hazard.

use crate::config::{EngineConfig, MAX_TAG_CAP};
use crate::signals::SignalBag;
use crate::types::{Archetype, DisplayTag, PriorityColor, Record, RevenueTier, TagVariant, UrgencyLevel};
use crate::util::{address_locality, format_currency};
use crate::vocabulary::{ContextTag, HazardTag, LogisticsTag, RecoveryTag, RevenueTag, UrgencyTag};

/// Priority given to the trailing service-type chip.
const SERVICE_TYPE_PRIORITY: u8 = 90;
/// Priority given to the trailing locality chip.
const LOCALITY_PRIORITY: u8 = 95;

#[derive(Debug, Clone, Copy)]
struct TagSpec {
    label: &'static str,
    variant: TagVariant,
    priority: u8,
    icon: Option<&'static str>,
}

const fn spec(
    label: &'static str,
    variant: TagVariant,
    priority: u8,
    icon: Option<&'static str>,
) -> TagSpec {
    TagSpec {
        label,
        variant,
        priority,
        icon,
    }
}

impl TagSpec {
    fn demoted(mut self, by: u8) -> Self {
        self.priority = self.priority.saturating_add(by);
        self
    }

    fn muted(mut self) -> Self {
        self.variant = TagVariant::Info;
        self
    }

    fn to_tag(self) -> DisplayTag {
        let tag = DisplayTag::new(self.label, self.variant, self.priority);
        match self.icon {
            Some(icon) => tag.with_icon(icon),
            None => tag,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-category lookup tables
// ---------------------------------------------------------------------------

fn hazard_spec(tag: HazardTag) -> TagSpec {
    use TagVariant::*;
    match tag {
        HazardTag::GasLeak => spec("Gas Leak", Critical, 1, Some("flame")),
        HazardTag::CoEvent => spec("CO Alert", Critical, 1, Some("alert-octagon")),
        HazardTag::ElectricalFire => spec("Electrical Fire", Critical, 1, Some("zap")),
        HazardTag::ActiveFlooding => spec("Flooding", Critical, 2, Some("droplets")),
        HazardTag::HealthRisk => spec("Health Risk", Critical, 2, Some("heart-pulse")),
        HazardTag::RefrigerantLeak => spec("Refrigerant Leak", Warning, 3, Some("wind")),
    }
}

fn urgency_spec(tag: UrgencyTag) -> TagSpec {
    use TagVariant::Warning;
    match tag {
        UrgencyTag::NoHeat => spec("No Heat", Warning, 2, Some("thermometer-snowflake")),
        UrgencyTag::NoCooling => spec("No Cooling", Warning, 2, Some("thermometer-sun")),
        UrgencyTag::SameDay => spec("Same Day", Warning, 3, Some("clock")),
        UrgencyTag::AfterHours => spec("After Hours", Warning, 3, Some("moon")),
        UrgencyTag::ExtremeWeather => spec("Extreme Weather", Warning, 3, Some("cloud-lightning")),
    }
}

fn recovery_spec(tag: RecoveryTag) -> TagSpec {
    use TagVariant::*;
    match tag {
        RecoveryTag::ReviewThreat => spec("Review Threat", Critical, 1, Some("star-off")),
        RecoveryTag::LegalMention => spec("Legal Mention", Critical, 1, Some("scale")),
        RecoveryTag::EscalationRequested => spec("Escalation", Critical, 2, Some("arrow-up-circle")),
        RecoveryTag::CallbackRisk => spec("Callback Risk", Warning, 2, Some("phone-missed")),
        RecoveryTag::RepeatIssue => spec("Repeat Issue", Warning, 2, Some("repeat")),
        RecoveryTag::WarrantyDispute => spec("Warranty Dispute", Warning, 3, Some("shield-alert")),
        RecoveryTag::ServiceComplaint => spec("Service Complaint", Warning, 3, None),
        RecoveryTag::TechComplaint => spec("Tech Complaint", Warning, 3, None),
        RecoveryTag::PriceComplaint => spec("Price Complaint", Warning, 3, None),
        RecoveryTag::MissedAppointment => spec("Missed Appointment", Warning, 3, Some("calendar-x")),
    }
}

fn revenue_spec(tag: RevenueTag) -> TagSpec {
    use TagVariant::*;
    match tag {
        RevenueTag::HotLead => spec("Hot Lead", Positive, 1, Some("trending-up")),
        RevenueTag::R22Retrofit => spec("R-22 Retrofit", Positive, 2, Some("refresh-cw")),
        RevenueTag::ReplacementOpportunity => spec("Replacement", Positive, 2, Some("package")),
        RevenueTag::CommercialLead => spec("Commercial", Positive, 3, Some("building")),
        RevenueTag::MultiProperty => spec("Multi-Property", Positive, 3, Some("building-2")),
        RevenueTag::FinancingRequested => spec("Financing", Info, 4, Some("credit-card")),
    }
}

fn logistics_spec(tag: LogisticsTag) -> TagSpec {
    use TagVariant::*;
    match tag {
        LogisticsTag::GateCode => spec("Gate Code", Info, 1, Some("key-round")),
        LogisticsTag::Lockbox => spec("Lockbox", Info, 1, Some("lock")),
        LogisticsTag::PetOnSite => spec("Pet on Site", Warning, 1, Some("dog")),
        LogisticsTag::RestrictedAccess => spec("Restricted Access", Warning, 2, Some("ban")),
        LogisticsTag::TimeWindow => spec("Time Window", Info, 2, Some("clock")),
        LogisticsTag::TenantOccupied => spec("Tenant Occupied", Info, 3, Some("users")),
        LogisticsTag::LandlordApproval => spec("Landlord Approval", Info, 3, Some("file-check")),
    }
}

fn context_spec(tag: ContextTag) -> TagSpec {
    use TagVariant::*;
    match tag {
        ContextTag::ElderlyOccupant => spec("Elderly Occupant", Warning, 3, Some("user")),
        ContextTag::InfantOccupant => spec("Infant on Site", Warning, 3, Some("baby")),
        ContextTag::MedicalCondition => spec("Medical Condition", Warning, 3, Some("heart-pulse")),
        ContextTag::FirstTimeCustomer => spec("New Customer", Info, 5, None),
        ContextTag::RepeatCustomer => spec("Repeat Customer", Info, 5, Some("repeat")),
        ContextTag::PropertyManager => spec("Property Manager", Info, 5, Some("building")),
    }
}

fn push_all<T: Copy>(
    out: &mut Vec<DisplayTag>,
    tags: &[T],
    lookup: fn(T) -> TagSpec,
    adjust: impl Fn(TagSpec) -> TagSpec,
) {
    out.extend(tags.iter().map(|t| adjust(lookup(*t)).to_tag()));
}

// ---------------------------------------------------------------------------
// Per-archetype tables
// ---------------------------------------------------------------------------

fn category_tags(record: &Record, archetype: Archetype) -> Vec<DisplayTag> {
    let tags = &record.category_tags;
    let mut out = Vec::new();
    match archetype {
        Archetype::Hazard => {
            push_all(&mut out, &tags.hazard, hazard_spec, |s| s);
            push_all(&mut out, &tags.context, context_spec, |s| s);
            push_all(&mut out, &tags.urgency, urgency_spec, |s| s.demoted(2));
            push_all(&mut out, &tags.logistics, logistics_spec, |s| s.muted().demoted(5));
        }
        Archetype::Recovery => {
            push_all(&mut out, &tags.recovery, recovery_spec, |s| s);
            push_all(&mut out, &tags.revenue, revenue_spec, |s| s.muted().demoted(3));
            push_all(&mut out, &tags.context, context_spec, |s| s.demoted(1));
            push_all(&mut out, &tags.urgency, urgency_spec, |s| s.demoted(3));
            push_all(&mut out, &tags.logistics, logistics_spec, |s| s.muted().demoted(5));
        }
        Archetype::Revenue => {
            push_all(&mut out, &tags.revenue, revenue_spec, |s| s);
            push_all(&mut out, &tags.urgency, urgency_spec, |s| s.demoted(2));
            push_all(&mut out, &tags.context, context_spec, |s| s.muted());
            push_all(&mut out, &tags.logistics, logistics_spec, |s| s.muted().demoted(5));
        }
        Archetype::Logistics => {
            push_all(&mut out, &tags.logistics, logistics_spec, |s| s);
            push_all(&mut out, &tags.urgency, urgency_spec, |s| s);
            push_all(&mut out, &tags.context, context_spec, |s| s.muted());
        }
    }
    out
}

/// Chips derived from structured fields other than the tag bag.
fn field_tags(record: &Record, archetype: Archetype, config: &EngineConfig) -> Vec<DisplayTag> {
    let mut out = Vec::new();
    match record.urgency {
        Some(UrgencyLevel::Emergency) => {
            out.push(DisplayTag::new("Emergency", TagVariant::Critical, 1).with_icon("siren"))
        }
        Some(UrgencyLevel::High) => {
            out.push(DisplayTag::new("High Urgency", TagVariant::Warning, 2).with_icon("alert-triangle"))
        }
        _ => {}
    }

    let high_value = record
        .estimated_value
        .filter(|v| *v >= config.revenue_value_threshold);

    match archetype {
        Archetype::Recovery => {
            if record.sentiment_score.is_some_and(|s| s <= 2.0) {
                out.push(DisplayTag::new("Upset Customer", TagVariant::Warning, 2).with_icon("frown"));
            }
            if let Some(value) = high_value {
                out.push(DisplayTag::new(
                    format!("{} at Risk", format_currency(value)),
                    TagVariant::Info,
                    4,
                ));
            }
        }
        Archetype::Revenue => {
            if let Some(value) = high_value {
                out.push(
                    DisplayTag::new(format_currency(value), TagVariant::Positive, 2)
                        .with_icon("dollar-sign"),
                );
            }
            match record.revenue_tier {
                Some(RevenueTier::Replacement) => out.push(
                    DisplayTag::new("Replacement", TagVariant::Positive, 2).with_icon("package"),
                ),
                Some(RevenueTier::MajorRepair) => {
                    out.push(DisplayTag::new("Major Repair", TagVariant::Positive, 3))
                }
                _ => {}
            }
            if record.priority_color == Some(PriorityColor::Green) {
                out.push(DisplayTag::new("Commercial", TagVariant::Positive, 3).with_icon("building"));
            }
        }
        Archetype::Hazard | Archetype::Logistics => {}
    }
    out
}

/// Chips read off the extracted text, used when the record has no tag bag.
fn signal_tags(bag: &SignalBag, archetype: Archetype, config: &EngineConfig) -> Vec<DisplayTag> {
    let mut out = Vec::new();
    let logistics = archetype == Archetype::Logistics;

    if let Some(hazard) = bag.hazard_type {
        let variant = if archetype == Archetype::Hazard {
            TagVariant::Critical
        } else {
            TagVariant::Warning
        };
        out.push(DisplayTag::new(hazard.label(), variant, 1).with_icon("alert-triangle"));
    }
    if !bag.occupants.is_empty() && archetype == Archetype::Hazard {
        out.push(DisplayTag::new("Occupants Present", TagVariant::Warning, 3).with_icon("users"));
    }
    if !bag.sentiment_keywords.is_empty() {
        out.push(DisplayTag::new("Upset Customer", TagVariant::Warning, 2).with_icon("frown"));
    }
    if bag.competitor_mention.is_some() {
        out.push(DisplayTag::new("Competitor Quote", TagVariant::Warning, 4));
    }
    if let Some(age) = bag
        .equipment_age
        .filter(|age| *age >= config.old_equipment_years)
    {
        let variant = if archetype == Archetype::Revenue {
            TagVariant::Positive
        } else {
            TagVariant::Info
        };
        out.push(DisplayTag::new(format!("{}-Year-Old Unit", age), variant, 3));
    }
    if bag.refrigerant_type.as_deref() == Some("R-22") {
        out.push(DisplayTag::new("R-22 Retrofit", TagVariant::Positive, 2).with_icon("refresh-cw"));
    }
    if bag.financing_mentioned {
        out.push(DisplayTag::new("Financing", TagVariant::Info, 4).with_icon("credit-card"));
    }
    let access_priority = if logistics { 1 } else { 6 };
    if bag.gate_code.is_some() {
        out.push(DisplayTag::new("Gate Code", TagVariant::Info, access_priority).with_icon("key-round"));
    }
    if bag.pet_warning.is_some() {
        out.push(DisplayTag::new("Pet on Site", TagVariant::Warning, access_priority).with_icon("dog"));
    }
    out
}

/// Ordered display chips for a record under `archetype`.
///
/// Sorted by priority ascending, deduplicated by label, at most
/// `config.tag_cap` entries and never more than [`MAX_TAG_CAP`]. The service
/// type and the address locality are appended last when room remains.
pub fn display_tags(
    record: &Record,
    archetype: Archetype,
    bag: Option<&SignalBag>,
    config: &EngineConfig,
) -> Vec<DisplayTag> {
    let mut candidates = field_tags(record, archetype, config);
    candidates.extend(category_tags(record, archetype));
    if record.category_tags.is_empty() {
        if let Some(bag) = bag {
            candidates.extend(signal_tags(bag, archetype, config));
        }
    }

    // Stable: equal priorities keep table order.
    candidates.sort_by_key(|t| t.priority);

    let cap = config.tag_cap.min(MAX_TAG_CAP);
    let mut out: Vec<DisplayTag> = Vec::with_capacity(cap);
    for tag in candidates {
        if out.len() >= cap {
            break;
        }
        push_unique_label(&mut out, tag);
    }

    if out.len() < cap {
        if let Some(service) = record
            .service_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            push_unique_label(
                &mut out,
                DisplayTag::new(service, TagVariant::Neutral, SERVICE_TYPE_PRIORITY).with_icon("wrench"),
            );
        }
    }
    if out.len() < cap {
        if let Some(locality) = record.address.as_deref().and_then(address_locality) {
            push_unique_label(
                &mut out,
                DisplayTag::new(locality, TagVariant::Neutral, LOCALITY_PRIORITY).with_icon("map-pin"),
            );
        }
    }
    out
}

fn push_unique_label(out: &mut Vec<DisplayTag>, tag: DisplayTag) {
    if !out.iter().any(|t| t.label.eq_ignore_ascii_case(&tag.label)) {
        out.push(tag);
    }
}
