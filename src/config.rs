//! Product-tuning constants for the triage engine.
//!
//! Every threshold the classifier, scorer and narrative synthesizer consult
//! lives here so operators can override it from `~/.dispatch/config.json`
//! without a rebuild. `EngineConfig::default()` is the shipped tuning.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TriageError;
use crate::scoring::max_adjustment;
use crate::types::Archetype;

/// Engine configuration stored in ~/.dispatch/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Estimated value at or above which a record is Revenue (and a Recovery bonus applies).
    #[serde(default = "default_revenue_value_threshold")]
    pub revenue_value_threshold: f64,
    /// Equipment age in years considered "aging" for narrative and tags.
    #[serde(default = "default_old_equipment_years")]
    pub old_equipment_years: u32,
    /// Maximum display tags per record, 1 to [`MAX_TAG_CAP`].
    #[serde(default = "default_tag_cap")]
    pub tag_cap: usize,
    /// Let text-extracted hazards (gas, CO, electrical, fire) select Hazard
    /// when no structured hazard tag is present. Off unless opted in.
    #[serde(default)]
    pub promote_text_hazards: bool,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

/// Base scores and time-decay rates per archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default = "default_hazard_base")]
    pub hazard_base: f64,
    #[serde(default = "default_recovery_base")]
    pub recovery_base: f64,
    #[serde(default = "default_revenue_base")]
    pub revenue_base: f64,
    #[serde(default = "default_logistics_base")]
    pub logistics_base: f64,
    #[serde(default = "default_hazard_decay")]
    pub hazard_decay: DecayRate,
    #[serde(default = "default_recovery_decay")]
    pub recovery_decay: DecayRate,
    #[serde(default = "default_revenue_decay")]
    pub revenue_decay: DecayRate,
    #[serde(default = "default_logistics_decay")]
    pub logistics_decay: DecayRate,
    /// Hours after which a Logistics record gets the staleness bonus.
    #[serde(default = "default_logistics_stale_hours")]
    pub logistics_stale_hours: f64,
    #[serde(default = "default_logistics_stale_bonus")]
    pub logistics_stale_bonus: f64,
}

/// Linear growth per elapsed hour, capped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayRate {
    pub per_hour: f64,
    pub cap: f64,
}

impl DecayRate {
    pub fn apply(&self, hours: f64) -> f64 {
        (hours.max(0.0) * self.per_hour).min(self.cap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeConfig {
    /// A cleaned AI summary must be longer than this to be preferred.
    #[serde(default = "default_summary_min_chars")]
    pub summary_min_chars: usize,
    /// Target length for inline summaries; cut at a sentence boundary near it.
    #[serde(default = "default_summary_target_chars")]
    pub summary_target_chars: usize,
    /// Maximum length of a quoted phrase placed in a headline.
    #[serde(default = "default_quote_max_chars")]
    pub quote_max_chars: usize,
    /// Addresses shorter than this are flagged as unverified on Hazard records.
    #[serde(default = "default_min_address_chars")]
    pub min_address_chars: usize,
}

fn default_revenue_value_threshold() -> f64 {
    1500.0
}

fn default_old_equipment_years() -> u32 {
    12
}

fn default_tag_cap() -> usize {
    4
}

fn default_hazard_base() -> f64 {
    1000.0
}

fn default_recovery_base() -> f64 {
    700.0
}

fn default_revenue_base() -> f64 {
    400.0
}

fn default_logistics_base() -> f64 {
    100.0
}

fn default_hazard_decay() -> DecayRate {
    DecayRate {
        per_hour: 10.0,
        cap: 50.0,
    }
}

fn default_recovery_decay() -> DecayRate {
    DecayRate {
        per_hour: 5.0,
        cap: 60.0,
    }
}

fn default_revenue_decay() -> DecayRate {
    DecayRate {
        per_hour: 3.0,
        cap: 30.0,
    }
}

fn default_logistics_decay() -> DecayRate {
    DecayRate {
        per_hour: 2.0,
        cap: 50.0,
    }
}

fn default_logistics_stale_hours() -> f64 {
    24.0
}

fn default_logistics_stale_bonus() -> f64 {
    30.0
}

fn default_summary_min_chars() -> usize {
    15
}

fn default_summary_target_chars() -> usize {
    100
}

fn default_quote_max_chars() -> usize {
    60
}

fn default_min_address_chars() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            revenue_value_threshold: default_revenue_value_threshold(),
            old_equipment_years: default_old_equipment_years(),
            tag_cap: default_tag_cap(),
            promote_text_hazards: false,
            scoring: ScoringConfig::default(),
            narrative: NarrativeConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            hazard_base: default_hazard_base(),
            recovery_base: default_recovery_base(),
            revenue_base: default_revenue_base(),
            logistics_base: default_logistics_base(),
            hazard_decay: default_hazard_decay(),
            recovery_decay: default_recovery_decay(),
            revenue_decay: default_revenue_decay(),
            logistics_decay: default_logistics_decay(),
            logistics_stale_hours: default_logistics_stale_hours(),
            logistics_stale_bonus: default_logistics_stale_bonus(),
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig {
            summary_min_chars: default_summary_min_chars(),
            summary_target_chars: default_summary_target_chars(),
            quote_max_chars: default_quote_max_chars(),
            min_address_chars: default_min_address_chars(),
        }
    }
}

/// Get the canonical config file path (~/.dispatch/config.json)
pub fn config_path() -> Result<PathBuf, TriageError> {
    let home = dirs::home_dir()
        .ok_or_else(|| TriageError::Io("Could not find home directory".to_string()))?;
    Ok(home.join(".dispatch").join("config.json"))
}

/// Load and validate configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, TriageError> {
    if !path.exists() {
        return Err(TriageError::ConfigNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let config: EngineConfig =
        serde_json::from_str(&content).map_err(|e| TriageError::parse("config", e))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load ~/.dispatch/config.json, or the shipped defaults when it does not exist.
///
/// A config file that exists but fails to parse or validate is an error; it
/// is never silently replaced by defaults.
pub fn load_config_or_default() -> Result<EngineConfig, TriageError> {
    let path = config_path()?;
    match load_config(&path) {
        Ok(config) => Ok(config),
        Err(e) if e.falls_back_to_defaults() => {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(EngineConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Most display tags any record may carry.
pub const MAX_TAG_CAP: usize = 4;

/// Reject tunings that would break archetype separation or produce nonsense.
pub fn validate_config(config: &EngineConfig) -> Result<(), TriageError> {
    let s = &config.scoring;
    let numbers = [
        ("hazardBase", s.hazard_base),
        ("recoveryBase", s.recovery_base),
        ("revenueBase", s.revenue_base),
        ("logisticsBase", s.logistics_base),
        ("hazardDecay.perHour", s.hazard_decay.per_hour),
        ("hazardDecay.cap", s.hazard_decay.cap),
        ("recoveryDecay.perHour", s.recovery_decay.per_hour),
        ("recoveryDecay.cap", s.recovery_decay.cap),
        ("revenueDecay.perHour", s.revenue_decay.per_hour),
        ("revenueDecay.cap", s.revenue_decay.cap),
        ("logisticsDecay.perHour", s.logistics_decay.per_hour),
        ("logisticsDecay.cap", s.logistics_decay.cap),
        ("logisticsStaleHours", s.logistics_stale_hours),
        ("logisticsStaleBonus", s.logistics_stale_bonus),
        ("revenueValueThreshold", config.revenue_value_threshold),
    ];
    if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(TriageError::InvalidConfig(format!("{} must be a finite number", name)));
    }

    let decays = [
        ("hazardDecay", s.hazard_decay),
        ("recoveryDecay", s.recovery_decay),
        ("revenueDecay", s.revenue_decay),
        ("logisticsDecay", s.logistics_decay),
    ];
    for (name, decay) in decays {
        if decay.per_hour < 0.0 || decay.cap <= 0.0 {
            return Err(TriageError::InvalidConfig(format!(
                "{} must have a non-negative rate and a positive cap",
                name
            )));
        }
    }
    if s.logistics_stale_bonus < 0.0 {
        return Err(TriageError::InvalidConfig(
            "logisticsStaleBonus must not be negative".to_string(),
        ));
    }

    // Each band's ceiling must stay below the floor of the band above it.
    let bands = [
        (Archetype::Hazard, s.hazard_base),
        (Archetype::Recovery, s.recovery_base),
        (Archetype::Revenue, s.revenue_base),
        (Archetype::Logistics, s.logistics_base),
    ];
    for pair in bands.windows(2) {
        let (upper, upper_base) = pair[0];
        let (lower, lower_base) = pair[1];
        let ceiling = lower_base + max_adjustment(lower, s);
        if ceiling >= upper_base {
            log::warn!(
                "Rejecting config: {} can reach {} but {} starts at {}",
                lower.label(),
                ceiling,
                upper.label(),
                upper_base
            );
            return Err(TriageError::InvalidConfig(format!(
                "{} scores can reach {}, overlapping {} (base {}); archetype bands must not overlap",
                lower.label(),
                ceiling,
                upper.label(),
                upper_base
            )));
        }
    }

    if config.tag_cap == 0 || config.tag_cap > MAX_TAG_CAP {
        return Err(TriageError::InvalidConfig(format!(
            "tagCap must be between 1 and {}",
            MAX_TAG_CAP
        )));
    }
    if config.revenue_value_threshold <= 0.0 {
        return Err(TriageError::InvalidConfig(
            "revenueValueThreshold must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_shipped_tuning() {
        let config = EngineConfig::default();
        assert_eq!(config.revenue_value_threshold, 1500.0);
        assert_eq!(config.old_equipment_years, 12);
        assert_eq!(config.tag_cap, 4);
        assert_eq!(config.scoring.hazard_base, 1000.0);
        assert_eq!(config.scoring.logistics_base, 100.0);
        assert_eq!(config.scoring.logistics_stale_hours, 24.0);
        assert_eq!(config.narrative.summary_target_chars, 100);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{"revenueValueThreshold": 2500, "scoring": {"logisticsStaleHours": 12}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.revenue_value_threshold, 2500.0);
        assert_eq!(config.scoring.logistics_stale_hours, 12.0);
        assert_eq!(config.scoring.hazard_base, 1000.0);
        assert_eq!(config.tag_cap, 4);
    }

    #[test]
    fn decay_rate_caps_and_clamps() {
        let rate = DecayRate {
            per_hour: 10.0,
            cap: 50.0,
        };
        assert_eq!(rate.apply(2.0), 20.0);
        assert_eq!(rate.apply(100.0), 50.0);
        assert_eq!(rate.apply(-3.0), 0.0);
    }

    #[test]
    fn rejects_overlapping_base_scores() {
        let mut config = EngineConfig::default();
        config.scoring.revenue_base = 800.0;
        assert!(matches!(
            validate_config(&config),
            Err(TriageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_zero_tag_cap() {
        let config = EngineConfig {
            tag_cap: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_tag_cap_above_four() {
        let config = EngineConfig {
            tag_cap: 8,
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(TriageError::InvalidConfig(_))
        ));
        let config = EngineConfig {
            tag_cap: MAX_TAG_CAP,
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_base_that_overlaps_after_adjustments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scoring": {{"recoveryBase": 950}}}}"#).unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(TriageError::InvalidConfig(_))
        ));

        // Recovery tops out at 700 + 215; one point of headroom is enough.
        let mut config = EngineConfig::default();
        config.scoring.hazard_base = 916.0;
        assert!(validate_config(&config).is_ok());
        config.scoring.hazard_base = 915.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_larger_decay_cap_that_overlaps() {
        let mut config = EngineConfig::default();
        config.scoring.logistics_decay.cap = 300.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let mut config = EngineConfig::default();
        config.scoring.hazard_base = f64::INFINITY;
        assert!(validate_config(&config).is_err());

        let mut config = EngineConfig::default();
        config.scoring.recovery_decay.cap = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"oldEquipmentYears": 10}}"#).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.old_equipment_years, 10);
    }

    #[test]
    fn load_config_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("config.json")).unwrap_err();
        assert!(err.falls_back_to_defaults());
    }

    #[test]
    fn load_config_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, TriageError::Parse { .. }));
        assert!(!err.falls_back_to_defaults());
    }

    #[test]
    fn load_config_rejects_invalid_tuning() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"scoring": {{"hazardBase": 10}}}}"#).unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(TriageError::InvalidConfig(_))
        ));
    }
}
