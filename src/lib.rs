//! Signal extraction and priority classification for service-dispatch records.
//!
//! Every read runs the same pure pipeline over a [`types::Record`]:
//!
//! 1. [`signals::extract_record`] scans the free text into a [`signals::SignalBag`]
//! 2. [`classify::classify_with_signals`] picks one [`types::Archetype`]
//! 3. [`classify::display_tags`] builds at most four UI chips
//! 4. [`scoring::score_for`] computes the rank key
//! 5. [`narrative::narrate`] writes the headline, subtext and warnings
//!
//! Nothing is cached or written back. [`triage::triage`] runs all five steps.

pub mod classify;
pub mod config;
pub mod error;
pub mod narrative;
pub mod scoring;
pub mod signals;
pub mod triage;
pub mod types;
pub mod util;
pub mod vocabulary;

pub use classify::{classify, classify_with_signals, display_tags};
pub use config::{load_config, load_config_or_default, validate_config, EngineConfig};
pub use error::TriageError;
pub use narrative::{narrate, narrate_inline};
pub use scoring::{rank, score, score_breakdown, score_for, ScoreBreakdown};
pub use signals::{extract, extract_record, HazardType, SignalBag};
pub use triage::{triage, triage_all, TriageEngine, TriageView};
pub use types::{Archetype, DisplayTag, NarrativeResult, Record};
