//! Phrase vocabularies and compile-once regex patterns for the extractor.
//!
//! All patterns run against lowercased text except [`re_quote`], which runs
//! on the original so quoted customer words keep their casing.

use std::sync::OnceLock;

use regex::Regex;

use super::HazardType;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

pub const CO_PHRASES: &[&str] = &[
    "carbon monoxide",
    "monoxide",
    "co detector",
    "co alarm",
    "co detectors",
    "co alarms",
    "co reading",
];

pub const GAS_PHRASES: &[&str] = &[
    "gas leak",
    "leaking gas",
    "smell gas",
    "smells gas",
    "smelled gas",
    "smelling gas",
    "smell of gas",
    "gas smell",
    "gas odor",
    "rotten egg",
    "rotten eggs",
    "natural gas",
    "propane leak",
];

pub const ELECTRICAL_PHRASES: &[&str] = &[
    "electrical fire",
    "sparking",
    "sparks",
    "burning smell",
    "burning wire",
    "burning wires",
    "electrical smell",
    "smoking outlet",
    "melted wire",
    "melted wires",
    "exposed wire",
    "exposed wires",
    "breaker keeps tripping",
];

pub const FIRE_PHRASES: &[&str] = &["fire", "flames", "on fire", "smoke", "smoking"];

pub const WATER_PHRASES: &[&str] = &[
    "flooding",
    "flooded",
    "water leak",
    "leaking water",
    "burst pipe",
    "pipe burst",
    "water everywhere",
    "standing water",
    "water pouring",
    "ceiling leak",
];

/// Symptom phrases that, with a gas hazard, imply the house should be emptied.
pub const EXPOSURE_PHRASES: &[&str] = &[
    "smell",
    "smells",
    "smelled",
    "smelling",
    "odor",
    "dizzy",
    "dizziness",
    "headache",
    "headaches",
    "nausea",
    "nauseous",
    "lightheaded",
    "light headed",
];

pub const EVACUATION_PHRASES: &[&str] = &[
    "evacuate",
    "evacuated",
    "evacuating",
    "evacuation",
    "left the house",
    "leave the house",
    "out of the house",
    "left the home",
    "out of the home",
    "waiting outside",
];

pub const OCCUPANT_WORDS: &[&str] = &[
    "baby",
    "babies",
    "infant",
    "newborn",
    "toddler",
    "kids",
    "children",
    "child",
    "elderly",
    "senior",
    "seniors",
    "grandmother",
    "grandfather",
    "grandma",
    "grandpa",
    "pregnant",
    "disabled",
    "wheelchair",
    "oxygen",
    "pet",
    "pets",
    "dog",
    "dogs",
    "cat",
    "cats",
];

/// (lowercase phrase, display name)
pub const EQUIPMENT_BRANDS: &[(&str, &str)] = &[
    ("american standard", "American Standard"),
    ("carrier", "Carrier"),
    ("trane", "Trane"),
    ("lennox", "Lennox"),
    ("rheem", "Rheem"),
    ("ruud", "Ruud"),
    ("goodman", "Goodman"),
    ("york", "York"),
    ("bryant", "Bryant"),
    ("daikin", "Daikin"),
    ("amana", "Amana"),
    ("mitsubishi", "Mitsubishi"),
    ("fujitsu", "Fujitsu"),
    ("heil", "Heil"),
    ("payne", "Payne"),
    ("coleman", "Coleman"),
    ("frigidaire", "Frigidaire"),
    ("tempstar", "Tempstar"),
    ("armstrong", "Armstrong"),
    ("bosch", "Bosch"),
    ("weil mclain", "Weil-McLain"),
    ("weil-mclain", "Weil-McLain"),
    ("navien", "Navien"),
    ("rinnai", "Rinnai"),
    ("bradford white", "Bradford White"),
    ("a.o. smith", "A.O. Smith"),
    ("ao smith", "A.O. Smith"),
];

pub const UNIT_LOCATIONS: &[&str] = &[
    "attic",
    "basement",
    "crawl space",
    "crawlspace",
    "garage",
    "closet",
    "rooftop",
    "roof",
    "backyard",
    "side yard",
    "utility room",
    "mechanical room",
    "laundry room",
];

pub const ACCESS_PHRASES: &[&str] = &[
    "lockbox",
    "lock box",
    "side gate",
    "back gate",
    "back door",
    "side door",
    "side entrance",
    "call when arriving",
    "call before arriving",
    "call on arrival",
    "text when arriving",
    "text before arriving",
    "ring the bell",
    "ring doorbell",
    "buzzer",
    "park on the street",
    "park in the driveway",
    "no parking",
    "street parking",
    "tenant occupied",
    "landlord",
    "property manager",
];

pub const SENTIMENT_KEYWORDS: &[&str] = &[
    "frustrated",
    "frustrating",
    "angry",
    "upset",
    "furious",
    "livid",
    "disappointed",
    "unhappy",
    "annoyed",
    "fed up",
    "ridiculous",
    "unacceptable",
    "terrible",
    "horrible",
    "worst",
    "never again",
    "rip off",
    "ripped off",
    "scam",
    "rude",
    "lied",
];

pub const URGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "urgently",
    "asap",
    "as soon as possible",
    "immediately",
    "right away",
    "right now",
    "today",
    "tonight",
    "can't wait",
    "cannot wait",
    "no heat",
    "no ac",
    "no air",
    "freezing",
    "too hot",
    "sweltering",
];

pub const FINANCING_PHRASES: &[&str] = &[
    "financing",
    "finance",
    "financed",
    "payment plan",
    "payment plans",
    "monthly payment",
    "monthly payments",
    "credit approval",
    "apr",
    "low interest",
];

pub const REPLACEMENT_PHRASES: &[&str] = &[
    "replace",
    "replaced",
    "replacing",
    "replacement",
    "new unit",
    "new system",
    "new furnace",
    "new ac",
    "new air conditioner",
    "new heat pump",
    "brand new",
    "upgrade",
    "upgrading",
];

pub const PROBLEM_KEYWORDS: &[&str] = &[
    "not cooling",
    "not heating",
    "no heat",
    "no ac",
    "no air",
    "no hot water",
    "blowing warm air",
    "blowing hot air",
    "blowing cold air",
    "leaking",
    "leak",
    "clogged",
    "backed up",
    "grinding",
    "squealing",
    "rattling",
    "banging",
    "noisy",
    "noise",
    "won't turn on",
    "wont turn on",
    "not turning on",
    "not working",
    "frozen",
    "iced up",
    "short cycling",
    "thermostat",
    "tripping",
    "smell",
    "odor",
    "pilot light",
];

// ---------------------------------------------------------------------------
// Regex builders
// ---------------------------------------------------------------------------

/// Word-bounded alternation over literal phrases, longest first so that
/// "no heat" wins over a shorter overlapping alternative.
fn phrase_regex(phrases: &[&str]) -> Regex {
    let mut sorted: Vec<&str> = phrases.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let body = sorted
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", body)).unwrap()
}

macro_rules! phrase_pattern {
    ($fn_name:ident, $phrases:expr) => {
        pub fn $fn_name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| phrase_regex($phrases))
        }
    };
}

phrase_pattern!(re_co, CO_PHRASES);
phrase_pattern!(re_gas, GAS_PHRASES);
phrase_pattern!(re_electrical, ELECTRICAL_PHRASES);
phrase_pattern!(re_fire, FIRE_PHRASES);
phrase_pattern!(re_water, WATER_PHRASES);
phrase_pattern!(re_exposure, EXPOSURE_PHRASES);
phrase_pattern!(re_evacuation, EVACUATION_PHRASES);
phrase_pattern!(re_occupant, OCCUPANT_WORDS);
phrase_pattern!(re_unit_location, UNIT_LOCATIONS);
phrase_pattern!(re_access, ACCESS_PHRASES);
phrase_pattern!(re_sentiment, SENTIMENT_KEYWORDS);
phrase_pattern!(re_urgency, URGENCY_KEYWORDS);
phrase_pattern!(re_financing, FINANCING_PHRASES);
phrase_pattern!(re_replacement, REPLACEMENT_PHRASES);
phrase_pattern!(re_problem, PROBLEM_KEYWORDS);

pub fn re_brand() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names: Vec<&str> = EQUIPMENT_BRANDS.iter().map(|(k, _)| *k).collect();
        phrase_regex(&names)
    })
}

/// Hazard phrase group for a category.
pub fn hazard_regex(hazard: HazardType) -> &'static Regex {
    match hazard {
        HazardType::CarbonMonoxide => re_co(),
        HazardType::Gas => re_gas(),
        HazardType::Electrical => re_electrical(),
        HazardType::Fire => re_fire(),
        HazardType::Water => re_water(),
    }
}

/// "15 years old", "15-year-old", "12 yrs old", "8 year old unit".
pub fn re_age() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})[\s-]*(?:years?|yrs?)[\s-]*old\b").unwrap())
}

/// R-22, R22, r 410a, R-454B, R-32, R-407C.
pub fn re_refrigerant() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\br[\s-]?(22|410a|454b|407c|32)\b").unwrap())
}

/// "shut off the gas", "turned off the main breaker", "shut the water off".
pub fn re_shut_off() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let verb = r"(?:shut|turned|turn|switched|switch|closed|close)";
        let owner = r"(?:(?:the|their|his|her)\s+)?(?:main\s+)?";
        let target = r"(?:gas|water|power|breaker|electricity|valve|unit|system)";
        Regex::new(&format!(
            r"\b{verb}\s+(?:off|down)\s+{owner}{target}\b|\b{verb}\s+{owner}{target}\s+(?:off|down)\b"
        ))
        .unwrap()
    })
}

/// "gate code is 4521", "gate code: #4521", "code to the gate is 4521".
pub fn re_gate_code() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:gate\s+code|code\s+(?:for|to)\s+the\s+gate)\s*(?:is|:|=)?\s*#?\s*(\d{3,8})\b",
        )
        .unwrap()
    })
}

/// "aggressive dog", "dog in the backyard", "beware of dog".
pub fn re_pet_warning() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:(?:aggressive|big|large|loose|protective|barking|mean)\s+(?:dogs?|pets?)|dogs?\s+(?:will be\s+|is\s+|are\s+)?(?:in|loose in)\s+the\s+(?:back\s?yard|yard)|dogs?\s+(?:bites|may bite|is not friendly)|beware\s+of\s+(?:the\s+)?dogs?)\b",
        )
        .unwrap()
    })
}

/// "key is under the mat", "key in the lockbox".
pub fn re_key_location() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bkeys?\s+(?:is\s+|are\s+)?((?:under|in|at|behind|inside|with)\s+[^.,;!?\n]{2,40})")
            .unwrap()
    })
}

/// "another company", "second opinion", "a quote from acme air".
///
/// Group 1 is a fixed phrase, group 2 a named quote source.
pub fn re_competitor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(another company|other company|different company|competitor|second opinion)\b|\b((?:a|another) quote from [a-z0-9&' ]{2,30}?)(?:[.,;!?\n]|$|\s+(?:and|but|who|that|for)\b)",
        )
        .unwrap()
    })
}

/// "already tried resetting the thermostat", "just replaced the filter".
pub fn re_prior_attempt() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\b(?:already|previously|just)\s+(?:tried|replaced|reset|changed|checked|cleaned|had someone|called|flipped)[^.;!?\n]{0,60}",
        )
        .unwrap()
    })
}

/// Quoted speech between straight or curly double quotes, 8 to 120 chars.
pub fn re_quote() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"\n]{8,120})"|“([^”\n]{8,120})”"#).unwrap())
}
