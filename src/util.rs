//! Text helpers shared by the extractor, tag classifier and narrative synthesizer.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Values upstream writes when the summarizer had nothing to say.
const PLACEHOLDER_SUMMARIES: &[&str] = &[
    "n/a",
    "na",
    "none",
    "null",
    "unknown",
    "no summary",
    "no summary available",
    "summary unavailable",
    "-",
    "tbd",
];

/// Bare service-type words that carry no narrative content on their own.
const BARE_SERVICE_WORDS: &[&str] = &[
    "hvac",
    "ac",
    "a/c",
    "heating",
    "cooling",
    "plumbing",
    "electrical",
    "repair",
    "service",
    "maintenance",
    "install",
    "installation",
    "estimate",
    "tune up",
    "tune-up",
];

// Leading "[EMERGENCY] [LEAD]" style system prefixes, and "Summary:" labels.
fn re_system_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:(?:\[[^\]]{1,24}\]|summary\s*:|ai summary\s*:)\s*)+").unwrap()
    })
}

/// Collapse runs of whitespace and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip system prefixes and normalize whitespace. `None` if nothing remains.
pub fn clean_summary(raw: &str) -> Option<String> {
    let stripped = re_system_prefix().replace(raw, "");
    let cleaned = collapse_whitespace(&stripped);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// True for known garbage values and bare service-type words.
pub fn is_placeholder(text: &str) -> bool {
    let key = text
        .trim()
        .trim_end_matches(|c: char| c == '.' || c == '!')
        .to_lowercase();
    key.is_empty()
        || PLACEHOLDER_SUMMARIES.contains(&key.as_str())
        || BARE_SERVICE_WORDS.contains(&key.as_str())
}

/// Byte offset of the `n`th char, or the string length.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map(|(i, _)| i).unwrap_or(text.len())
}

/// Truncate to at most `max_chars` characters (ellipsis included), cutting at
/// a word boundary.
///
/// Prefers the last whitespace past the midpoint of the budget; falls back to
/// any earlier whitespace, and only hard-cuts a single unbroken token.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 1 {
        return "…".chars().take(max_chars).collect();
    }

    let budget = max_chars - 1;
    let midpoint = budget / 2;
    let mut past_mid = None;
    let mut before_mid = None;
    for (n, (i, c)) in text.char_indices().enumerate() {
        if n > budget {
            break;
        }
        if c.is_whitespace() {
            if n > midpoint {
                past_mid = Some(i);
            } else if n > 0 {
                before_mid = Some(i);
            }
        }
    }

    let end = past_mid
        .or(before_mid)
        .unwrap_or_else(|| byte_offset(text, budget));
    let head = text[..end].trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == ';' || c == ':');
    format!("{}…", head)
}

/// Truncate at a sentence end near `target_chars`, else at a word boundary.
///
/// A sentence end counts if it falls in the second half of the target window.
pub fn truncate_at_sentence(text: &str, target_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= target_chars {
        return text.to_string();
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut cut = None;
    for (n, &(i, c)) in chars.iter().enumerate() {
        if n >= target_chars {
            break;
        }
        if matches!(c, '.' | '!' | '?') {
            let next_is_space = chars
                .get(n + 1)
                .map(|&(_, next)| next.is_whitespace())
                .unwrap_or(true);
            if next_is_space && n + 1 > target_chars / 2 {
                cut = Some(i + c.len_utf8());
            }
        }
    }

    match cut {
        Some(end) => text[..end].to_string(),
        None => truncate_at_word(text, target_chars),
    }
}

/// Second comma-delimited segment of an address: the locality in
/// "12 Elm St, Springfield, IL 62704".
pub fn address_locality(address: &str) -> Option<String> {
    address
        .split(',')
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// "today", "yesterday" or "N days ago", by UTC calendar day.
pub fn relative_day_phrase(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now.date_naive() - created_at.date_naive()).num_days();
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d => format!("{} days ago", d),
    }
}

/// Whole-dollar amount with thousands separators: 12000.0 → "$12,000".
pub fn format_currency(value: f64) -> String {
    let whole = value.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

/// Uppercase the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn truncation_never_splits_a_word() {
        let out = truncate_at_word("Carrier unit requires immediate attention", 20);
        assert_eq!(out, "Carrier unit…");
        assert!(out.chars().count() <= 20);
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_at_word("  No heat  ", 20), "No heat");
    }

    #[test]
    fn falls_back_to_early_boundary() {
        // Only whitespace is before the midpoint.
        let out = truncate_at_word("AC Supercalifragilisticexpialidocious", 20);
        assert_eq!(out, "AC…");
    }

    #[test]
    fn hard_cuts_a_single_long_token() {
        let out = truncate_at_word("Supercalifragilisticexpialidocious", 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn truncation_is_utf8_safe() {
        let out = truncate_at_word("Überprüfung der Heizungsanlage läuft noch", 18);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 18);
    }

    #[test]
    fn sentence_truncation_prefers_sentence_end() {
        let text = "Customer reports the furnace is short cycling every ten minutes. \
                    Unit is a 2009 Trane in the basement and the filter was changed last week.";
        let out = truncate_at_sentence(text, 100);
        assert_eq!(
            out,
            "Customer reports the furnace is short cycling every ten minutes."
        );
    }

    #[test]
    fn sentence_truncation_falls_back_to_words() {
        let text = "a ".repeat(80);
        let out = truncate_at_sentence(&text, 100);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 100);
    }

    #[test]
    fn clean_summary_strips_prefixes() {
        assert_eq!(
            clean_summary("[EMERGENCY] [LEAD]  Summary:  Gas smell in  kitchen").as_deref(),
            Some("Gas smell in kitchen")
        );
        assert_eq!(clean_summary("[URGENT]   "), None);
    }

    #[test]
    fn placeholders_are_detected() {
        assert!(is_placeholder("N/A"));
        assert!(is_placeholder("HVAC."));
        assert!(is_placeholder("   "));
        assert!(!is_placeholder("No cooling upstairs since Monday"));
    }

    #[test]
    fn locality_is_second_segment() {
        assert_eq!(
            address_locality("12 Elm St, Springfield, IL 62704").as_deref(),
            Some("Springfield")
        );
        assert_eq!(address_locality("12 Elm St"), None);
        assert_eq!(address_locality("12 Elm St, , IL"), None);
    }

    #[test]
    fn relative_day_phrases() {
        let now = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        let same = Utc.with_ymd_and_hms(2026, 3, 5, 0, 10, 0).unwrap();
        let prior = Utc.with_ymd_and_hms(2026, 3, 4, 23, 0, 0).unwrap();
        let older = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(relative_day_phrase(same, now), "today");
        assert_eq!(relative_day_phrase(prior, now), "yesterday");
        assert_eq!(relative_day_phrase(older, now), "4 days ago");
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(12000.0), "$12,000");
        assert_eq!(format_currency(950.4), "$950");
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(-5.0), "$0");
    }
}
