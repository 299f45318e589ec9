use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::normalize_state_name;

/// How a raw locality row claims counties within its state(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountyScope {
    /// An enumerated county list.
    Specific,
    /// Every county in the state not claimed by another row.
    Rest,
    /// Every county in the state, no exceptions.
    All,
}

/// One parsed piece of a `Specific` row's counties text: the states it
/// applies to and the raw county names it enumerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountySegment {
    pub states: Vec<String>,
    pub counties: Vec<String>,
}

/// Classify a row's counties text. First match wins; tests are
/// case-insensitive against the full text.
pub fn classify_scope(text: &str) -> CountyScope {
    let upper = text.to_uppercase();
    if upper.contains("ALL OTHER COUNTIES") {
        return CountyScope::Rest;
    }
    if upper.contains("ALL COUNTY EQUIVALENTS") {
        return CountyScope::All;
    }
    if upper.starts_with("ALL COUNTIES") && upper.contains("EXCEPT") {
        return CountyScope::Rest;
    }
    if upper.starts_with("ALL COUNTIES") {
        return CountyScope::All;
    }
    if upper.starts_with("ALL COUNTY") {
        return CountyScope::All;
    }
    CountyScope::Specific
}

// Trailing state override, e.g. "San Diego IN California". Anchored to the
// end of a segment so county names containing "in" are untouched.
fn state_override_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bIN ([A-Z .'/&-]+)$").unwrap())
}

/// Split a `Specific` row's counties text into per-state segments.
///
/// Segments are `;`-separated (the whole text is one segment when no `;`
/// is present). A segment may carry its own trailing "IN <states>" override;
/// otherwise it inherits `default_states`. Segments with no county tokens
/// are dropped.
pub fn parse_segments(counties_text: &str, default_states: &[String]) -> Vec<CountySegment> {
    let sanitized = counties_text.replace('\n', " ");
    let mut raw_segments: Vec<&str> = sanitized
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if raw_segments.is_empty() {
        raw_segments.push(sanitized.trim());
    }

    let mut segments = Vec::new();
    for raw in raw_segments {
        let upper = raw.to_uppercase();
        let mut working = upper.as_str();
        let mut states: Vec<String> = default_states.to_vec();
        if let Some(caps) = state_override_re().captures(&upper) {
            let overridden = split_segment_states(caps.get(1).map(|m| m.as_str()).unwrap_or(""));
            if !overridden.is_empty() {
                states = overridden;
            }
            working = upper[..caps.get(0).map(|m| m.start()).unwrap_or(upper.len())].trim_end();
        }
        let counties = split_county_list(working);
        if counties.is_empty() {
            continue;
        }
        segments.push(CountySegment { states, counties });
    }
    segments
}

/// Tokenize a segment's state-override text ("CALIFORNIA/NEVADA", "IOWA &
/// MISSOURI", ...). Stray trailing " IN" artifacts left by the override
/// pattern are trimmed from each token.
pub fn split_segment_states(state_text: &str) -> Vec<String> {
    state_text
        .split(['/', ',', '&'])
        .filter_map(|token| {
            let mut candidate = normalize_state_name(token);
            if let Some(stripped) = candidate.strip_suffix(" IN") {
                candidate = stripped.trim_end().to_string();
            }
            if candidate.is_empty() {
                None
            } else {
                Some(candidate)
            }
        })
        .collect()
}

/// Tokenize the county-name portion of a segment. `/`, `&`, and the
/// standalone word AND all act as commas.
pub fn split_county_list(text: &str) -> Vec<String> {
    let mut value = text.replace('\n', " ");
    value = value.replace('/', ",");
    value = value.replace('&', ",");
    value = replace_word_and(&value);
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// Whole-word, case-insensitive "AND" -> ",". A plain str::replace would
// mangle names like ANDERSON or HIGHLAND.
fn replace_word_and(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)\bAND\b").unwrap());
    re.replace_all(text, ",").into_owned()
}
