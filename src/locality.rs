use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use similar::TextDiff;
use tracing::debug;

use crate::county_text::{CountyScope, classify_scope, parse_segments};
use crate::error::PricingError;
use crate::normalize::{normalize_county_name, normalize_locality_number, normalize_state_name};
use crate::states::{state_abbr_for_name, state_name_for_abbr};

/// Minimum similarity ratio for a fuzzy county match. Empirically chosen in
/// the source data work; no derivation exists for the exact value.
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.90;

/// One payment locality. Identity is (state, locality number); many county
/// keys may share a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalityEntry {
    pub state_name: String,
    pub state_abbr: String,
    pub locality_number: String,
    pub locality_name: String,
    pub mac: String,
}

/// A raw row of the locality source table, as published: the counties field
/// is free text and the state label may be a `/`-joined list.
#[derive(Debug, Clone)]
pub struct RawLocalityRow {
    pub mac: String,
    pub locality_number: String,
    pub state_label: String,
    pub locality_name: String,
    pub counties: String,
}

/// Resolves (state, county) to a locality entry.
///
/// Three maps per the scope model: exact county keys, per-state "all other
/// counties" fallbacks, and per-state "all counties" entries. Rebuilt
/// wholesale from the raw rows on every load; never mutated afterwards.
#[derive(Debug, Default)]
pub struct LocalityIndex {
    // BTreeMap keeps fuzzy candidate iteration deterministic.
    specific: HashMap<String, BTreeMap<String, Arc<LocalityEntry>>>,
    rest: HashMap<String, Arc<LocalityEntry>>,
    all: HashMap<String, Arc<LocalityEntry>>,
    fuzzy_threshold: f32,
}

impl LocalityIndex {
    pub fn build(rows: &[RawLocalityRow]) -> Self {
        let mut index = LocalityIndex {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            ..LocalityIndex::default()
        };
        let mut skipped = 0usize;
        for row in rows {
            if !index.ingest_row(row) {
                skipped += 1;
            }
        }
        debug!(
            states_specific = index.specific.len(),
            states_rest = index.rest.len(),
            states_all = index.all.len(),
            skipped_rows = skipped,
            "built locality index"
        );
        index
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f32) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    // Returns false when the row was dropped as defective. Row-level
    // defects never abort the build; the query side stays strict instead.
    fn ingest_row(&mut self, row: &RawLocalityRow) -> bool {
        let locality_number = match normalize_locality_number(&row.locality_number) {
            Ok(n) => n,
            Err(err) => {
                debug!(state_label = %row.state_label, %err, "skipping locality row");
                return false;
            }
        };
        let state_field = row.state_label.trim();
        let counties_text = row.counties.trim();
        if state_field.is_empty() || counties_text.is_empty() {
            return false;
        }
        let row_states: Vec<String> = state_field
            .split('/')
            .filter(|part| !part.trim().is_empty())
            .map(normalize_state_name)
            .collect();

        let make_entry = |state_name: &str, abbr: &str| {
            Arc::new(LocalityEntry {
                state_name: state_name.to_string(),
                state_abbr: abbr.to_string(),
                locality_number: locality_number.clone(),
                locality_name: row.locality_name.trim().to_string(),
                mac: row.mac.trim().to_string(),
            })
        };

        match classify_scope(counties_text) {
            scope @ (CountyScope::Rest | CountyScope::All) => {
                for state_name in &row_states {
                    // The source occasionally carries non-US labels; drop them.
                    let Some(abbr) = state_abbr_for_name(state_name) else {
                        continue;
                    };
                    let entry = make_entry(state_name, abbr);
                    let target = match scope {
                        CountyScope::Rest => &mut self.rest,
                        _ => &mut self.all,
                    };
                    target.insert(state_name.clone(), entry);
                }
            }
            CountyScope::Specific => {
                for segment in parse_segments(counties_text, &row_states) {
                    for seg_state in &segment.states {
                        let state_name = normalize_state_name(seg_state);
                        let Some(abbr) = state_abbr_for_name(&state_name) else {
                            continue;
                        };
                        let entry = make_entry(&state_name, abbr);
                        let state_map = self.specific.entry(state_name).or_default();
                        for county in &segment.counties {
                            let county_key = normalize_county_name(county);
                            if county_key.is_empty() {
                                continue;
                            }
                            // Last write wins on contradictory source rows.
                            state_map.insert(county_key, Arc::clone(&entry));
                        }
                    }
                }
            }
        }
        true
    }

    /// Resolve a state abbreviation and raw county name to a locality.
    ///
    /// Fallback chain: exact key, fuzzy match against the state's known
    /// keys, the state's "all other counties" entry, then its "all
    /// counties" entry. The exact match is authoritative; fuzzy recovers
    /// spelling drift between the county reference and the locality file.
    pub fn find(
        &self,
        state_abbr: &str,
        county_name: &str,
    ) -> Result<Arc<LocalityEntry>, PricingError> {
        let Some(state_name) = state_name_for_abbr(state_abbr) else {
            return Err(PricingError::UnsupportedState(state_abbr.to_string()));
        };
        let county_key = normalize_county_name(county_name);
        if let Some(entry) = self
            .specific
            .get(state_name)
            .and_then(|state_map| state_map.get(&county_key))
        {
            return Ok(Arc::clone(entry));
        }
        if let Some(entry) = self.fuzzy_match(state_name, &county_key) {
            debug!(county = county_name, state = state_abbr, "fuzzy locality match");
            return Ok(entry);
        }
        if let Some(entry) = self.rest.get(state_name) {
            return Ok(Arc::clone(entry));
        }
        if let Some(entry) = self.all.get(state_name) {
            return Ok(Arc::clone(entry));
        }
        Err(PricingError::NoLocalityMapping {
            county: county_name.to_string(),
            state_abbr: state_abbr.to_string(),
        })
    }

    fn fuzzy_match(&self, state_name: &str, target: &str) -> Option<Arc<LocalityEntry>> {
        let candidates = self.specific.get(state_name)?;
        let mut best_score = 0.0f32;
        let mut best_entry: Option<&Arc<LocalityEntry>> = None;
        for (candidate_key, entry) in candidates {
            let score = TextDiff::from_chars(candidate_key.as_str(), target).ratio();
            if score > best_score {
                best_score = score;
                best_entry = Some(entry);
            }
        }
        if best_score >= self.fuzzy_threshold {
            best_entry.map(Arc::clone)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        locality_number: &str,
        state_label: &str,
        locality_name: &str,
        counties: &str,
    ) -> RawLocalityRow {
        RawLocalityRow {
            mac: "10112".to_string(),
            locality_number: locality_number.to_string(),
            state_label: state_label.to_string(),
            locality_name: locality_name.to_string(),
            counties: counties.to_string(),
        }
    }

    #[test]
    fn exact_match_beats_fallbacks() {
        let index = LocalityIndex::build(&[
            row("18", "FLORIDA", "MIAMI", "Miami-Dade"),
            row("99", "FLORIDA", "REST OF FLORIDA", "All Other Counties"),
        ]);
        let entry = index.find("FL", "Miami-Dade County").unwrap();
        assert_eq!(entry.locality_number, "18");
        assert_eq!(entry.state_abbr, "FL");
    }

    #[test]
    fn rest_scope_registers_under_state() {
        let index = LocalityIndex::build(&[row(
            "31",
            "TEXAS",
            "REST OF TEXAS",
            "All Other Counties",
        )]);
        let entry = index.find("TX", "Zavala").unwrap();
        assert_eq!(entry.locality_number, "31");
        assert_eq!(entry.state_name, "TEXAS");
    }

    #[test]
    fn all_scope_covers_every_county() {
        let index = LocalityIndex::build(&[row("1", "ALASKA", "ALASKA", "All Counties")]);
        let entry = index.find("AK", "Nome Census Area").unwrap();
        assert_eq!(entry.locality_number, "1");
    }

    #[test]
    fn fuzzy_recovers_spelling_drift() {
        let index = LocalityIndex::build(&[row(
            "2",
            "NEW YORK",
            "POUGHKPSIE/N NYC SUBURBS",
            "Duchess, Orange",
        )]);
        // Reference file spells it Dutchess; the locality file dropped the T.
        let entry = index.find("NY", "Dutchess").unwrap();
        assert_eq!(entry.locality_number, "2");
    }

    #[test]
    fn fuzzy_never_matches_below_threshold() {
        let index = LocalityIndex::build(&[row("20", "TEXAS", "HOUSTON", "Harris")]);
        let err = index.find("TX", "Travis").unwrap_err();
        assert!(matches!(err, PricingError::NoLocalityMapping { .. }));
    }

    #[test]
    fn fuzzy_miss_falls_through_to_rest() {
        let index = LocalityIndex::build(&[
            row("20", "TEXAS", "HOUSTON", "Harris"),
            row("31", "TEXAS", "REST OF TEXAS", "All Other Counties"),
        ]);
        let entry = index.find("TX", "Travis").unwrap();
        assert_eq!(entry.locality_number, "31");
    }

    #[test]
    fn segment_state_override_is_honored() {
        let index = LocalityIndex::build(&[row(
            "26",
            "CALIFORNIA",
            "LOS ANGELES-LONG BEACH-ANAHEIM",
            "Los Angeles; Orange IN California",
        )]);
        assert_eq!(index.find("CA", "Orange").unwrap().locality_number, "26");
        assert_eq!(
            index.find("CA", "Los Angeles").unwrap().locality_number,
            "26"
        );
    }

    #[test]
    fn slash_joined_state_label_registers_both_states() {
        let index = LocalityIndex::build(&[row(
            "1",
            "IOWA/MISSOURI",
            "REST OF STATE",
            "All Other Counties",
        )]);
        assert_eq!(index.find("IA", "Polk").unwrap().state_abbr, "IA");
        assert_eq!(index.find("MO", "Cole").unwrap().state_abbr, "MO");
    }

    #[test]
    fn bad_locality_number_skips_row_not_build() {
        let index = LocalityIndex::build(&[
            row("", "TEXAS", "BROKEN", "Harris"),
            row("nan", "TEXAS", "BROKEN", "Bexar"),
            row("31", "TEXAS", "REST OF TEXAS", "All Other Counties"),
        ]);
        let entry = index.find("TX", "Harris").unwrap();
        assert_eq!(entry.locality_number, "31");
    }

    #[test]
    fn unknown_state_labels_are_silently_dropped() {
        let index = LocalityIndex::build(&[row("5", "ONTARIO", "NOT US", "All Counties")]);
        let err = index.find("TX", "Harris").unwrap_err();
        assert!(matches!(err, PricingError::NoLocalityMapping { .. }));
    }

    #[test]
    fn unsupported_abbreviation_is_an_error() {
        let index = LocalityIndex::build(&[]);
        let err = index.find("XX", "Harris").unwrap_err();
        assert_eq!(err, PricingError::UnsupportedState("XX".to_string()));
    }

    #[test]
    fn last_write_wins_on_county_collisions() {
        let index = LocalityIndex::build(&[
            row("7", "TEXAS", "FIRST CLAIM", "Harris"),
            row("20", "TEXAS", "SECOND CLAIM", "Harris"),
        ]);
        assert_eq!(index.find("TX", "Harris").unwrap().locality_number, "20");
    }

    #[test]
    fn locality_numbers_are_canonicalized() {
        let index = LocalityIndex::build(&[row("05.0", "TEXAS", "HOUSTON", "Harris")]);
        assert_eq!(index.find("TX", "Harris").unwrap().locality_number, "5");
    }
}
