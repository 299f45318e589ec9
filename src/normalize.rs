use anyhow::{Result, bail};

/// Trailing administrative-unit suffixes stripped from county names, tested
/// in this order; at most one is removed.
const COUNTY_SUFFIXES: &[&str] = &[
    " COUNTY EQUIVALENTS",
    " COUNTY",
    " COUNTIES",
    " PARISH",
    " PARISHES",
    " MUNICIPIO",
    " MUNICIPIOS",
    " MUNICIPALITY",
    " CITY",
    " BOROUGH",
    " CENSUS AREA",
    " ISLANDS",
    " ISLAND",
];

/// Uppercase a state name and collapse internal whitespace. State names are
/// already canonical in the source files, so nothing further is folded.
pub fn normalize_state_name(name: &str) -> String {
    collapse_whitespace(&name.trim().to_uppercase())
}

/// Reduce a free-text county name to a dense comparison key.
///
/// Folds orthographic variants (SAINT/ST., CNTY, apostrophes, hyphens),
/// strips one trailing administrative suffix, drops everything outside
/// `[A-Z0-9 ]`, and finally removes all spaces. Two raw spellings that
/// produce the same key are the same county for lookup purposes. The
/// function is pure and idempotent.
pub fn normalize_county_name(name: &str) -> String {
    let mut value = name.to_uppercase();
    value = value.replace("SAINTE", "STE");
    value = value.replace("SAINT", "ST");
    value = value.replace("ST.", "ST");
    value = value.replace("CNTY", "COUNTY");
    value = value.replace('\'', "");
    value = value.replace('.', " ");
    value = value.replace('-', " ");
    value = value.replace('\u{2019}', "");

    for suffix in COUNTY_SUFFIXES {
        if let Some(stripped) = value.strip_suffix(suffix) {
            value = stripped.to_string();
            break;
        }
    }

    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(cleaned.trim()).replace(' ', "")
}

/// Canonicalize a locality number to its integer-string form. The source
/// files carry values like `"5"`, `"05"`, and `"5.0"` which must all key
/// identically. Blank and non-numeric values are rejected; callers treat
/// that as a skippable row defect, not a fatal error.
pub fn normalize_locality_number(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        bail!("missing locality number");
    }
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| anyhow::anyhow!("non-numeric locality number: {trimmed}"))?;
    if !parsed.is_finite() {
        bail!("non-numeric locality number: {trimmed}");
    }
    Ok((parsed as i64).to_string())
}

/// Left-pad a code to five digits, as the source ZIP and county FIPS
/// columns drop leading zeros when round-tripped through spreadsheets.
pub fn zfill5(value: &str) -> String {
    format!("{:0>5}", value.trim())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
