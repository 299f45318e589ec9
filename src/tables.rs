use std::collections::HashMap;

/// Geographic practice cost multipliers for one (state, locality) key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpciFactors {
    pub work: f64,
    pub practice_expense: f64,
    pub malpractice: f64,
}

/// Relative value components for one billing code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RvuComponents {
    pub work: f64,
    pub practice_expense: f64,
    pub malpractice: f64,
}

/// One ZIP→county assignment with its residency-ratio weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipCountyRow {
    pub county_code: String,
    pub state_abbr: String,
    pub res_ratio: f64,
}

/// zip5 → county assignments, in source order (ties on residency ratio are
/// broken by the first row encountered).
pub type ZipCountyTable = HashMap<String, Vec<ZipCountyRow>>;

/// 5-digit FIPS county code → display name.
pub type CountyNameTable = HashMap<String, String>;

/// (state abbreviation, canonical locality number) → multipliers.
pub type GpciTable = HashMap<(String, String), GpciFactors>;

/// Billing code → base components. Modifier-bearing source rows are
/// excluded before this table is built.
pub type RvuTable = HashMap<String, RvuComponents>;
