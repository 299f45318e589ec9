use anyhow::Result;
use tracing::debug;

use crate::error::PricingError;
use crate::load::{load_county_locality, load_county_reference, load_gpci, load_rvu, load_zip_to_county};
use crate::locality::LocalityIndex;
use crate::storage::DataPaths;
use crate::tables::{CountyNameTable, GpciTable, RvuTable, ZipCountyRow, ZipCountyTable};

/// 2025 physician fee schedule conversion factor (dollars per total RVU).
pub const CONVERSION_FACTOR: f64 = 32.35;

/// One immutable snapshot of all reference tables.
///
/// Built once, then only read; `price` takes `&self`, so concurrent callers
/// can share a snapshot behind an `Arc` with no locking. Reference-data
/// updates are handled by building a fresh snapshot and swapping the `Arc`
/// handed to new callers; in-flight computations keep the old one.
#[derive(Debug)]
pub struct ReferenceData {
    zip_to_county: ZipCountyTable,
    county_names: CountyNameTable,
    localities: LocalityIndex,
    gpci: GpciTable,
    rvu: RvuTable,
}

impl ReferenceData {
    pub fn new(
        zip_to_county: ZipCountyTable,
        county_names: CountyNameTable,
        localities: LocalityIndex,
        gpci: GpciTable,
        rvu: RvuTable,
    ) -> Self {
        Self {
            zip_to_county,
            county_names,
            localities,
            gpci,
            rvu,
        }
    }

    /// Load a snapshot from the reference CSV files.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let zip_to_county = load_zip_to_county(&paths.zip_to_county)?;
        let county_names = load_county_reference(&paths.county_reference)?;
        let localities = LocalityIndex::build(&load_county_locality(&paths.county_locality)?);
        let gpci = load_gpci(&paths.gpci)?;
        let rvu = load_rvu(&paths.rvu)?;
        Ok(Self::new(
            zip_to_county,
            county_names,
            localities,
            gpci,
            rvu,
        ))
    }

    /// Compute the fee-schedule price for a billing code at a ZIP code,
    /// rounded to cents. Any missing reference row aborts the whole
    /// computation with its specific error kind; no fallback price is
    /// ever substituted.
    pub fn price(&self, code: &str, zip: &str) -> Result<f64, PricingError> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(PricingError::InvalidInput("billing code is required".to_string()));
        }
        let zip = normalize_zip(zip)?;

        let selected = self.select_county(&zip)?;
        let county_name = self
            .county_names
            .get(&selected.county_code)
            .ok_or_else(|| PricingError::CountyCodeNotFound(selected.county_code.clone()))?;
        let locality = self.localities.find(&selected.state_abbr, county_name)?;
        let gpci = self
            .gpci
            .get(&(
                locality.state_abbr.clone(),
                locality.locality_number.clone(),
            ))
            .ok_or_else(|| PricingError::GpciNotFound {
                state_abbr: locality.state_abbr.clone(),
                locality_number: locality.locality_number.clone(),
            })?;
        let rvu = self
            .rvu
            .get(&code)
            .ok_or_else(|| PricingError::RvuNotFound(code.clone()))?;

        let raw = (rvu.work * gpci.work
            + rvu.practice_expense * gpci.practice_expense
            + rvu.malpractice * gpci.malpractice)
            * CONVERSION_FACTOR;
        debug!(
            %code,
            %zip,
            locality = %locality.locality_number,
            state = %locality.state_abbr,
            raw,
            "priced code"
        );
        Ok(round_to_cents(raw))
    }

    // Dominant county for a ZIP: maximum residency ratio, ties broken by
    // the first row in the reference table's order.
    fn select_county(&self, zip: &str) -> Result<&ZipCountyRow, PricingError> {
        let rows = self
            .zip_to_county
            .get(zip)
            .filter(|rows| !rows.is_empty())
            .ok_or_else(|| PricingError::ZipNotFound(zip.to_string()))?;
        let mut best = &rows[0];
        for row in &rows[1..] {
            if row.res_ratio > best.res_ratio {
                best = row;
            }
        }
        Ok(best)
    }
}

fn normalize_zip(zip: &str) -> Result<String, PricingError> {
    let trimmed = zip.trim();
    if trimmed.is_empty() {
        return Err(PricingError::InvalidInput("ZIP code is required".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(PricingError::InvalidInput("ZIP code must be numeric".to_string()));
    }
    Ok(format!("{trimmed:0>5}"))
}

// Round-half-up to two decimals. f64::round is half-away-from-zero, which
// is half-up for the non-negative amounts produced here.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
