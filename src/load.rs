//! CSV ingestion adapters for the five reference files.
//!
//! Row-level defects (unparsable numerics, blank keys, bad locality
//! numbers) drop the row and continue. The build side is permissive so a
//! snapshot is always available; the query side stays strict.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::{debug, info};

use crate::locality::RawLocalityRow;
use crate::normalize::{normalize_locality_number, zfill5};
use crate::tables::{
    CountyNameTable, GpciFactors, GpciTable, RvuComponents, RvuTable, ZipCountyRow, ZipCountyTable,
};

#[derive(Debug, Deserialize)]
struct ZipCountyCsvRow {
    #[serde(rename = "ZIP")]
    zip: String,
    #[serde(rename = "COUNTY")]
    county: String,
    #[serde(rename = "USPS_ZIP_PREF_STATE")]
    state: String,
    #[serde(rename = "RES_RATIO")]
    res_ratio: String,
}

pub fn load_zip_to_county(path: &Path) -> Result<ZipCountyTable> {
    let file =
        File::open(path).with_context(|| format!("Failed opening {}", path.display()))?;
    let table = read_zip_to_county(file)
        .with_context(|| format!("Failed reading ZIP-county file {}", path.display()))?;
    info!(zips = table.len(), "loaded ZIP-county table");
    Ok(table)
}

pub fn read_zip_to_county<R: Read>(reader: R) -> Result<ZipCountyTable> {
    let mut csv_reader = ReaderBuilder::new().from_reader(reader);
    let mut table = ZipCountyTable::new();
    for row in csv_reader.deserialize::<ZipCountyCsvRow>() {
        let row = row.context("Failed parsing ZIP-county record")?;
        let Ok(res_ratio) = row.res_ratio.trim().parse::<f64>() else {
            continue;
        };
        table
            .entry(zfill5(&row.zip))
            .or_default()
            .push(ZipCountyRow {
                county_code: zfill5(&row.county),
                state_abbr: row.state.trim().to_string(),
                res_ratio,
            });
    }
    Ok(table)
}

pub fn load_county_reference(path: &Path) -> Result<CountyNameTable> {
    let file =
        File::open(path).with_context(|| format!("Failed opening {}", path.display()))?;
    let table = read_county_reference(file)
        .with_context(|| format!("Failed reading county reference {}", path.display()))?;
    info!(counties = table.len(), "loaded county reference");
    Ok(table)
}

/// The census county file is headerless:
/// `state_abbr,state_fips,county_fips,county_name,class`. The 5-digit
/// county code is the zero-padded state FIPS + county FIPS.
pub fn read_county_reference<R: Read>(reader: R) -> Result<CountyNameTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut table = CountyNameTable::new();
    for record in csv_reader.records() {
        let record = record.context("Failed parsing county reference record")?;
        let (Some(state_fips), Some(county_fips), Some(county_name)) =
            (record.get(1), record.get(2), record.get(3))
        else {
            continue;
        };
        let county_code = format!("{:0>2}{:0>3}", state_fips.trim(), county_fips.trim());
        table.insert(county_code, county_name.trim().to_string());
    }
    Ok(table)
}

pub fn load_county_locality(path: &Path) -> Result<Vec<RawLocalityRow>> {
    let file =
        File::open(path).with_context(|| format!("Failed opening {}", path.display()))?;
    let rows = read_county_locality(file)
        .with_context(|| format!("Failed reading locality file {}", path.display()))?;
    info!(rows = rows.len(), "loaded raw locality rows");
    Ok(rows)
}

/// The locality file carries two title lines before its header, and the
/// state label column is only populated on the first row of each run of
/// localities for that state; later rows inherit it (forward fill).
pub fn read_county_locality<R: Read>(reader: R) -> Result<Vec<RawLocalityRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();
    for _ in 0..2 {
        records
            .next()
            .transpose()
            .context("Failed skipping locality title rows")?;
    }
    let header = records
        .next()
        .transpose()
        .context("Failed reading locality header")?
        .context("Locality file has no header row")?;
    let mac_idx = column_index(&header, "Medicare Adminstrative Contractor")?;
    let number_idx = column_index(&header, "Locality Number")?;
    let state_idx = column_index(&header, "State")?;
    let name_idx = column_index(&header, "Fee Schedule Area")?;
    let counties_idx = column_index(&header, "Counties")?;

    let mut rows = Vec::new();
    let mut carried_state = String::new();
    for record in records {
        let record = record.context("Failed parsing locality record")?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let state_label = field(&record, state_idx);
        if !state_label.is_empty() {
            carried_state = state_label;
        }
        let locality_number = field(&record, number_idx);
        let counties = field(&record, counties_idx);
        if carried_state.is_empty() || locality_number.is_empty() || counties.is_empty() {
            continue;
        }
        rows.push(RawLocalityRow {
            mac: field(&record, mac_idx),
            locality_number,
            state_label: carried_state.clone(),
            locality_name: field(&record, name_idx),
            counties,
        });
    }
    Ok(rows)
}

pub fn load_gpci(path: &Path) -> Result<GpciTable> {
    let file =
        File::open(path).with_context(|| format!("Failed opening {}", path.display()))?;
    let table = read_gpci(file)
        .with_context(|| format!("Failed reading GPCI file {}", path.display()))?;
    info!(localities = table.len(), "loaded GPCI table");
    Ok(table)
}

pub fn read_gpci<R: Read>(reader: R) -> Result<GpciTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();
    for _ in 0..2 {
        records
            .next()
            .transpose()
            .context("Failed skipping GPCI title rows")?;
    }
    let header = records
        .next()
        .transpose()
        .context("Failed reading GPCI header")?
        .context("GPCI file has no header row")?;
    let state_idx = column_index(&header, "State")?;
    let number_idx = column_index(&header, "Locality Number")?;
    let work_idx = column_index(&header, "2025 PW GPCI (with 1.0 Floor)")?;
    let pe_idx = column_index(&header, "2025 PE GPCI")?;
    let mp_idx = column_index(&header, "2025 MP GPCI")?;

    let mut table = GpciTable::new();
    let mut skipped = 0usize;
    for record in records {
        let record = record.context("Failed parsing GPCI record")?;
        let state = field(&record, state_idx);
        let raw_number = field(&record, number_idx);
        if state.is_empty() || raw_number.is_empty() {
            continue;
        }
        let Ok(locality_number) = normalize_locality_number(&raw_number) else {
            skipped += 1;
            continue;
        };
        let (Some(work), Some(practice_expense), Some(malpractice)) = (
            parse_float(&record, work_idx),
            parse_float(&record, pe_idx),
            parse_float(&record, mp_idx),
        ) else {
            skipped += 1;
            continue;
        };
        table.insert(
            (state, locality_number),
            GpciFactors {
                work,
                practice_expense,
                malpractice,
            },
        );
    }
    if skipped > 0 {
        debug!(skipped, "dropped defective GPCI rows");
    }
    Ok(table)
}

pub fn load_rvu(path: &Path) -> Result<RvuTable> {
    let file =
        File::open(path).with_context(|| format!("Failed opening {}", path.display()))?;
    let table = read_rvu(file)
        .with_context(|| format!("Failed reading RVU file {}", path.display()))?;
    info!(codes = table.len(), "loaded RVU table");
    Ok(table)
}

/// The RVU file has a variable-length preamble; the real header is the
/// first row whose leading column starts with `HCPCS`. That header names
/// two columns `RVU`: the first is the work component, the second
/// malpractice. Modifier-bearing rows are excluded; the first base row
/// per code wins.
pub fn read_rvu<R: Read>(reader: R) -> Result<RvuTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.records();
    let header = loop {
        let Some(record) = records.next().transpose().context("Failed scanning for RVU header")?
        else {
            bail!("Could not find header row starting with 'HCPCS'");
        };
        if record
            .get(0)
            .is_some_and(|first| first.trim().starts_with("HCPCS"))
        {
            break record;
        }
    };
    let hcpcs_idx = column_index(&header, "HCPCS")?;
    let mod_idx = column_index(&header, "MOD")?;
    let rvu_columns: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| name.trim() == "RVU")
        .map(|(idx, _)| idx)
        .collect();
    let &[work_idx, mp_idx] = rvu_columns.as_slice() else {
        bail!("Expected exactly two 'RVU' columns, found {}", rvu_columns.len());
    };
    let pe_idx = column_index(&header, "PE RVU")?;

    let mut table = RvuTable::new();
    for record in records {
        let record = record.context("Failed parsing RVU record")?;
        let code = field(&record, hcpcs_idx);
        if code.is_empty() {
            continue;
        }
        // Only the unmodified base row is retained for each code.
        if !field(&record, mod_idx).is_empty() {
            continue;
        }
        let (Some(work), Some(practice_expense), Some(malpractice)) = (
            parse_float(&record, work_idx),
            parse_float(&record, pe_idx),
            parse_float(&record, mp_idx),
        ) else {
            continue;
        };
        table.entry(code).or_insert(RvuComponents {
            work,
            practice_expense,
            malpractice,
        });
    }
    Ok(table)
}

// Headers in the source files carry stray trailing spaces ("State ",
// "Fee Schedule Area "), so matching is done on trimmed names.
fn column_index(header: &StringRecord, name: &str) -> Result<usize> {
    header
        .iter()
        .position(|column| column.trim() == name)
        .with_context(|| format!("Missing column '{name}' in header {header:?}"))
}

fn field(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}

fn parse_float(record: &StringRecord, idx: usize) -> Option<f64> {
    record.get(idx)?.trim().replace(',', "").parse().ok()
}
