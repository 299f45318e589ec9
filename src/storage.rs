use std::path::{Path, PathBuf};

/// Locations of the five reference files inside a data directory, using
/// the file names the 2025 fee schedule ships with.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub zip_to_county: PathBuf,
    pub county_locality: PathBuf,
    pub gpci: PathBuf,
    pub rvu: PathBuf,
    pub county_reference: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir: PathBuf = data_dir.into();
        Self {
            zip_to_county: data_dir.join("Zip-County.csv"),
            county_locality: data_dir.join("25LOCCO1.csv"),
            gpci: data_dir.join("GPCI2025.csv"),
            rvu: data_dir.join("PPRRVU25_JAN1.csv"),
            county_reference: data_dir.join("national_county.txt"),
        }
    }

    pub fn all_present(&self) -> bool {
        [
            &self.zip_to_county,
            &self.county_locality,
            &self.gpci,
            &self.rvu,
            &self.county_reference,
        ]
        .iter()
        .all(|path| file_present_nonempty(path))
    }
}

pub fn file_present_nonempty(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(m) => m.is_file() && m.len() > 0,
        Err(_) => false,
    }
}
