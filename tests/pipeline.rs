//! End-to-end pricing over a snapshot built from CSV fixtures, exercising
//! the same shapes the 2025 reference files ship with.

use std::sync::Arc;
use std::thread;

use pfs_pricer::PricingError;
use pfs_pricer::load::{
    read_county_locality, read_county_reference, read_gpci, read_rvu, read_zip_to_county,
};
use pfs_pricer::locality::LocalityIndex;
use pfs_pricer::pricing::ReferenceData;

const ZIP_COUNTY_CSV: &str = "\
ZIP,COUNTY,USPS_ZIP_PREF_CITY,USPS_ZIP_PREF_STATE,RES_RATIO
601,72001,ADJUNTAS,PR,0.994
601,72141,UTUADO,PR,0.006
32033,12109,ELKTON,FL,1.0
79936,48141,EL PASO,TX,1.0
";

const COUNTY_REFERENCE_CSV: &str = "\
PR,72,1,Adjuntas Municipio,H1
PR,72,141,Utuado Municipio,H1
FL,12,109,Saint Johns County,H1
TX,48,141,El Paso County,H1
";

const LOCALITY_CSV: &str = "\
2025 PHYSICIAN FEE SCHEDULE AREAS,,,,
,,,,
Medicare Adminstrative Contractor,Locality Number,State ,Fee Schedule Area ,Counties
9102,20,PUERTO RICO,PUERTO RICO,All Counties
4412,18,TEXAS,GALVESTON,Galveston
4412,31,,REST OF TEXAS,All Other Counties
9102,4,FLORIDA,JACKSONVILLE,Duval and St. Johns
9102,99,,REST OF FLORIDA,All Other Counties
";

const GPCI_CSV: &str = "\
2025 GEOGRAPHIC PRACTICE COST INDICES,,,,,,
,,,,,,
Medicare Administrative Contractor (MAC),State,Locality Number,Locality Name,2025 PW GPCI (with 1.0 Floor),2025 PE GPCI,2025 MP GPCI
9102,PR,20,PUERTO RICO,1.0,0.7,0.3
4412,TX,18,GALVESTON,1.0,0.97,0.71
4412,TX,31,REST OF TEXAS,1.0,0.9,0.8
9102,FL,4,JACKSONVILLE,1.0,0.9,1.0
9102,FL,99,REST OF FLORIDA,1.0,0.92,1.1
";

const RVU_CSV: &str = "\
January 2025 Addendum,,,,,
,,,,,
HCPCS,MOD,DESCRIPTION,RVU,PE RVU,RVU
99285,,Emergency dept visit high mdm,4.0,1.0,0.4
99285,26,Emergency dept visit high mdm,4.0,0.5,0.2
99213,,Office o/p est low mdm,1.3,1.26,0.1
";

fn snapshot() -> ReferenceData {
    let zip_to_county = read_zip_to_county(ZIP_COUNTY_CSV.as_bytes()).unwrap();
    let county_names = read_county_reference(COUNTY_REFERENCE_CSV.as_bytes()).unwrap();
    let locality_rows = read_county_locality(LOCALITY_CSV.as_bytes()).unwrap();
    let localities = LocalityIndex::build(&locality_rows);
    let gpci = read_gpci(GPCI_CSV.as_bytes()).unwrap();
    let rvu = read_rvu(RVU_CSV.as_bytes()).unwrap();
    ReferenceData::new(zip_to_county, county_names, localities, gpci, rvu)
}

#[test]
fn puerto_rico_emergency_visit_prices_positive() {
    let data = snapshot();
    let price = data.price("99285", "00601").unwrap();
    // (4.0*1.0 + 1.0*0.7 + 0.4*0.3) * 32.35
    assert_eq!(price, 155.93);
}

#[test]
fn unknown_zip_is_zip_not_found() {
    let data = snapshot();
    assert_eq!(
        data.price("99285", "99999").unwrap_err(),
        PricingError::ZipNotFound("99999".to_string())
    );
}

#[test]
fn unknown_code_is_rvu_not_found() {
    let data = snapshot();
    assert_eq!(
        data.price("ZZZZZ", "00601").unwrap_err(),
        PricingError::RvuNotFound("ZZZZZ".to_string())
    );
}

#[test]
fn texas_zip_falls_back_to_rest_of_state() {
    // El Paso has no specific row; the forward-filled TEXAS "All Other
    // Counties" row must catch it.
    let data = snapshot();
    let price = data.price("99213", "79936").unwrap();
    // (1.3*1.0 + 1.26*0.9 + 0.1*0.8) * 32.35 = 81.3279
    assert_eq!(price, 81.33);
}

#[test]
fn saint_johns_spelling_variants_resolve_to_jacksonville() {
    // The locality file says "St. Johns", the county reference "Saint
    // Johns County"; both normalize to the same key.
    let data = snapshot();
    let price = data.price("99213", "32033").unwrap();
    // (1.3*1.0 + 1.26*0.9 + 0.1*1.0) * 32.35 = 81.9749
    assert_eq!(price, 81.97);
}

#[test]
fn modifier_rows_never_shadow_the_base_rvu_row() {
    let data = snapshot();
    // The 26-modifier 99285 row carries different PE/MP values; pricing
    // must use the base row only.
    assert_eq!(data.price("99285", "00601").unwrap(), 155.93);
}

#[test]
fn snapshot_is_shareable_across_threads() {
    let data = Arc::new(snapshot());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data = Arc::clone(&data);
            thread::spawn(move || data.price("99285", "00601").unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 155.93);
    }
}
