use thiserror::Error;

/// Terminal failures for a single price computation. None of these are
/// retried and no fallback price is ever substituted for one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("ZIP code {0} not found in ZIP-county data")]
    ZipNotFound(String),

    #[error("no county reference found for code {0}")]
    CountyCodeNotFound(String),

    #[error("unsupported state abbreviation: {0}")]
    UnsupportedState(String),

    #[error("no locality mapping found for {county} in {state_abbr}")]
    NoLocalityMapping { county: String, state_abbr: String },

    #[error("GPCI multipliers missing for state {state_abbr} locality {locality_number}")]
    GpciNotFound {
        state_abbr: String,
        locality_number: String,
    },

    #[error("CPT/HCPCS code {0} not found in RVU data")]
    RvuNotFound(String),
}
