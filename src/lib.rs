pub mod county_text;
pub mod error;
pub mod load;
pub mod locality;
pub mod normalize;
pub mod pricing;
pub mod states;
pub mod storage;
pub mod tables;

pub use error::PricingError;
pub use locality::{LocalityEntry, LocalityIndex};
pub use pricing::{CONVERSION_FACTOR, ReferenceData};
pub use storage::DataPaths;
