/// Canonical state abbreviation / uppercase name pairs, covering the
/// jurisdictions that appear in the fee schedule source files (50 states,
/// DC, and the territories PR, VI, GU, MP).
pub const STATES: &[(&str, &str)] = &[
    ("AL", "ALABAMA"),
    ("AK", "ALASKA"),
    ("AZ", "ARIZONA"),
    ("AR", "ARKANSAS"),
    ("CA", "CALIFORNIA"),
    ("CO", "COLORADO"),
    ("CT", "CONNECTICUT"),
    ("DC", "DISTRICT OF COLUMBIA"),
    ("DE", "DELAWARE"),
    ("FL", "FLORIDA"),
    ("GA", "GEORGIA"),
    ("HI", "HAWAII"),
    ("IA", "IOWA"),
    ("ID", "IDAHO"),
    ("IL", "ILLINOIS"),
    ("IN", "INDIANA"),
    ("KS", "KANSAS"),
    ("KY", "KENTUCKY"),
    ("LA", "LOUISIANA"),
    ("MA", "MASSACHUSETTS"),
    ("MD", "MARYLAND"),
    ("ME", "MAINE"),
    ("MI", "MICHIGAN"),
    ("MN", "MINNESOTA"),
    ("MO", "MISSOURI"),
    ("MS", "MISSISSIPPI"),
    ("MT", "MONTANA"),
    ("NC", "NORTH CAROLINA"),
    ("ND", "NORTH DAKOTA"),
    ("NE", "NEBRASKA"),
    ("NH", "NEW HAMPSHIRE"),
    ("NJ", "NEW JERSEY"),
    ("NM", "NEW MEXICO"),
    ("NV", "NEVADA"),
    ("NY", "NEW YORK"),
    ("OH", "OHIO"),
    ("OK", "OKLAHOMA"),
    ("OR", "OREGON"),
    ("PA", "PENNSYLVANIA"),
    ("PR", "PUERTO RICO"),
    ("RI", "RHODE ISLAND"),
    ("SC", "SOUTH CAROLINA"),
    ("SD", "SOUTH DAKOTA"),
    ("TN", "TENNESSEE"),
    ("TX", "TEXAS"),
    ("UT", "UTAH"),
    ("VA", "VIRGINIA"),
    ("VI", "VIRGIN ISLANDS"),
    ("VT", "VERMONT"),
    ("WA", "WASHINGTON"),
    ("WI", "WISCONSIN"),
    ("WV", "WEST VIRGINIA"),
    ("WY", "WYOMING"),
    ("GU", "GUAM"),
    ("MP", "NORTHERN MARIANA ISLANDS"),
];

pub fn state_name_for_abbr(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(a, _)| *a == abbr)
        .map(|(_, name)| *name)
}

pub fn state_abbr_for_name(name: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(abbr, _)| *abbr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbr_and_name_round_trip() {
        assert_eq!(state_name_for_abbr("PR"), Some("PUERTO RICO"));
        assert_eq!(state_abbr_for_name("PUERTO RICO"), Some("PR"));
        assert_eq!(state_name_for_abbr("XX"), None);
        assert_eq!(state_abbr_for_name("ONTARIO"), None);
    }
}
