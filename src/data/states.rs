//! State Name Module
//! Maps postal abbreviations to full state and territory names.

/// Postal abbreviations known to the dataset, with their full names.
pub const STATE_ABBREVIATIONS: [(&str, &str); 53] = [
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
    ("PR", "Puerto Rico"),
    ("VI", "Virgin Islands"),
];

/// Look up the full name for a postal abbreviation.
///
/// The lookup is exact: `"tx"` or `" TX"` do not match.
pub fn full_name(abbreviation: &str) -> Option<&'static str> {
    STATE_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == abbreviation)
        .map(|(_, name)| *name)
}

/// Normalize a raw `State` cell: trim whitespace and expand known
/// abbreviations. Anything else is kept as trimmed.
pub fn normalize_state(raw: &str) -> String {
    let trimmed = raw.trim();
    full_name(trimmed).unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_every_known_abbreviation() {
        for (abbr, name) in STATE_ABBREVIATIONS {
            assert_eq!(normalize_state(abbr), name);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = ["TX", " CA ", "Ohio", "Unknown Place", "", "VI", "dc"];
        for raw in samples {
            let once = normalize_state(raw);
            assert_eq!(normalize_state(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn trims_before_lookup() {
        assert_eq!(normalize_state("  NY\t"), "New York");
        assert_eq!(normalize_state(" Texas "), "Texas");
    }

    #[test]
    fn unknown_values_pass_through() {
        assert_eq!(normalize_state("Guam"), "Guam");
        assert_eq!(full_name("tx"), None);
    }

    #[test]
    fn full_names_are_never_abbreviations() {
        for (_, name) in STATE_ABBREVIATIONS {
            assert!(full_name(name).is_none());
        }
    }
}
