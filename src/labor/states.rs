use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Two-digit LAUS state numbers and the codes the merged table reports them
/// under: the 50 states plus the District of Columbia and Puerto Rico.
pub static STATE_DIRECTORY: &[(&str, &str)] = &[
    ("01", "AL"),
    ("02", "AK"),
    ("04", "AZ"),
    ("05", "AR"),
    ("06", "CA"),
    ("08", "CO"),
    ("09", "CT"),
    ("10", "DE"),
    ("11", "District of Columbia"),
    ("12", "FL"),
    ("13", "GA"),
    ("15", "HI"),
    ("16", "ID"),
    ("17", "IL"),
    ("18", "IN"),
    ("19", "IA"),
    ("20", "KS"),
    ("21", "KY"),
    ("22", "LA"),
    ("23", "ME"),
    ("24", "MD"),
    ("25", "MA"),
    ("26", "MI"),
    ("27", "MN"),
    ("28", "MS"),
    ("29", "MO"),
    ("30", "MT"),
    ("31", "NE"),
    ("32", "NV"),
    ("33", "NH"),
    ("34", "NJ"),
    ("35", "NM"),
    ("36", "NY"),
    ("37", "NC"),
    ("38", "ND"),
    ("39", "OH"),
    ("40", "OK"),
    ("41", "OR"),
    ("42", "PA"),
    ("44", "RI"),
    ("45", "SC"),
    ("46", "SD"),
    ("47", "TN"),
    ("48", "TX"),
    ("49", "UT"),
    ("50", "VT"),
    ("51", "VA"),
    ("53", "WA"),
    ("54", "WV"),
    ("55", "WI"),
    ("56", "WY"),
    ("72", "Puerto Rico"),
];

/// Number → code lookup over [`STATE_DIRECTORY`].
pub static STATE_CODES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| STATE_DIRECTORY.iter().copied().collect());

/// The statewide unemployment-rate series identifier for a state number.
pub fn series_id(number: &str) -> String {
    format!("LASST{number}0000000000003")
}

/// One retrieval window. The API caps the year span a single request may
/// cover, so the full history is pulled as two windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start_year: u16,
    pub end_year: u16,
}

/// Retrieval windows in fetch (and merge) order: recent window first.
pub static PERIODS: &[Period] = &[
    Period {
        start_year: 2010,
        end_year: 2020,
    },
    Period {
        start_year: 1990,
        end_year: 2010,
    },
];

/// Scratch-file name for one (state, period) fetch.
pub fn intermediate_name(number: &str, period: Period) -> String {
    format!("LASST{number}{}.csv", period.end_year)
}
