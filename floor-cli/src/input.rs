//! Parsing of command line values.

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%m-%d-%Y", "%m/%d/%Y", "%Y-%m-%d"];

/// Order date as typed by a user: `MM-DD-YYYY`, `MM/DD/YYYY` or ISO
/// `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("'{s}' is not a date, expected MM-DD-YYYY"))
}
