//! Display formatting for dates, ages, and postal codes.
//!
//! View models keep date fields as the raw strings the database produced;
//! these helpers turn them into display text at render time. Unparseable
//! input degrades to the raw string rather than failing the page.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parses the date-ish strings the source schema produces.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`
/// (with optional fractional seconds) and bare `YYYY-MM-DD` dates, which
/// parse to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Full elapsed years between `dob` and `on`, decremented by one when the
/// anniversary has not yet occurred in `on`'s year.
pub fn age_years(dob: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Age for display: `1 yr` singular, `N yrs` for every other value
/// (including 0). Returns `None` when the birth date does not parse.
pub fn age_display(dob_raw: &str, on: NaiveDate) -> Option<String> {
    let dob = parse_timestamp(dob_raw)?.date();
    let age = age_years(dob, on);
    if age == 1 {
        Some("1 yr".to_owned())
    } else {
        Some(format!("{age} yrs"))
    }
}

/// Ordinal suffix for a day of the month. Days 11–13 take `th` regardless
/// of the mod-10 rule.
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `M/D/YYYY` with no zero-padding, e.g. `6/3/2021`.
pub fn slash_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => {
            let d = dt.date();
            format!("{}/{}/{}", d.month(), d.day(), d.year())
        }
        None => raw.to_owned(),
    }
}

/// `Mon Dth, YYYY`, e.g. `Jun 13th, 2021`.
pub fn short_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => {
            let d = dt.date();
            let month = MONTHS_SHORT[d.month0() as usize];
            format!("{} {}{}, {}", month, d.day(), ordinal_suffix(d.day()), d.year())
        }
        None => raw.to_owned(),
    }
}

/// `Dth Month YYYY, H:MMam/pm` on a 12-hour clock, e.g.
/// `13th June 2021, 4:05pm`.
pub fn long_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => {
            let d = dt.date();
            let month = MONTHS_LONG[d.month0() as usize];
            let (hour24, minute) = (dt.hour(), dt.minute());
            let period = if hour24 >= 12 { "pm" } else { "am" };
            let hour = match hour24 % 12 {
                0 => 12,
                h => h,
            };
            format!(
                "{}{} {} {}, {}:{:02}{}",
                d.day(),
                ordinal_suffix(d.day()),
                month,
                d.year(),
                hour,
                minute,
                period
            )
        }
        None => raw.to_owned(),
    }
}

/// Privacy-truncated postal display: state code and ZIP3 joined as strings.
pub fn compose_zip(state_c: &str, zip3: &str) -> String {
    format!("{state_c}{zip3}")
}
