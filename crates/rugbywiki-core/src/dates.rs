// Calendar-date helpers: query formatting, display formatting, and the
// parsing rules for the backend's `datePlayed` values.
//
// Every comparison in the application works on local calendar dates. Dates
// sent to the backend are formatted from `NaiveDate` directly so they are
// never shifted through UTC.

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// Format used for date query parameters (`2025-03-01`).
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used when a fixture date is written back out as JSON.
const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Zero-padded `YYYY-MM-DD` rendering of a calendar date.
pub fn query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

/// Long display form, e.g. `Saturday 01 March 2025`.
pub fn pretty_date(date_time: NaiveDateTime) -> String {
    date_time.format("%A %d %B %Y").to_string()
}

/// Parse a `datePlayed` value.
///
/// Accepts a bare date (`2025-03-01`, read as midnight), a naive date-time
/// with `T` or space separator and optional fractional seconds, or an
/// RFC 3339 timestamp with an offset (converted to local time).
pub fn parse_date_played(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, QUERY_DATE_FORMAT) {
        return Some(date.and_time(NaiveTime::MIN));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// First and last day of a calendar year.
pub fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((start, end))
}

/// Default range of the schedule view: the first day of the current month
/// through the last day of the following month.
pub fn default_schedule_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(2))
        .and_then(|d| d.pred_opt())
        .unwrap_or(today);
    (first, last)
}

/// Selectable years around `current`, ascending.
pub fn year_options(current: i32, back: u32, forward: u32) -> Vec<i32> {
    let from = current.saturating_sub(back as i32);
    let to = current.saturating_add(forward as i32);
    (from..=to).collect()
}

/// Serde adapter for `datePlayed` fields.
pub mod date_played_format {
    use chrono::NaiveDateTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(super::WIRE_DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_played(&raw)
            .ok_or_else(|| D::Error::custom(format!("unrecognised datePlayed value `{raw}`")))
    }
}
