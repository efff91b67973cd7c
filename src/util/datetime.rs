//! Date parsing for the wiki's fixed timestamp formats.

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp format used by `DateTime_UTC` style fields.
pub const WIKI_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Date format used by `DateStart` style fields.
pub const WIKI_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wiki timestamp into epoch milliseconds (UTC).
///
/// Missing or malformed input yields the sentinel `-1` so callers can store
/// the record without special-casing; `-1` is obviously not a valid start
/// time.
pub fn epoch_millis_utc(raw: &str) -> i64 {
    NaiveDateTime::parse_from_str(raw.trim(), WIKI_DATETIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(-1)
}

/// Parse a wiki date, if well-formed.
pub fn parse_wiki_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), WIKI_DATE_FORMAT).ok()
}

/// Parse a wiki timestamp, if well-formed.
pub fn parse_wiki_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), WIKI_DATETIME_FORMAT).ok()
}
