//! Recency predicates bounding which records are worth re-synchronizing.

use chrono::{DateTime, Datelike, Utc};

use crate::config::SyncConfig;
use crate::leaguepedia::Row;
use crate::models::field;
use crate::util::datetime::{parse_wiki_date, parse_wiki_datetime};

/// Keep only tournaments that start in the current calendar year.
/// Missing or malformed `DateStart` excludes the row. Historical-load mode
/// keeps everything.
pub fn tournament_is_recent(row: &Row, now: DateTime<Utc>, historical_load: bool) -> bool {
    if historical_load {
        return true;
    }
    match parse_wiki_date(field(row, "DateStart")) {
        Some(date) => date.year() == now.year(),
        None => false,
    }
}

/// Keep only matches inside the configured window around now. Old matches
/// stop changing once VODs and score corrections have landed; far-future
/// matches are not worth writing yet. Missing or malformed `DateTime UTC`
/// excludes the row. Historical-load mode keeps everything.
pub fn match_is_recent(row: &Row, now: DateTime<Utc>, cfg: &SyncConfig) -> bool {
    if cfg.historical_load {
        return true;
    }
    match parse_wiki_datetime(field(row, "DateTime UTC")) {
        Some(dt) => {
            let dt = dt.and_utc();
            dt > now - cfg.match_lookback && dt < now + cfg.match_lookahead
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use indexmap::IndexMap;

    fn row(key: &str, value: &str) -> Row {
        IndexMap::from([(key.to_string(), value.to_string())])
    }

    fn mid_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn tournament_boundary_is_the_calendar_year() {
        let now = mid_2024();
        assert!(tournament_is_recent(&row("DateStart", "2024-01-01"), now, false));
        assert!(!tournament_is_recent(&row("DateStart", "2023-12-31"), now, false));
        assert!(!tournament_is_recent(&row("DateStart", ""), now, false));
    }

    #[test]
    fn historical_load_keeps_everything() {
        let now = mid_2024();
        assert!(tournament_is_recent(&row("DateStart", "2023-12-31"), now, true));
        assert!(match_is_recent(
            &row("DateTime UTC", "1999-01-01 00:00:00"),
            now,
            &SyncConfig {
                historical_load: true,
                ..SyncConfig::default()
            }
        ));
    }

    #[test]
    fn match_window_spans_lookback_and_lookahead() {
        let now = mid_2024();
        let cfg = SyncConfig::default();
        assert!(match_is_recent(&row("DateTime UTC", "2024-06-12 17:00:00"), now, &cfg));
        assert!(match_is_recent(&row("DateTime UTC", "2024-06-25 17:00:00"), now, &cfg));
        // Just over a week old.
        assert!(!match_is_recent(&row("DateTime UTC", "2024-06-07 11:00:00"), now, &cfg));
        // More than two weeks out.
        assert!(!match_is_recent(&row("DateTime UTC", "2024-07-01 17:00:00"), now, &cfg));
        assert!(!match_is_recent(&row("DateTime UTC", "not-a-date"), now, &cfg));
    }
}
