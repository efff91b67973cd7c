//! Normalized entities and their row transformers.
//!
//! Each transformer maps one raw source row to one immutable entity. The
//! entity exposes its composite natural key (`key()`) and its stored
//! document form (`item()`); both are deterministic functions of the row,
//! so re-deriving an unchanged row always lands on the same key and an
//! identical document.

mod league;
mod matches;
mod player;
mod team;
mod tournament;

pub use league::League;
pub use matches::Match;
pub use player::Player;
pub use team::Team;
pub use tournament::Tournament;

use crate::leaguepedia::Row;

/// Look up a row field, treating absent as empty.
pub(crate) fn field<'a>(row: &'a Row, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

/// Parse an integer field with the `-1` sentinel for empty or malformed
/// values.
pub(crate) fn int_or_sentinel(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(-1)
}

/// Source boolean contract: flags arrive as the string `"1"` for true.
pub(crate) fn flag(raw: &str) -> bool {
    raw == "1"
}

/// Optional text field: empty string becomes absent.
pub(crate) fn optional(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
