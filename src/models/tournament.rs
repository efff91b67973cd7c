use serde_json::{json, Value};

use super::{field, flag};
use crate::leaguepedia::Row;
use crate::normalization::ids;
use crate::store::StoreKey;

/// One tournament split within a league. Source: `Tournaments` joined with
/// `Leagues` for the short form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    pub league_id: String,
    pub tournament_id: String,
    pub start_date: String,
    pub end_date: String,
    pub is_official: bool,
    pub is_playoffs: bool,
    pub is_qualifier: bool,
}

impl Tournament {
    pub fn from_row(row: &Row) -> Self {
        Self {
            league_id: ids::league_id(field(row, "League"), field(row, "League Short")),
            tournament_id: ids::derive_id(field(row, "Name")),
            start_date: field(row, "DateStart").to_string(),
            end_date: field(row, "Date").to_string(),
            is_official: flag(field(row, "IsOfficial")),
            is_playoffs: flag(field(row, "IsPlayoffs")),
            is_qualifier: flag(field(row, "IsQualifier")),
        }
    }

    pub fn key(&self) -> StoreKey {
        StoreKey::from_parts(vec![
            ("leagueId", self.league_id.clone()),
            ("tournamentId", self.tournament_id.clone()),
        ])
    }

    pub fn item(&self) -> Value {
        json!({
            "leagueId": self.league_id,
            "tournamentId": self.tournament_id,
            "startDate": self.start_date,
            "endDate": self.end_date,
            "isOfficial": self.is_official,
            "isPlayoffs": self.is_playoffs,
            "isQualifier": self.is_qualifier,
        })
    }
}
