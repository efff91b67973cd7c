use serde_json::{json, Value};

use super::{field, int_or_sentinel, optional};
use crate::leaguepedia::Row;
use crate::normalization::{ids, TeamCodeResolver};
use crate::store::StoreKey;
use crate::util::datetime::epoch_millis_utc;

/// One scheduled match. Source: `MatchSchedule` joined with `Tournaments`
/// (for the tournament name) and `MatchScheduleGame` (for the VOD link of
/// game one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub match_id: String,
    pub tournament_id: String,
    pub blue_team_id: String,
    pub red_team_id: String,
    /// Resolved code of the winning side, absent while undecided (or when
    /// the source carries an unexpected indicator).
    pub winner: Option<String>,
    pub best_of: i64,
    /// Epoch milliseconds, or `-1` when the source timestamp is missing or
    /// unparseable.
    pub start_time: i64,
    pub patch: String,
    pub vod: Option<String>,
    pub highlight: Option<String>,
}

impl Match {
    pub async fn from_row(row: &Row, resolver: &TeamCodeResolver) -> Self {
        let blue_team_id = resolver.resolve(field(row, "Team1")).await;
        let red_team_id = resolver.resolve(field(row, "Team2")).await;
        let winner = match field(row, "Winner") {
            "1" => Some(blue_team_id.clone()),
            "2" => Some(red_team_id.clone()),
            _ => None,
        };
        Self {
            match_id: ids::derive_id(field(row, "MatchId")),
            tournament_id: ids::derive_id(field(row, "Name")),
            blue_team_id,
            red_team_id,
            winner,
            best_of: int_or_sentinel(field(row, "BestOf")),
            start_time: epoch_millis_utc(field(row, "DateTime UTC")),
            patch: field(row, "Patch").to_string(),
            vod: optional(field(row, "VodGameStart")),
            highlight: optional(field(row, "VodHighlights")),
        }
    }

    pub fn key(&self) -> StoreKey {
        StoreKey::from_parts(vec![
            ("tournamentId", self.tournament_id.clone()),
            ("matchId", self.match_id.clone()),
        ])
    }

    pub fn item(&self) -> Value {
        json!({
            "matchId": self.match_id,
            "tournamentId": self.tournament_id,
            "blueTeamId": self.blue_team_id,
            "redTeamId": self.red_team_id,
            "winner": self.winner,
            "bestOf": self.best_of,
            "startTime": self.start_time,
            "patch": self.patch,
            "vod": self.vod,
            "highlight": self.highlight,
        })
    }
}
