use serde_json::{json, Value};

use super::field;
use crate::leaguepedia::Row;
use crate::normalization::ids;
use crate::store::StoreKey;

/// A competitive league (e.g. LCK). Source: the `Leagues` cargo table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub league_id: String,
    pub league_name: String,
    pub region: String,
    pub level: String,
    pub is_official: bool,
}

impl League {
    pub fn from_row(row: &Row) -> Self {
        let league_name = field(row, "League").to_string();
        Self {
            league_id: ids::league_id(&league_name, field(row, "League Short")),
            region: field(row, "Region").to_string(),
            level: field(row, "Level").to_string(),
            // Unlike the other tables, Leagues spells its booleans out.
            is_official: field(row, "IsOfficial").eq_ignore_ascii_case("yes"),
            league_name,
        }
    }

    pub fn key(&self) -> StoreKey {
        StoreKey::from_parts(vec![("leagueId", self.league_id.clone())])
    }

    pub fn item(&self) -> Value {
        json!({
            "leagueId": self.league_id,
            "leagueName": self.league_name,
            "region": self.region,
            "level": self.level,
            "isOfficial": self.is_official,
        })
    }
}
