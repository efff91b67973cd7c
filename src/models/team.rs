use serde_json::{json, Value};

use super::{field, flag};
use crate::leaguepedia::Row;
use crate::normalization::teams::disambiguate_team;
use crate::store::StoreKey;

/// One team. Source: the `Teams` cargo table. The short code doubles as
/// the identity, so codes shared by two historical teams go through the
/// disambiguation table first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub team_id: String,
    pub name: String,
    pub location: String,
    pub region: String,
    pub is_disbanded: bool,
}

impl Team {
    pub fn from_row(row: &Row) -> Self {
        let (team_id, name) = disambiguate_team(field(row, "Short"), field(row, "Name"));
        Self {
            team_id,
            name,
            location: field(row, "Location").to_string(),
            region: field(row, "Region").to_string(),
            is_disbanded: flag(field(row, "IsDisbanded")),
        }
    }

    pub fn key(&self) -> StoreKey {
        StoreKey::from_parts(vec![("teamId", self.team_id.clone())])
    }

    pub fn item(&self) -> Value {
        json!({
            "teamId": self.team_id,
            "name": self.name,
            "location": self.location,
            "region": self.region,
            "isDisbanded": self.is_disbanded,
        })
    }
}
