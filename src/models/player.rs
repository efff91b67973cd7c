use serde_json::{json, Value};

use super::{field, flag, int_or_sentinel};
use crate::leaguepedia::Row;
use crate::normalization::TeamCodeResolver;
use crate::store::StoreKey;

/// One player on a roster. Source: the `Players` cargo table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub country: String,
    /// `-1` when the wiki has no age on record.
    pub age: i64,
    pub team_id: String,
    pub residency: String,
    pub role: String,
    pub is_substitute: bool,
}

impl Player {
    pub async fn from_row(row: &Row, resolver: &TeamCodeResolver) -> Self {
        Self {
            id: field(row, "ID").to_string(),
            country: field(row, "Country").to_string(),
            age: int_or_sentinel(field(row, "Age")),
            team_id: resolver.resolve(field(row, "Team")).await,
            residency: field(row, "Residency").to_string(),
            role: field(row, "Role").to_string(),
            is_substitute: flag(field(row, "IsSubstitute")),
        }
    }

    pub fn key(&self) -> StoreKey {
        StoreKey::from_parts(vec![
            ("teamId", self.team_id.clone()),
            ("id", self.id.clone()),
        ])
    }

    pub fn item(&self) -> Value {
        json!({
            "id": self.id,
            "country": self.country,
            "age": self.age,
            "teamId": self.team_id,
            "residency": self.residency,
            "role": self.role,
            "isSubstitute": self.is_substitute,
        })
    }
}
