//! Team display-name to short-code resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::leaguepedia::{CargoQuery, CargoSource, SourceError};

/// Teams whose wiki `Short` field does not match the code actually used in
/// competition. Checked before the cache; these always win.
const TEAM_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Rogue (European Team)", "RGE"),
    ("Evil Geniuses.NA", "EG"),
    ("PEACE (Oceanic Team)", "PCE"),
    ("RED Kalunga", "RED"),
    ("Team Infernal Drake", "TID"),
    ("DAMWON Gaming", "DK"),
    ("Istanbul Wildcats", "IW"),
    ("Afreeca Freecs", "KDF"),
    ("eStar (Chinese Team)", "UP"),
    ("Vorax Academy", "LBR.A"),
    ("Mousesports", "MOUZ"),
];

/// Short codes historically shared by two distinct teams. Both the code and
/// the exact display name must match before the replacement applies.
const TEAM_CODE_OVERRIDES: &[(&str, &str, &str)] = &[
    ("MAD", "Mad Revolution Gaming", "MAD_LAT"),
    ("INF", "Team Infernal Drake", "TID"),
    ("SN", "Supernova", "SNV"),
    ("RA", "Redemption Arc", "RAC"),
    ("V5", "Vortex Five", "VF"),
];

/// The wiki stores this name with mangled encoding; repair it so the stored
/// record carries the usable form.
const GARBLED_ISTANBUL: (&str, &str, &str) = ("IW", "Ä°stanbul Wildcats", "Istanbul Wildcats");

/// Disambiguate a team's short code against the collision table and repair
/// known garbled names. Returns `(team_id, canonical_name)`.
pub fn disambiguate_team(short: &str, name: &str) -> (String, String) {
    for (code, team_name, replacement) in TEAM_CODE_OVERRIDES {
        if short == *code && name == *team_name {
            return ((*replacement).to_string(), name.to_string());
        }
    }
    let (code, garbled, repaired) = GARBLED_ISTANBUL;
    if short == code && name == garbled {
        return (code.to_string(), repaired.to_string());
    }
    (short.to_string(), name.to_string())
}

/// Resolves team display names to short codes.
///
/// The name -> code cache is populated by one bulk `Teams` query on first
/// use; the `OnceCell` guarantees a single populate even when several
/// workers hit an empty cache at once, and the map is read-only afterwards.
/// A miss degrades to returning the input name so a bad team name never
/// sinks a whole record.
pub struct TeamCodeResolver {
    source: Arc<dyn CargoSource>,
    cache: OnceCell<HashMap<String, String>>,
}

impl TeamCodeResolver {
    pub fn new(source: Arc<dyn CargoSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    pub async fn resolve(&self, team_name: &str) -> String {
        for (name, code) in TEAM_NAME_OVERRIDES {
            if team_name == *name {
                return (*code).to_string();
            }
        }
        let cache = match self.cache.get_or_try_init(|| self.populate()).await {
            Ok(cache) => cache,
            Err(err) => {
                // Populate failure leaves the cell empty; the next call
                // retries. Meanwhile fall back to the raw name.
                warn!(error = %err, team = team_name, "team code cache load failed");
                return team_name.to_string();
            }
        };
        match cache.get(team_name) {
            Some(code) => code.clone(),
            None => {
                debug!("could not find short for {team_name}");
                team_name.to_string()
            }
        }
    }

    async fn populate(&self) -> Result<HashMap<String, String>, SourceError> {
        debug!("loading team codes into cache");
        let rows = self
            .source
            .query(&CargoQuery::new("Teams", "Name, Short"))
            .await?;
        let mut map = HashMap::with_capacity(rows.len());
        for row in rows {
            let name = row.get("Name").cloned().unwrap_or_default();
            let short = row.get("Short").cloned().unwrap_or_default();
            if !name.is_empty() {
                map.insert(name, short);
            }
        }
        debug!("added {} team codes to the cache", map.len());
        Ok(map)
    }
}
