use anyhow::Result;
use tracing::{info, warn};

use super::{upsert_entity, SyncContext, SyncStats};
use crate::leaguepedia::CargoQuery;
use crate::models::{field, League};
use crate::store::EntityKind;

/// Sync every league and return the display names, which feed the
/// per-league tournament queries.
pub async fn sync_leagues(ctx: &SyncContext) -> Result<Vec<String>> {
    info!("loading leagues");
    let rows = ctx
        .source
        .query(&CargoQuery::new(
            "Leagues",
            "League, League_Short, Region, Level, IsOfficial",
        ))
        .await?;

    let mut stats = SyncStats::default();
    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        names.push(field(row, "League").to_string());
        let league = League::from_row(row);
        stats.considered += 1;
        match upsert_entity(ctx.store.as_ref(), EntityKind::League, &league.key(), league.item())
            .await
        {
            Ok(true) => stats.written += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(league = %league.league_id, error = %err, "store write failed; record skipped")
            }
        }
    }
    info!(
        considered = stats.considered,
        updated = stats.written,
        "league sync complete"
    );
    Ok(names)
}
