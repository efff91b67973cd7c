use anyhow::Result;
use tracing::{info, warn};

use super::{upsert_entity, SyncContext, SyncStats};
use crate::leaguepedia::CargoQuery;
use crate::models::Team;
use crate::store::EntityKind;

pub async fn sync_teams(ctx: &SyncContext) -> Result<()> {
    info!("loading teams");
    // Disbanded teams never change again; skip them at the source.
    let rows = ctx
        .source
        .query(
            &CargoQuery::new("Teams", "Name, Short, Location, Region, IsDisbanded")
                .filter("IsDisbanded=0"),
        )
        .await?;

    let mut stats = SyncStats::default();
    for row in &rows {
        let team = Team::from_row(row);
        stats.considered += 1;
        match upsert_entity(ctx.store.as_ref(), EntityKind::Team, &team.key(), team.item()).await {
            Ok(true) => stats.written += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(team = %team.team_id, error = %err, "store write failed; record skipped")
            }
        }
    }
    info!(
        considered = stats.considered,
        updated = stats.written,
        "team sync complete"
    );
    Ok(())
}
