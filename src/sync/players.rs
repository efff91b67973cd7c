use anyhow::Result;
use tracing::{info, warn};

use super::{upsert_entity, SyncContext, SyncStats};
use crate::leaguepedia::CargoQuery;
use crate::models::{field, Player};
use crate::store::EntityKind;

pub async fn sync_players(ctx: &SyncContext) -> Result<()> {
    info!("loading players");
    let rows = ctx
        .source
        .query(&CargoQuery::new(
            "Players",
            "ID, Country, Age, Team, Residency, Role, IsSubstitute",
        ))
        .await?;

    let mut stats = SyncStats::default();
    for row in rows.iter().filter(|row| !field(row, "ID").is_empty()) {
        let player = Player::from_row(row, &ctx.resolver).await;
        stats.considered += 1;
        match upsert_entity(ctx.store.as_ref(), EntityKind::Player, &player.key(), player.item())
            .await
        {
            Ok(true) => stats.written += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(player = %player.id, error = %err, "store write failed; record skipped")
            }
        }
    }
    info!(
        considered = stats.considered,
        updated = stats.written,
        "player sync complete"
    );
    Ok(())
}
