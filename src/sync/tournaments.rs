use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::filters::tournament_is_recent;
use super::{sync_leagues, upsert_entity, SyncContext, SyncStats};
use crate::leaguepedia::{quote_literal, CargoQuery};
use crate::models::{field, Tournament};
use crate::store::EntityKind;

/// Sync tournaments league by league and return the names of the
/// tournaments that passed the filters, which feed the per-tournament
/// match queries. With no league list given, syncs leagues first.
pub async fn sync_tournaments(
    ctx: &SyncContext,
    leagues: Option<Vec<String>>,
) -> Result<Vec<String>> {
    let leagues = match leagues {
        Some(leagues) => leagues,
        None => sync_leagues(ctx).await?,
    };

    let total = leagues.len();
    let mut stats = SyncStats::default();
    let mut names = Vec::new();
    for (i, league) in leagues.iter().enumerate() {
        if ctx.deadline_exceeded() {
            warn!(remaining = total - i, "deadline reached; stopping tournament sync");
            break;
        }
        info!("({}/{}) loading tournaments for {}", i + 1, total, league);
        let query = CargoQuery::new(
            "Tournaments=T,Leagues=L",
            "T.Name, T.OverviewPage, T.DateStart, T.IsQualifier, T.IsPlayoffs, \
             T.IsOfficial, T.Year, L.League_Short, T.Date, L.League",
        )
        .join_on("L.League=T.League")
        .filter(format!("L.League='{}'", quote_literal(league)));

        // A failed league is skipped, not fatal; the rest of the run
        // continues.
        let rows = match ctx.source.query(&query).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(league = %league, error = %err, "hit error querying league; skipping");
                continue;
            }
        };
        ctx.pace().await;

        let now = Utc::now();
        for row in rows.iter().filter(|row| !field(row, "Name").is_empty()) {
            if !tournament_is_recent(row, now, ctx.cfg.historical_load) {
                continue;
            }
            let tourney = Tournament::from_row(row);
            stats.considered += 1;
            match upsert_entity(
                ctx.store.as_ref(),
                EntityKind::Tournament,
                &tourney.key(),
                tourney.item(),
            )
            .await
            {
                Ok(true) => stats.written += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(
                        tournament = %tourney.tournament_id,
                        error = %err,
                        "store write failed; record skipped"
                    );
                }
            }
            names.push(field(row, "Name").to_string());
        }
    }
    info!(
        considered = stats.considered,
        updated = stats.written,
        "tournament sync complete"
    );
    Ok(names)
}
