use anyhow::Result;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use super::filters::match_is_recent;
use super::{sync_tournaments, upsert_entity, SyncContext, SyncStats};
use crate::leaguepedia::{quote_literal, CargoQuery};
use crate::models::Match;
use crate::store::EntityKind;

/// Sync matches tournament by tournament. With no tournament list given,
/// chains through the tournament sync (which in turn chains leagues).
///
/// Tournaments fan out through a bounded pool; rows within one tournament
/// arrive pre-sorted by start time and are written in that order. No
/// ordering is guaranteed across tournaments when the pool is wider than
/// one, which is fine because match keys are partitioned by tournament.
pub async fn sync_matches(ctx: &SyncContext, tourneys: Option<Vec<String>>) -> Result<()> {
    let tourneys = match tourneys {
        Some(tourneys) => tourneys,
        None => sync_tournaments(ctx, None).await?,
    };

    let total = tourneys.len();
    let semaphore = Semaphore::new(ctx.cfg.worker_concurrency);
    let mut tasks = FuturesUnordered::new();
    for (i, name) in tourneys.iter().enumerate() {
        let semaphore = &semaphore;
        tasks.push(async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return SyncStats::default();
            };
            if ctx.deadline_exceeded() {
                warn!(tournament = %name, "deadline reached; skipping tournament");
                return SyncStats::default();
            }
            let stats = sync_tournament_matches(ctx, name, i, total).await;
            ctx.pace().await;
            stats
        });
    }

    let mut stats = SyncStats::default();
    while let Some(unit) = tasks.next().await {
        stats.merge(unit);
    }
    info!(
        considered = stats.considered,
        updated = stats.written,
        "match sync complete"
    );
    Ok(())
}

async fn sync_tournament_matches(
    ctx: &SyncContext,
    name: &str,
    index: usize,
    total: usize,
) -> SyncStats {
    info!("({}/{}) loading matches for {}", index + 1, total, name);
    let query = CargoQuery::new(
        "MatchSchedule=MS,Tournaments=T,MatchScheduleGame=MSG",
        "MS.MatchId,MS.OverviewPage,T.Name,MS.Team1,MS.Team2,MS.Patch,\
         MS.DateTime_UTC,MS.Winner,MS.BestOf,MSG.VodGameStart,MS.VodHighlights",
    )
    .join_on("MS.OverviewPage=T.OverviewPage,MS.MatchId=MSG.MatchId")
    .filter(format!(
        "T.Name='{}' AND MSG.N_GameInMatch=1",
        quote_literal(name)
    ))
    .order_by("MS.DateTime_UTC");

    let mut stats = SyncStats::default();
    let rows = match ctx.source.query(&query).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(tournament = %name, error = %err, "hit error querying tournament; skipping");
            return stats;
        }
    };

    let now = Utc::now();
    for row in rows.iter().filter(|row| match_is_recent(row, now, &ctx.cfg)) {
        let record = Match::from_row(row, &ctx.resolver).await;
        stats.considered += 1;
        match upsert_entity(
            ctx.store.as_ref(),
            EntityKind::Match,
            &record.key(),
            record.item(),
        )
        .await
        {
            Ok(true) => stats.written += 1,
            Ok(false) => {}
            Err(err) => {
                warn!(
                    match_id = %record.match_id,
                    error = %err,
                    "store write failed; record skipped"
                );
            }
        }
    }
    info!(
        tournament = %name,
        considered = stats.considered,
        updated = stats.written,
        "tournament matches synced"
    );
    stats
}
