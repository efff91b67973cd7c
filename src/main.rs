use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use esports_sync::config::SyncConfig;
use esports_sync::leaguepedia::{CargoSource, LeaguepediaClient, SourceConfig};
use esports_sync::store::{MemoryStore, PgStore, Store};
use esports_sync::sync::{
    sync_leagues, sync_matches, sync_players, sync_teams, sync_tournaments, SyncContext,
};
use esports_sync::util::env;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "essync", version, about = "Esports wiki to store sync")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Sync the Leagues table
    Leagues,
    /// Sync tournaments for every league (syncs leagues first)
    Tourneys,
    /// Sync matches for every current tournament (syncs leagues and
    /// tournaments first)
    Matches,
    /// Sync the Players table
    Players,
    /// Sync the Teams table (active teams only)
    Teams,
}

#[tokio::main]
async fn main() -> Result<()> {
    env::init_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let client = LeaguepediaClient::new(SourceConfig::from_env())?;
    if let (Some(username), Some(password)) = (
        env::env_opt("LEAGUEPEDIA_USERNAME"),
        env::env_opt("LEAGUEPEDIA_PASSWORD"),
    ) {
        client
            .login(&username, &password)
            .await
            .context("leaguepedia login failed")?;
        info!("logged in to leaguepedia as {username}");
    }
    let source: Arc<dyn CargoSource> = Arc::new(client);

    let store: Arc<dyn Store> = if env::env_flag("DRY_RUN", false) {
        warn!("DRY_RUN set; writes go to an in-memory store and are discarded");
        Arc::new(MemoryStore::new())
    } else {
        let url = env::db_url()?;
        let max_conns: u32 = env::env_parse("DB_MAX_CONNS", 5);
        Arc::new(
            PgStore::connect(&url, max_conns)
                .await
                .context("store connect failed")?,
        )
    };

    let ctx = SyncContext::new(source, store, SyncConfig::from_env());
    match command {
        Commands::Leagues => {
            sync_leagues(&ctx).await?;
        }
        Commands::Tourneys => {
            sync_tournaments(&ctx, None).await?;
        }
        Commands::Matches => sync_matches(&ctx, None).await?,
        Commands::Players => sync_players(&ctx).await?,
        Commands::Teams => sync_teams(&ctx).await?,
    }
    Ok(())
}
