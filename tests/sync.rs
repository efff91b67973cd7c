//! End-to-end sync tests against a canned source and an in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Duration, Utc};
use esports_sync::config::SyncConfig;
use esports_sync::leaguepedia::{CargoQuery, CargoSource, Row, SourceError};
use esports_sync::models::{Match, Player};
use esports_sync::normalization::TeamCodeResolver;
use esports_sync::store::{EntityKind, MemoryStore, Store, StoreKey};
use esports_sync::sync::{
    sync_leagues, sync_matches, sync_players, sync_teams, sync_tournaments, upsert_entity,
    SyncContext,
};
use serde_json::Value;

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Serves a fixed wiki snapshot: one league, one current tournament with
/// two matches, a team table and a player table. Timestamps are computed
/// once at construction so repeated queries return byte-identical rows.
struct FakeSource {
    queries: AtomicUsize,
    upcoming: String,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            queries: AtomicUsize::new(0),
            upcoming: (Utc::now() + Duration::days(1))
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }

    fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn team_rows() -> Vec<Row> {
        vec![
            row(&[
                ("Name", "Cloud9"),
                ("Short", "C9"),
                ("Location", "United States"),
                ("Region", "North America"),
                ("IsDisbanded", "0"),
            ]),
            row(&[
                ("Name", "Team Liquid"),
                ("Short", "TL"),
                ("Location", "United States"),
                ("Region", "North America"),
                ("IsDisbanded", "0"),
            ]),
            row(&[
                ("Name", "Mad Revolution Gaming"),
                ("Short", "MAD"),
                ("Location", "Mexico"),
                ("Region", "Latin America"),
                ("IsDisbanded", "0"),
            ]),
        ]
    }
}

#[async_trait]
impl CargoSource for FakeSource {
    async fn query(&self, query: &CargoQuery) -> Result<Vec<Row>, SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let year = Utc::now().year();
        if query.tables == "Leagues" {
            return Ok(vec![row(&[
                ("League", "LoL Championship Series"),
                ("League Short", "LCS"),
                ("Region", "North America"),
                ("Level", "Primary"),
                ("IsOfficial", "Yes"),
            ])]);
        }
        if query.tables.starts_with("Tournaments=T") {
            return Ok(vec![
                row(&[
                    ("Name", &format!("LCS {year} Spring")),
                    ("OverviewPage", &format!("LCS/{year} Season/Spring Season")),
                    ("DateStart", &format!("{year}-01-26")),
                    ("IsQualifier", "0"),
                    ("IsPlayoffs", "0"),
                    ("IsOfficial", "1"),
                    ("Year", &year.to_string()),
                    ("League Short", "LCS"),
                    ("Date", &format!("{year}-04-09")),
                    ("League", "LoL Championship Series"),
                ]),
                // Last year's split: recency filter should drop it.
                row(&[
                    ("Name", &format!("LCS {} Spring", year - 1)),
                    ("OverviewPage", ""),
                    ("DateStart", &format!("{}-01-26", year - 1)),
                    ("IsQualifier", "0"),
                    ("IsPlayoffs", "0"),
                    ("IsOfficial", "1"),
                    ("Year", &(year - 1).to_string()),
                    ("League Short", "LCS"),
                    ("Date", &format!("{}-04-09", year - 1)),
                    ("League", "LoL Championship Series"),
                ]),
                // No name: required field filter should drop it.
                row(&[("Name", ""), ("DateStart", &format!("{year}-02-01"))]),
            ]);
        }
        if query.tables.starts_with("MatchSchedule") {
            // Echo the tournament the `where` clause asked for, the way the
            // wiki scopes match rows to one tournament.
            let name = query
                .where_clause
                .as_deref()
                .and_then(|clause| clause.split('\'').nth(1))
                .unwrap_or_default()
                .to_string();
            return Ok(vec![
                row(&[
                    ("MatchId", &format!("{name}_Week 1_1")),
                    ("Name", &name),
                    ("Team1", "Cloud9"),
                    ("Team2", "Team Liquid"),
                    ("Patch", "14.02"),
                    ("DateTime UTC", &self.upcoming),
                    ("Winner", ""),
                    ("BestOf", "3"),
                    ("VodGameStart", ""),
                    ("VodHighlights", ""),
                ]),
                row(&[
                    ("MatchId", &format!("{name}_Week 1_2")),
                    ("Name", &name),
                    ("Team1", "Team Liquid"),
                    ("Team2", "Cloud9"),
                    ("Patch", "14.02"),
                    ("DateTime UTC", "2015-01-01 00:00:00"),
                    ("Winner", "1"),
                    ("BestOf", "3"),
                    ("VodGameStart", ""),
                    ("VodHighlights", ""),
                ]),
            ]);
        }
        if query.tables == "Teams" {
            return Ok(Self::team_rows());
        }
        if query.tables == "Players" {
            return Ok(vec![
                row(&[
                    ("ID", "Blaber"),
                    ("Country", "United States"),
                    ("Age", "24"),
                    ("Team", "Cloud9"),
                    ("Residency", "North America"),
                    ("Role", "Jungle"),
                    ("IsSubstitute", "0"),
                ]),
                row(&[
                    ("ID", "CoreJJ"),
                    ("Country", "South Korea"),
                    ("Age", ""),
                    ("Team", "Team Liquid"),
                    ("Residency", "North America"),
                    ("Role", "Support"),
                    ("IsSubstitute", "1"),
                ]),
            ]);
        }
        Ok(vec![])
    }
}

fn context(store: Arc<MemoryStore>) -> SyncContext {
    SyncContext::new(Arc::new(FakeSource::new()), store, SyncConfig::default())
}

#[tokio::test]
async fn full_pipeline_writes_each_entity_once() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(store.clone());

    sync_matches(&ctx, None).await.unwrap();
    sync_players(&ctx).await.unwrap();
    sync_teams(&ctx).await.unwrap();

    assert_eq!(store.len(EntityKind::League), 1);
    // Only the current-year split survives the filters.
    assert_eq!(store.len(EntityKind::Tournament), 1);
    // The 2015 match is outside the recency window.
    assert_eq!(store.len(EntityKind::Match), 1);
    assert_eq!(store.len(EntityKind::Player), 2);
    assert_eq!(store.len(EntityKind::Team), 3);
}

#[tokio::test]
async fn second_run_over_unchanged_data_writes_nothing() {
    let source = Arc::new(FakeSource::new());
    let store = Arc::new(MemoryStore::new());
    let ctx = SyncContext::new(source.clone(), store.clone(), SyncConfig::default());

    sync_matches(&ctx, None).await.unwrap();
    sync_players(&ctx).await.unwrap();
    sync_teams(&ctx).await.unwrap();
    let first_run = store.put_count();
    assert!(first_run > 0);

    // Fresh context, same data: every get should match and no put happen.
    let ctx = SyncContext::new(source, store.clone(), SyncConfig::default());
    sync_matches(&ctx, None).await.unwrap();
    sync_players(&ctx).await.unwrap();
    sync_teams(&ctx).await.unwrap();
    assert_eq!(store.put_count(), first_run);
}

#[tokio::test]
async fn historical_load_keeps_filtered_tournaments() {
    let store = Arc::new(MemoryStore::new());
    let cfg = SyncConfig {
        historical_load: true,
        ..SyncConfig::default()
    };
    let ctx = SyncContext::new(Arc::new(FakeSource::new()), store.clone(), cfg);

    sync_tournaments(&ctx, None).await.unwrap();
    assert_eq!(store.len(EntityKind::Tournament), 2);
}

#[tokio::test]
async fn changed_value_under_same_key_triggers_one_write() {
    let store = MemoryStore::new();
    let doc_a = serde_json::json!({"leagueId": "LCS", "isPlayoffs": false});
    let doc_b = serde_json::json!({"leagueId": "LCS", "isPlayoffs": true});
    let key = StoreKey::from_parts(vec![
        ("leagueId", "LCS".into()),
        ("tournamentId", "LCS_2024_Spring".into()),
    ]);

    assert!(upsert_entity(&store, EntityKind::Tournament, &key, doc_a.clone())
        .await
        .unwrap());
    assert!(!upsert_entity(&store, EntityKind::Tournament, &key, doc_a)
        .await
        .unwrap());
    assert!(upsert_entity(&store, EntityKind::Tournament, &key, doc_b)
        .await
        .unwrap());
    assert_eq!(store.put_count(), 2);
}

#[tokio::test]
async fn winner_is_resolved_from_the_indicated_side() {
    let resolver = TeamCodeResolver::new(Arc::new(FakeSource::new()));
    let base = vec![
        ("MatchId", "LCS 2024 Spring_Week 1_1"),
        ("Name", "LCS 2024 Spring"),
        ("Team1", "Cloud9"),
        ("Team2", "Team Liquid"),
        ("Patch", "14.02"),
        ("DateTime UTC", "2024-01-27 22:00:00"),
        ("Winner", "1"),
        ("BestOf", "3"),
        ("VodGameStart", "https://example.com/vod"),
        ("VodHighlights", ""),
    ];

    let m = Match::from_row(&row(&base), &resolver).await;
    assert_eq!(m.blue_team_id, "C9");
    assert_eq!(m.red_team_id, "TL");
    assert_eq!(m.winner.as_deref(), Some("C9"));
    assert_eq!(m.key().primary(), "LCS_2024_Spring#LCS_2024_Spring_Week_1_1");
    assert_eq!(m.vod.as_deref(), Some("https://example.com/vod"));
    assert_eq!(m.highlight, None);

    let mut unexpected = base.clone();
    unexpected[6] = ("Winner", "3");
    let m = Match::from_row(&row(&unexpected), &resolver).await;
    assert_eq!(m.winner, None);
}

#[tokio::test]
async fn malformed_fields_become_sentinels() {
    let resolver = TeamCodeResolver::new(Arc::new(FakeSource::new()));
    let m = Match::from_row(
        &row(&[
            ("MatchId", "X_1"),
            ("Name", "X"),
            ("Team1", "Cloud9"),
            ("Team2", "Team Liquid"),
            ("DateTime UTC", "not-a-date"),
            ("Winner", ""),
            ("BestOf", ""),
        ]),
        &resolver,
    )
    .await;
    assert_eq!(m.start_time, -1);
    assert_eq!(m.best_of, -1);

    let p = Player::from_row(
        &row(&[
            ("ID", "CoreJJ"),
            ("Country", "South Korea"),
            ("Age", ""),
            ("Team", "Team Liquid"),
            ("Residency", "North America"),
            ("Role", "Support"),
            ("IsSubstitute", "1"),
        ]),
        &resolver,
    )
    .await;
    assert_eq!(p.age, -1);
    assert!(p.is_substitute);
    assert_eq!(p.key().primary(), "TL#CoreJJ");
}

#[tokio::test]
async fn resolver_populates_once_and_degrades_on_miss() {
    let source = Arc::new(FakeSource::new());
    let resolver = TeamCodeResolver::new(source.clone());

    // Overrides answer without touching the source at all.
    assert_eq!(resolver.resolve("Rogue (European Team)").await, "RGE");
    assert_eq!(source.query_count(), 0);

    assert_eq!(resolver.resolve("Cloud9").await, "C9");
    assert_eq!(resolver.resolve("Team Liquid").await, "TL");
    // Unknown names pass through unchanged instead of failing.
    assert_eq!(resolver.resolve("Garage Esports").await, "Garage Esports");
    assert_eq!(source.query_count(), 1);
}

#[tokio::test]
async fn concurrent_first_use_populates_the_cache_once() {
    let source = Arc::new(FakeSource::new());
    let resolver = Arc::new(TeamCodeResolver::new(source.clone()));

    let lookups: Vec<_> = ["Cloud9", "Team Liquid", "Cloud9", "Team Liquid"]
        .into_iter()
        .map(|name| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve(name).await })
        })
        .collect();
    for task in lookups {
        let code = task.await.unwrap();
        assert!(code == "C9" || code == "TL");
    }
    // Every concurrent first use funnels into one bulk Teams query.
    assert_eq!(source.query_count(), 1);
}

#[tokio::test]
async fn pooled_workers_never_share_a_key_across_tournaments() {
    let store = Arc::new(MemoryStore::new());
    let cfg = SyncConfig {
        worker_concurrency: 4,
        historical_load: true,
        ..SyncConfig::default()
    };
    let ctx = SyncContext::new(Arc::new(FakeSource::new()), store.clone(), cfg);

    let tourneys = vec![
        "LCS 2024 Spring".to_string(),
        "LCK 2024 Spring".to_string(),
        "LEC 2024 Spring".to_string(),
        "LPL 2024 Spring".to_string(),
    ];
    sync_matches(&ctx, Some(tourneys)).await.unwrap();

    // Match keys are prefixed by tournament, so the per-tournament workers
    // each wrote their two matches exactly once with no overwrites.
    assert_eq!(store.len(EntityKind::Match), 8);
    assert_eq!(store.put_count(), 8);
}

#[tokio::test]
async fn league_sync_returns_names_for_chaining() {
    let store = Arc::new(MemoryStore::new());
    let ctx = context(store.clone());
    let names = sync_leagues(&ctx).await.unwrap();
    assert_eq!(names, vec!["LoL Championship Series".to_string()]);
}

/// Delegates to a memory store but fails every put against one primary key.
struct FlakyStore {
    inner: MemoryStore,
    poison_pk: String,
}

#[async_trait]
impl Store for FlakyStore {
    async fn get(&self, kind: EntityKind, key: &StoreKey) -> anyhow::Result<Option<Value>> {
        self.inner.get(kind, key).await
    }

    async fn put(&self, kind: EntityKind, key: &StoreKey, doc: &Value) -> anyhow::Result<()> {
        if key.primary() == self.poison_pk {
            anyhow::bail!("injected write failure");
        }
        self.inner.put(kind, key, doc).await
    }
}

#[tokio::test]
async fn failed_write_skips_the_record_not_the_batch() {
    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        poison_pk: "TL".into(),
    });
    let ctx = SyncContext::new(
        Arc::new(FakeSource::new()),
        store.clone(),
        SyncConfig::default(),
    );

    sync_teams(&ctx).await.unwrap();
    // Team Liquid's write failed; the other two teams still landed.
    assert_eq!(store.inner.len(EntityKind::Team), 2);
    assert!(store
        .inner
        .get(EntityKind::Team, &StoreKey::from_parts(vec![("teamId", "C9".into())]))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn expired_deadline_stops_between_units() {
    let store = Arc::new(MemoryStore::new());
    let cfg = SyncConfig {
        deadline: Some(std::time::Instant::now() - std::time::Duration::from_secs(1)),
        ..SyncConfig::default()
    };
    let ctx = SyncContext::new(Arc::new(FakeSource::new()), store.clone(), cfg);

    sync_tournaments(&ctx, None).await.unwrap();
    // Leagues finished before the deadline check; no tournament unit ran.
    assert_eq!(store.len(EntityKind::League), 1);
    assert_eq!(store.len(EntityKind::Tournament), 0);
}
