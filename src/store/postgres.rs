use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use super::{EntityKind, Store, StoreKey};

/// Postgres-backed store: one `(pk, doc, updated_at)` table per entity
/// kind, upserted by primary key.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;
        info!("connected to store (max_conns={max_connections})");
        Self::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn ensure_schema(pool: &PgPool) -> Result<()> {
        for kind in EntityKind::ALL {
            let stmt = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    pk TEXT PRIMARY KEY,
                    doc JSONB NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
                 )",
                kind.table()
            );
            sqlx::raw_sql(&stmt).execute(pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get(&self, kind: EntityKind, key: &StoreKey) -> Result<Option<Value>> {
        let stmt = format!("SELECT doc FROM {} WHERE pk = $1", kind.table());
        let doc: Option<Value> = sqlx::query_scalar(&stmt)
            .bind(key.primary())
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn put(&self, kind: EntityKind, key: &StoreKey, doc: &Value) -> Result<()> {
        let stmt = format!(
            "INSERT INTO {} (pk, doc) VALUES ($1, $2)
             ON CONFLICT (pk) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()",
            kind.table()
        );
        sqlx::query(&stmt)
            .bind(key.primary())
            .bind(doc)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
