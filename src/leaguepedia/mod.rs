//! Leaguepedia Cargo query client.
//!
//! <https://lol.fandom.com/Help:API_Documentation>

mod client;
mod query;

pub use client::{LeaguepediaClient, SourceConfig, SourceError};
pub use query::{quote_literal, CargoQuery, Row};

use async_trait::async_trait;

/// Paginated Cargo query source. The sync drivers only depend on this
/// trait, so tests can swap the wiki for canned rows.
#[async_trait]
pub trait CargoSource: Send + Sync {
    /// Run a query to completion, following pagination until a short page.
    async fn query(&self, query: &CargoQuery) -> Result<Vec<Row>, SourceError>;
}
