//! Esports data synchronization pipeline.
//!
//! Pulls leagues, tournaments, matches, players and teams from the
//! Leaguepedia Cargo query API and upserts normalized documents into a
//! Postgres-backed key-value store. Records are only written when the
//! normalized value differs from what the store already holds, so repeated
//! runs over unchanged source data are free.

pub mod config;
pub mod leaguepedia;
pub mod models;
pub mod normalization;
pub mod store;
pub mod sync;

pub mod util {
    pub mod datetime;
    pub mod env;
}
