//! Stable identifier derivation for wiki display strings.
//!
//! The wiki's free-text names are the only identity the source exposes, so
//! every entity id is a deterministic function of them, with small static
//! override tables for the handful of names the mechanical rules get wrong.

pub mod ids;
pub mod teams;

pub use teams::TeamCodeResolver;
