//! # F1 Standings
//!
//! Formula 1 championship standings aggregator with progressive standings
//! and team attribution.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (race results, standings, season selection)
//! - **calculate**: Standings aggregation and driver-to-team attribution
//! - **fetch**: Paginated results provider client
//! - **ingest**: Season import from the provider into the local store
//! - **selection**: Working season resolution
//! - **storage**: Filesystem season store (JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod ingest;
pub mod models;
pub mod selection;
pub mod storage;

pub use models::*;
