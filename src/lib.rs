//! fanhub - data layer for the fan community site
//!
//! Resolves logical keys to JSON documents through a pluggable data source
//! with a TTL cache, retries failed fetches with exponential backoff, and
//! exposes per-consumer request sessions that never apply a superseded
//! response.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod session;
pub mod source;

pub use config::Config;
pub use error::{DataError, Result};
pub use fetch::Fetcher;
pub use session::{LoadStatus, Resource, ResourceState};
pub use source::{build_data_source, DataSource};
