//! Session Module
//!
//! Consumer-facing request lifecycle: a [`Resource`] exposes `data`,
//! `loading` and `error` for one key and guarantees that only the most
//! recently started load can change them.

mod controller;
mod state;

pub use controller::Resource;
pub use state::{LoadStatus, ResourceState};
