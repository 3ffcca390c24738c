//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to resolve config, storage and log locations.

mod load;
mod schema;

pub use load::{default_log_dir, default_storage_path};
pub use schema::*;
