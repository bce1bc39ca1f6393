pub mod backend;
pub mod fixtures;
pub mod queries;
pub mod schema;
pub mod stats_impl;

pub use backend::DuckDbBackend;

/// Re-export the `duckdb` crate so consumers (especially tests) can use
/// `repairdesk_duckdb::duckdb::params!` without an extra dependency.
pub use duckdb;
