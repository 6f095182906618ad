// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod aggregate;
pub mod config;
pub mod ingest;
pub mod minutes;
pub mod model;
pub mod scaling;
pub mod store;
