//! Contract-conformance checker for `GET /dashboard/orders`.
//!
//! Fetches the paginated order list from a running server and verifies a
//! fixed rule set (field presence, types, enums, timestamps, URLs, sort
//! order, cross-field consistency, payload size) selected by a named
//! contract preset.

pub mod config;
pub mod contract;
pub mod engine;
pub mod fetch;
pub mod report;
pub mod scenario;
