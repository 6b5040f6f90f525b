//! Result export.

/// CSV writers for the record and summary tables.
pub mod export;
