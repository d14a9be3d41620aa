//! Data models for ledger records and pipeline configuration.

pub mod config;
pub mod record;
