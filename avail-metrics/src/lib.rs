//! Cross-replication metrics accumulation.
//!
//! Each replication of an availability study produces one 0/1 sample per
//! integer time tick. This crate owns the store those samples accumulate in
//! and the reduction to the time-indexed average curve the study reports.

pub mod store;

pub use store::{MetricsStore, ReplicationId, Sample};
