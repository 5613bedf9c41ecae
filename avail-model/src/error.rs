//! Error types for the availability model

use thiserror::Error;

/// Structural problems in a reliability schema, caught at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema references {found} unit indices but the stack has {expected} units")]
    UnitCountMismatch { expected: usize, found: usize },

    #[error("schema references unit {index} but the stack has only {unit_count} units")]
    IndexOutOfRange { index: usize, unit_count: usize },

    #[error("parallel group at schema position {position} is empty")]
    EmptyGroup { position: usize },
}

/// Repair pool contract violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("repair grant {grant_id} is not outstanding; a worker was released twice or never acquired")]
    GrantNotHeld { grant_id: u64 },
}

/// Configuration errors. All of these abort a study before any replication
/// runs; there is no partial-results mode.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("{name} must be positive, got {value}")]
    NonPositiveRate { name: &'static str, value: f64 },

    #[error("repair pool capacity must be at least 1")]
    NoWorkers,

    #[error("at least one replication is required")]
    NoReplications,

    #[error("simulation horizon must be at least one time unit")]
    ZeroHorizon,
}
