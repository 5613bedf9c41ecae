//! Study configuration
//!
//! The whole configuration surface is plain parameters; there is no file or
//! wire format of its own, though the serde derives let an embedder persist
//! scenarios if it wants to.

use crate::error::ConfigError;
use crate::schema::{Schema, SchemaNode};
use serde::{Deserialize, Serialize};

/// Parameters of one readiness study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Failure rate λ of every unit (failures per time unit).
    pub failure_rate: f64,
    /// Repair rate μ of every unit (repairs per time unit).
    pub repair_rate: f64,
    /// Number of units in each replication's stack.
    pub unit_count: usize,
    /// Series/parallel structure over the unit indices.
    pub schema: Vec<SchemaNode>,
    /// Capacity of the shared repair-worker pool.
    pub workers: usize,
    /// Number of independent replications to average over.
    pub replications: usize,
    /// Length of each replication in whole model time units.
    pub horizon: u64,
    /// Base seed; every replication and unit derives its own substream.
    pub seed: u64,
    /// Emit per-event lifecycle logging. Consumed by binaries/examples when
    /// choosing the subscriber level; the library always emits, filtered or
    /// not.
    pub debug: bool,
}

impl Default for StudyConfig {
    /// Four units: two in series around a redundant pair, two repair
    /// workers, a fast-repair regime (μ = 4λ).
    fn default() -> Self {
        Self {
            failure_rate: 1.0,
            repair_rate: 4.0,
            unit_count: 4,
            schema: vec![
                SchemaNode::Unit(0),
                SchemaNode::Group(vec![1, 2]),
                SchemaNode::Unit(3),
            ],
            workers: 2,
            replications: 10,
            horizon: 1_000,
            seed: 0x5EED_AB1E,
            debug: false,
        }
    }
}

impl StudyConfig {
    /// Validates every parameter, including the schema's structural
    /// consistency with `unit_count`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; the study must not start in that case.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_rate <= 0.0 {
            return Err(ConfigError::NonPositiveRate {
                name: "failure rate",
                value: self.failure_rate,
            });
        }
        if self.repair_rate <= 0.0 {
            return Err(ConfigError::NonPositiveRate {
                name: "repair rate",
                value: self.repair_rate,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.replications == 0 {
            return Err(ConfigError::NoReplications);
        }
        if self.horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        self.build_schema()?;
        Ok(())
    }

    /// Builds the validated [`Schema`] this configuration describes.
    pub fn build_schema(&self) -> Result<Schema, ConfigError> {
        Ok(Schema::new(self.schema.clone(), self.unit_count)?)
    }
}
