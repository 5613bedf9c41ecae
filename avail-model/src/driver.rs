//! Study driver: replications, reduction, and the bound comparison
//!
//! Runs the configured number of independent replications, merges every
//! replication's samples into one owned [`MetricsStore`], reduces the store
//! to the empirical availability curve, and evaluates the analytical bounds
//! once for comparison.

use crate::bounds::{lower_bound, upper_bound};
use crate::config::StudyConfig;
use crate::error::ConfigError;
use crate::stack::{ReplicationRecord, SimulationStack};
use avail_metrics::{MetricsStore, ReplicationId};
use tracing::info;

/// The outcome of a readiness study.
#[derive(Debug, Clone)]
pub struct ReadinessReport {
    /// Empirical availability per tick, averaged across replications,
    /// ascending in time. This is the curve a reporting stage plots.
    pub curve: Vec<(u64, f64)>,
    /// Analytical optimistic bound (a constant reference line).
    pub upper_bound: f64,
    /// Analytical pessimistic bound (a constant reference line).
    pub lower_bound: f64,
}

impl ReadinessReport {
    /// Mean of the curve's tail, a point estimate of the steady-state
    /// readiness coefficient. `skip` ticks are discarded as warm-up.
    pub fn steady_state_estimate(&self, skip: usize) -> Option<f64> {
        let tail = self.curve.get(skip..).filter(|t| !t.is_empty())?;
        Some(tail.iter().map(|(_, avg)| avg).sum::<f64>() / tail.len() as f64)
    }
}

/// Runs a full study: every replication to completion, then the reduction
/// and the bound comparison.
///
/// Replications run sequentially; each owns its clock and state, and only
/// the final merge into the store crosses replication boundaries.
///
/// # Errors
///
/// [`ConfigError`] before any replication runs; no metrics are produced.
pub fn run_study(config: &StudyConfig) -> Result<ReadinessReport, ConfigError> {
    config.validate()?;
    let schema = config.build_schema()?;

    info!(replications = config.replications, horizon = config.horizon,
        units = config.unit_count, workers = config.workers, "starting readiness study");

    let mut store = MetricsStore::new();
    for replication in 0..config.replications {
        let id = ReplicationId(replication as u32);
        let stack = SimulationStack::new(id, config)?;
        merge_record(&mut store, stack.run());
    }
    store.log_contents();

    let report = ReadinessReport {
        curve: store.averages(),
        upper_bound: upper_bound(&schema, config.failure_rate, config.repair_rate),
        lower_bound: lower_bound(&schema, config.failure_rate, config.repair_rate),
    };

    info!(
        upper = report.upper_bound,
        lower = report.lower_bound,
        steady_state = ?report.steady_state_estimate(config.horizon as usize / 10),
        "readiness study completed"
    );
    Ok(report)
}

/// Appends one replication's samples into the shared store.
///
/// Each record touches every tick key exactly once, so merging records
/// sequentially keeps a single writer per tick per replication.
fn merge_record(store: &mut MetricsStore, record: ReplicationRecord) {
    for (tick, value) in record.samples {
        store.add(tick, record.replication, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::schema::SchemaNode;

    fn quick_config() -> StudyConfig {
        StudyConfig {
            replications: 3,
            horizon: 40,
            ..StudyConfig::default()
        }
    }

    #[test]
    fn test_study_produces_full_curve() {
        let report = run_study(&quick_config()).unwrap();

        assert_eq!(report.curve.len(), 40);
        assert_eq!(report.curve[0], (0, 1.0));
        for &(_, avg) in &report.curve {
            assert!((0.0..=1.0).contains(&avg));
        }
        // With 3 replications every average is a multiple of 1/3.
        for &(_, avg) in &report.curve {
            let scaled = avg * 3.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bounds_bracket_each_other() {
        let report = run_study(&quick_config()).unwrap();
        assert!(report.lower_bound <= report.upper_bound);
        assert!(report.lower_bound > 0.0);
        assert!(report.upper_bound < 1.0);
    }

    #[test]
    fn test_steady_state_estimate_skips_warmup() {
        let report = ReadinessReport {
            curve: vec![(0, 1.0), (1, 1.0), (2, 0.5), (3, 0.7)],
            upper_bound: 1.0,
            lower_bound: 0.0,
        };
        assert_eq!(report.steady_state_estimate(2), Some(0.6));
        assert_eq!(report.steady_state_estimate(4), None);
    }

    #[test]
    fn test_invalid_configuration_produces_no_metrics() {
        let config = StudyConfig {
            schema: vec![SchemaNode::Group(vec![])],
            unit_count: 0,
            ..quick_config()
        };
        let err = run_study(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Schema(SchemaError::EmptyGroup { position: 0 })
        );
    }
}
