//! One replication: a stack of units, its repair pool, and its monitor
//!
//! A `SimulationStack` binds everything a single replication needs to one
//! simulated clock: the shared state board, the repair pool, `unit_count`
//! unit processes with their own RNG substreams, and the availability
//! monitor. Nothing is shared with other replications.

use crate::config::StudyConfig;
use crate::error::ConfigError;
use crate::monitor::{AvailabilityMonitor, MonitorEvent};
use crate::pool::RepairPool;
use crate::unit::{RepairableUnit, StateBoard, UnitEvent};
use avail_core::dists::derive_seed;
use avail_core::{Executor, Exponential, Key, SimTime, Simulation};
use avail_metrics::ReplicationId;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// The samples one finished replication contributes to the study.
#[derive(Debug, Clone)]
pub struct ReplicationRecord {
    pub replication: ReplicationId,
    /// `(tick, 0/1 verdict)` for every tick in `0..horizon`.
    pub samples: Vec<(u64, u8)>,
}

/// One runnable replication of the modeled system.
#[derive(Debug)]
pub struct SimulationStack {
    sim: Simulation,
    monitor_key: Key<MonitorEvent>,
    replication: ReplicationId,
    horizon: u64,
}

impl SimulationStack {
    /// Builds the replication: pool, units, monitor, and their initial
    /// events (every unit enters service and the monitor takes its first
    /// sample at time zero).
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the configuration or its schema is invalid; no
    /// simulation state is created in that case.
    pub fn new(replication: ReplicationId, config: &StudyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let schema = config.build_schema()?;

        let mut sim = Simulation::default();
        let board = StateBoard::new(config.unit_count);
        let pool = Rc::new(RefCell::new(RepairPool::new(config.workers)));

        for index in 0..config.unit_count {
            let stream = u64::from(replication.0) * 2 * config.unit_count as u64
                + 2 * index as u64;
            let uptime = Exponential::seeded(
                config.failure_rate,
                derive_seed(config.seed, stream),
            );
            let repair = Exponential::seeded(
                config.repair_rate,
                derive_seed(config.seed, stream + 1),
            );
            let unit = RepairableUnit::new(
                index,
                board.clone(),
                Rc::clone(&pool),
                Box::new(uptime),
                Box::new(repair),
            );
            let key: Key<UnitEvent> = sim.add_component(unit);
            sim.schedule(SimTime::zero(), key, UnitEvent::Operational);
        }

        let monitor = AvailabilityMonitor::new(replication, schema, board);
        let monitor_key = sim.add_component(monitor);
        sim.schedule(SimTime::zero(), monitor_key, MonitorEvent::Tick);

        debug!(%replication, units = config.unit_count, workers = config.workers,
            "replication stack built");

        Ok(Self {
            sim,
            monitor_key,
            replication,
            horizon: config.horizon,
        })
    }

    pub fn replication(&self) -> ReplicationId {
        self.replication
    }

    /// Drives the clock to the horizon and extracts the monitor's samples.
    ///
    /// The replication always runs to completion; there is no early or
    /// partial termination.
    pub fn run(mut self) -> ReplicationRecord {
        self.sim
            .execute(Executor::timed(SimTime::from_units(self.horizon)));

        let monitor: AvailabilityMonitor = self
            .sim
            .remove_component(self.monitor_key)
            .expect("the monitor is registered for the stack's whole lifetime");

        ReplicationRecord {
            replication: self.replication,
            samples: monitor.into_samples(),
        }
    }
}
