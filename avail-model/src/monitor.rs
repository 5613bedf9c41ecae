//! Availability monitor: the periodic sampling process
//!
//! Ticks once per model time unit from time zero, snapshots every unit state
//! and records whether the schema judged the system up. Recording is sampled,
//! not event-driven: a state change that happens strictly between ticks is
//! invisible until the next tick.

use crate::schema::Schema;
use crate::unit::StateBoard;
use avail_core::{Component, Key, Scheduler, SimTime};
use avail_metrics::ReplicationId;
use tracing::debug;

/// Sampling period: one model time unit, no jitter.
const PERIOD: SimTime = SimTime::from_units(1);

#[derive(Debug, Clone, Copy)]
pub enum MonitorEvent {
    Tick,
}

/// Periodic observer for one replication.
///
/// Samples accumulate locally, tagged with the tick they were taken at; the
/// driver extracts them when the replication ends and merges them into the
/// study-wide store.
pub struct AvailabilityMonitor {
    replication: ReplicationId,
    schema: Schema,
    board: StateBoard,
    samples: Vec<(u64, u8)>,
}

impl AvailabilityMonitor {
    pub fn new(replication: ReplicationId, schema: Schema, board: StateBoard) -> Self {
        Self {
            replication,
            schema,
            board,
            samples: Vec::new(),
        }
    }

    pub fn replication(&self) -> ReplicationId {
        self.replication
    }

    /// The `(tick, 0/1 verdict)` samples recorded so far.
    pub fn samples(&self) -> &[(u64, u8)] {
        &self.samples
    }

    /// Consumes the monitor, yielding its recorded samples.
    pub fn into_samples(self) -> Vec<(u64, u8)> {
        self.samples
    }
}

impl Component for AvailabilityMonitor {
    type Event = MonitorEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) {
        match event {
            MonitorEvent::Tick => {
                let states = self.board.snapshot();
                let up = self.schema.check(&states);
                let readiness = self.schema.readiness(&states);
                let tick = scheduler.time().tick();

                debug!(replication = %self.replication, tick, ?states, up, readiness,
                    "availability sampled");

                self.samples.push((tick, u8::from(up)));
                scheduler.schedule(PERIOD, self_id, MonitorEvent::Tick);
            }
        }
    }
}
