//! Repairable unit: the failing/recovering process
//!
//! Each unit cycles forever between operational and under-repair within its
//! replication: operational for an exponential(λ) lifetime, then failed and
//! contending for a repair worker, then under repair for an exponential(μ)
//! duration drawn when the worker is granted. The cycle has no terminal
//! state; it ends only when the replication's clock stops.

use crate::pool::{RepairGrant, RepairPool};
use avail_core::{Component, Key, RateSampler, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Shared per-replication view of every unit's boolean state.
///
/// `true` means operational. Each unit writes only its own slot; the monitor
/// snapshots the whole board at tick boundaries. Safe without further
/// synchronization because the scheduler is single-threaded and cooperative.
#[derive(Clone)]
pub struct StateBoard {
    states: Rc<RefCell<Vec<bool>>>,
}

impl StateBoard {
    /// A board for `unit_count` units, all operational.
    pub fn new(unit_count: usize) -> Self {
        Self {
            states: Rc::new(RefCell::new(vec![true; unit_count])),
        }
    }

    pub fn set(&self, index: usize, operational: bool) {
        self.states.borrow_mut()[index] = operational;
    }

    pub fn get(&self, index: usize) -> bool {
        self.states.borrow()[index]
    }

    /// A point-in-time copy of all unit states.
    pub fn snapshot(&self) -> Vec<bool> {
        self.states.borrow().clone()
    }

    pub fn unit_count(&self) -> usize {
        self.states.borrow().len()
    }
}

/// Events driving a [`RepairableUnit`] through its cycle.
#[derive(Debug, Clone, Copy)]
pub enum UnitEvent {
    /// Enter service: mark operational and schedule the next failure.
    Operational,
    /// The operational lifetime elapsed; contend for a repair worker.
    Failed,
    /// A repair worker became available for this unit.
    Granted(RepairGrant),
    /// The repair duration elapsed while holding this grant.
    Repaired(RepairGrant),
}

/// One independently failing and recovering unit of the stack.
pub struct RepairableUnit {
    index: usize,
    board: StateBoard,
    pool: Rc<RefCell<RepairPool>>,
    uptime: Box<dyn RateSampler>,
    repair: Box<dyn RateSampler>,
}

impl RepairableUnit {
    pub fn new(
        index: usize,
        board: StateBoard,
        pool: Rc<RefCell<RepairPool>>,
        uptime: Box<dyn RateSampler>,
        repair: Box<dyn RateSampler>,
    ) -> Self {
        Self {
            index,
            board,
            pool,
            uptime,
            repair,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Component for RepairableUnit {
    type Event = UnitEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) {
        match event {
            UnitEvent::Operational => {
                self.board.set(self.index, true);
                let lifetime = self.uptime.sample();
                debug!(unit = self.index, time = %scheduler.time(), lifetime = %lifetime,
                    "unit operational");
                scheduler.schedule(lifetime, self_id, UnitEvent::Failed);
            }
            UnitEvent::Failed => {
                self.board.set(self.index, false);
                debug!(unit = self.index, time = %scheduler.time(), "unit failed, requesting worker");
                if let Some(grant) = self.pool.borrow_mut().request(self_id) {
                    scheduler.schedule_now(self_id, UnitEvent::Granted(grant));
                }
            }
            UnitEvent::Granted(grant) => {
                let duration = self.repair.sample();
                debug!(unit = self.index, time = %scheduler.time(), duration = %duration,
                    "unit got a worker, repair underway");
                scheduler.schedule(duration, self_id, UnitEvent::Repaired(*grant));
            }
            UnitEvent::Repaired(grant) => {
                debug!(unit = self.index, time = %scheduler.time(), "unit repaired, releasing worker");
                // Holding the grant between Granted and Repaired is a
                // state-machine invariant; a failed release means the cycle
                // itself is broken.
                self.pool
                    .borrow_mut()
                    .release(*grant, scheduler)
                    .expect("unit released a repair grant it did not hold");
                scheduler.schedule_now(self_id, UnitEvent::Operational);
            }
        }
    }
}
