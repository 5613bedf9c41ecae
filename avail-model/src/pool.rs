//! Shared repair-worker pool
//!
//! One pool per replication, shared by every unit in the stack. A failed
//! unit requests exclusive use of one worker; while all workers are busy the
//! request waits in a FIFO queue. Granting happens through the scheduler so
//! a freed worker reaches the oldest waiter as a regular same-instant event,
//! and the scheduler's tie-break keeps grants in request order even when
//! several releases coincide.
//!
//! A unit holds at most one grant at a time and always releases it before
//! requesting again, so the pool cannot deadlock.

use crate::error::PoolError;
use crate::unit::UnitEvent;
use avail_core::{Key, Scheduler};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Exclusive use of one repair worker, issued by [`RepairPool::request`] and
/// returned with [`RepairPool::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepairGrant {
    grant_id: u64,
}

impl RepairGrant {
    pub fn id(&self) -> u64 {
        self.grant_id
    }
}

/// Fixed-capacity pool of repair workers with FIFO-fair granting.
pub struct RepairPool {
    capacity: usize,
    next_grant_id: u64,
    outstanding: HashSet<u64>,
    waiting: VecDeque<Key<UnitEvent>>,
}

impl RepairPool {
    /// # Panics
    ///
    /// Panics if `capacity` is zero; the study configuration rejects that
    /// before a pool is ever built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "repair pool capacity must be at least 1");
        Self {
            capacity,
            next_grant_id: 0,
            outstanding: HashSet::new(),
            waiting: VecDeque::new(),
        }
    }

    /// Requests one worker for `waiter`.
    ///
    /// Returns the grant immediately while free capacity remains. Otherwise
    /// the waiter joins the queue and will receive the grant later as a
    /// [`UnitEvent::Granted`] event; the wait can be arbitrarily long under
    /// contention.
    pub fn request(&mut self, waiter: Key<UnitEvent>) -> Option<RepairGrant> {
        if self.outstanding.len() < self.capacity {
            let grant = self.issue();
            debug!(grant_id = grant.id(), "repair worker granted immediately");
            Some(grant)
        } else {
            self.waiting.push_back(waiter);
            debug!(queue_len = self.waiting.len(), "repair request queued, pool exhausted");
            None
        }
    }

    /// Returns a worker to the pool, handing it straight to the oldest
    /// waiter if one is queued.
    ///
    /// # Errors
    ///
    /// [`PoolError::GrantNotHeld`] when `grant` is not outstanding, either a
    /// double release or a release of a grant this pool never issued. The
    /// unit process treats holding its grant as a state-machine invariant,
    /// so this surfaces as a loud failure rather than a silent no-op.
    pub fn release(
        &mut self,
        grant: RepairGrant,
        scheduler: &mut Scheduler,
    ) -> Result<(), PoolError> {
        if !self.outstanding.remove(&grant.grant_id) {
            return Err(PoolError::GrantNotHeld {
                grant_id: grant.grant_id,
            });
        }
        debug!(grant_id = grant.id(), "repair worker released");

        if let Some(next) = self.waiting.pop_front() {
            let handoff = self.issue();
            debug!(grant_id = handoff.id(), "worker handed to queued unit");
            scheduler.schedule_now(next, UnitEvent::Granted(handoff));
        }
        Ok(())
    }

    fn issue(&mut self) -> RepairGrant {
        self.next_grant_id += 1;
        self.outstanding.insert(self.next_grant_id);
        RepairGrant {
            grant_id: self.next_grant_id,
        }
    }

    /// Workers not currently granted.
    pub fn available(&self) -> usize {
        self.capacity - self.outstanding.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Requests waiting for a worker.
    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avail_core::SimTime;
    use uuid::Uuid;

    fn waiter_key() -> Key<UnitEvent> {
        Key::new_with_id(Uuid::now_v7())
    }

    #[test]
    fn test_grants_up_to_capacity_then_queues() {
        let mut pool = RepairPool::new(2);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.available(), 2);

        let first = pool.request(waiter_key());
        let second = pool.request(waiter_key());
        assert!(first.is_some());
        assert!(second.is_some());
        assert_eq!(pool.available(), 0);

        // Third simultaneous requester must wait.
        let third = pool.request(waiter_key());
        assert!(third.is_none());
        assert_eq!(pool.waiting(), 1);
    }

    #[test]
    fn test_release_hands_worker_to_oldest_waiter() {
        let mut pool = RepairPool::new(1);
        let mut scheduler = Scheduler::default();

        let held = pool.request(waiter_key()).unwrap();
        let queued_first = waiter_key();
        let queued_second = waiter_key();
        assert!(pool.request(queued_first).is_none());
        assert!(pool.request(queued_second).is_none());

        pool.release(held, &mut scheduler).unwrap();
        assert_eq!(pool.waiting(), 1);
        // The worker went straight to the head of the queue, not back to the
        // free pool.
        assert_eq!(pool.available(), 0);

        let entry = scheduler.pop().expect("a grant event must be scheduled");
        let entry = entry.downcast::<UnitEvent>().unwrap();
        assert_eq!(entry.time, SimTime::zero());
        assert_eq!(entry.component_key.id(), queued_first.id());
        assert!(matches!(entry.event, UnitEvent::Granted(_)));
    }

    #[test]
    fn test_release_without_waiters_frees_capacity() {
        let mut pool = RepairPool::new(1);
        let mut scheduler = Scheduler::default();

        let grant = pool.request(waiter_key()).unwrap();
        pool.release(grant, &mut scheduler).unwrap();
        assert_eq!(pool.available(), 1);
        assert!(scheduler.pop().is_none());
    }

    #[test]
    fn test_double_release_fails_loudly() {
        let mut pool = RepairPool::new(1);
        let mut scheduler = Scheduler::default();

        let grant = pool.request(waiter_key()).unwrap();
        pool.release(grant, &mut scheduler).unwrap();

        let err = pool.release(grant, &mut scheduler).unwrap_err();
        assert_eq!(err, PoolError::GrantNotHeld { grant_id: grant.id() });
    }

    #[test]
    fn test_grants_are_fifo_across_releases() {
        let mut pool = RepairPool::new(1);
        let mut scheduler = Scheduler::default();

        let held = pool.request(waiter_key()).unwrap();
        let waiters: Vec<_> = (0..3).map(|_| waiter_key()).collect();
        for &w in &waiters {
            assert!(pool.request(w).is_none());
        }

        // Release, then drain the handoff chain: each grant event targets the
        // next waiter in request order.
        let mut grant = held;
        for expected in &waiters {
            pool.release(grant, &mut scheduler).unwrap();
            let entry = scheduler.pop().unwrap();
            let entry = entry.downcast::<UnitEvent>().unwrap();
            assert_eq!(entry.component_key.id(), expected.id());
            grant = match entry.event {
                UnitEvent::Granted(g) => *g,
                other => panic!("expected a grant event, got {other:?}"),
            };
        }
        pool.release(grant, &mut scheduler).unwrap();
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.waiting(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity must be at least 1")]
    fn test_zero_capacity_is_rejected() {
        RepairPool::new(0);
    }
}
