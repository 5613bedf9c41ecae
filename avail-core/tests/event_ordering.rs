//! Event ordering guardrail tests
//!
//! The scheduler promises that events fire in ascending scheduled time and
//! that same-instant events fire in the order they were scheduled. The repair
//! handoff in the availability model leans on that promise, so these tests
//! pin it at the simulation level, across components and across runs.

use avail_core::{Component, Execute, Executor, Key, Scheduler, SimTime, Simulation};
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<(u64, usize)>>>;

#[derive(Debug, Clone, Copy)]
enum LogEvent {
    Push(usize),
}

struct LoggerComponent {
    id: u64,
    log: Log,
}

impl Component for LoggerComponent {
    type Event = LogEvent;

    fn process_event(
        &mut self,
        _self_id: Key<Self::Event>,
        event: &Self::Event,
        _scheduler: &mut Scheduler,
    ) {
        match *event {
            LogEvent::Push(value) => self.log.borrow_mut().push((self.id, value)),
        }
    }
}

#[test]
fn same_instant_events_interleave_components_in_scheduling_order() {
    let mut sim = Simulation::default();
    let log: Log = Rc::new(RefCell::new(Vec::new()));

    let a = sim.add_component(LoggerComponent { id: 0, log: log.clone() });
    let b = sim.add_component(LoggerComponent { id: 1, log: log.clone() });

    // Alternate targets, all at the same instant.
    for i in 0..50 {
        sim.schedule(SimTime::from_units(3), a, LogEvent::Push(i));
        sim.schedule(SimTime::from_units(3), b, LogEvent::Push(i));
    }

    Executor::unbound().execute(&mut sim);

    let expected: Vec<(u64, usize)> = (0..50).flat_map(|i| [(0, i), (1, i)]).collect();
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn later_events_never_overtake_earlier_ones() {
    let mut sim = Simulation::default();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let key = sim.add_component(LoggerComponent { id: 0, log: log.clone() });

    // Scheduled out of time order; must fire in time order, with the two
    // entries at 2u keeping their scheduling order.
    sim.schedule(SimTime::from_units(5), key, LogEvent::Push(5));
    sim.schedule(SimTime::from_units(2), key, LogEvent::Push(2));
    sim.schedule(SimTime::from_units(2), key, LogEvent::Push(3));
    sim.schedule(SimTime::zero(), key, LogEvent::Push(0));

    Executor::unbound().execute(&mut sim);

    let values: Vec<usize> = log.borrow().iter().map(|&(_, v)| v).collect();
    assert_eq!(values, vec![0, 2, 3, 5]);
    assert_eq!(sim.time(), SimTime::from_units(5));
}

/// A component that reacts to its event by scheduling a follow-up at the same
/// instant; the follow-up must run after everything already queued for that
/// instant.
struct Chainer {
    log: Log,
    fired: usize,
}

#[derive(Debug, Clone, Copy)]
enum ChainEvent {
    Seed(usize),
    FollowUp(usize),
}

impl Component for Chainer {
    type Event = ChainEvent;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    ) {
        match *event {
            ChainEvent::Seed(value) => {
                self.log.borrow_mut().push((0, value));
                scheduler.schedule_now(self_id, ChainEvent::FollowUp(value));
            }
            ChainEvent::FollowUp(value) => {
                self.log.borrow_mut().push((1, value));
                self.fired += 1;
            }
        }
    }
}

#[test]
fn follow_ups_run_after_already_queued_same_instant_events() {
    let mut sim = Simulation::default();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let key = sim.add_component(Chainer { log: log.clone(), fired: 0 });

    sim.schedule(SimTime::from_units(1), key, ChainEvent::Seed(0));
    sim.schedule(SimTime::from_units(1), key, ChainEvent::Seed(1));

    Executor::unbound().execute(&mut sim);

    // Both seeds run before either follow-up.
    assert_eq!(*log.borrow(), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

    let chainer: Chainer = sim.remove_component(key).unwrap();
    assert_eq!(chainer.fired, 2);
}

fn run_same_instant_burst(event_count: usize) -> Vec<(u64, usize)> {
    let mut sim = Simulation::default();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let key = sim.add_component(LoggerComponent { id: 0, log: log.clone() });

    for i in 0..event_count {
        sim.schedule(SimTime::zero(), key, LogEvent::Push(i));
    }

    Executor::timed(SimTime::from_units(1)).execute(&mut sim);

    let result = log.borrow().clone();
    assert_eq!(result.len(), event_count);
    result
}

#[test]
fn same_instant_order_is_stable_across_runs() {
    let baseline = run_same_instant_burst(200);

    for _ in 0..20 {
        assert_eq!(run_same_instant_burst(200), baseline);
    }
}
