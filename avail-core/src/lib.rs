//! Core discrete event simulation engine.
//!
//! This crate provides the building blocks the availability model runs on:
//! simulation time, event scheduling, component-based dispatch, executors,
//! and random-variate samplers.
//!
//! # Architecture Overview
//!
//! A [`Simulation`] owns a [`Scheduler`] (the event queue and the clock) and
//! a set of type-erased components. A component is a state machine advanced
//! by the event loop: it reacts to its own event type and may schedule
//! further events, including on other components. The whole arrangement is
//! single-threaded and cooperative: control only changes hands at event
//! boundaries, so a component observing another's state always sees it at
//! rest.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! let mut simulation = Simulation::default();
//! let key = simulation.add_component(MyProcess::new());
//! simulation.schedule(SimTime::zero(), key, MyEvent::Start);
//! simulation.execute(Executor::timed(SimTime::from_units(1_000)));
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], which represents simulated time (never
//! wall-clock time) in model time units. Events scheduled for the same
//! instant fire in scheduling order; see [`Scheduler`] for the guarantee.

pub mod dists;
pub mod execute;
pub mod logging;
pub mod scheduler;
pub mod time;

use std::any::Any;
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

pub use dists::{Constant, Exponential, RateSampler};
pub use execute::{Execute, Executor};
pub use logging::{init_simulation_logging, init_simulation_logging_with_level};
pub use scheduler::{ClockRef, EventEntry, EventId, Scheduler};
pub use time::SimTime;

/// Typed handle for a registered component.
///
/// The phantom type ties the key to the component's event type, so events can
/// only be scheduled on components that understand them.
#[derive(Debug)]
pub struct Key<T> {
    id: Uuid,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Key<T> {
    pub fn new_with_id(id: Uuid) -> Self {
        Self {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// The UUID of this key.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Key<T> {}

pub trait ProcessEventEntry: Any {
    fn process_event_entry(&mut self, entry: EventEntry, scheduler: &mut Scheduler);
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A simulated process: a state machine advanced by the event loop.
pub trait Component: ProcessEventEntry {
    type Event: 'static;

    fn process_event(
        &mut self,
        self_id: Key<Self::Event>,
        event: &Self::Event,
        scheduler: &mut Scheduler,
    );
}

impl<E, C> ProcessEventEntry for C
where
    E: std::fmt::Debug + 'static,
    C: Component<Event = E> + 'static,
{
    fn process_event_entry(&mut self, entry: EventEntry, scheduler: &mut Scheduler) {
        let typed_entry = entry
            .downcast::<E>()
            .expect("event entry does not match the component's event type");
        self.process_event(typed_entry.component_key, typed_entry.event, scheduler);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Container holding type-erased components.
#[derive(Default)]
pub struct Components {
    components: HashMap<Uuid, Box<dyn ProcessEventEntry>>,
}

impl Components {
    /// Dispatches the event entry to the component it targets. Entries for
    /// components that have been removed are dropped silently.
    pub fn process_event_entry(&mut self, entry: EventEntry, scheduler: &mut Scheduler) {
        if let Some(component) = self.components.get_mut(&entry.component) {
            component.process_event_entry(entry, scheduler);
        }
    }

    /// Registers a new component and returns its key.
    #[must_use]
    pub fn register<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        component: C,
    ) -> Key<E> {
        let id = Uuid::now_v7();
        self.components.insert(id, Box::new(component));
        Key::new_with_id(id)
    }

    pub fn remove<E: 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<C> {
        self.components.remove(&key.id).and_then(|boxed_trait| {
            let boxed_any: Box<dyn std::any::Any> = boxed_trait;
            boxed_any.downcast::<C>().ok().map(|boxed_c| *boxed_c)
        })
    }

    /// Mutable access to a registered component.
    pub fn get_component_mut<E: 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<&mut C> {
        self.components
            .get_mut(&key.id)
            .and_then(|boxed_trait| boxed_trait.as_any_mut().downcast_mut::<C>())
    }
}

/// One self-contained simulation: a scheduler plus the components it drives.
///
/// Every replication of the availability study owns its own `Simulation`;
/// nothing is shared between instances, so replications are independent by
/// construction.
pub struct Simulation {
    scheduler: Scheduler,
    pub components: Components,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            scheduler: Scheduler::default(),
            components: Components::default(),
        }
    }
}

impl Simulation {
    /// The current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// A read-only handle on the simulation clock.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    /// Performs one step of the simulation. Returns `true` if an event was
    /// available to process, and `false` once the queue is exhausted.
    pub fn step(&mut self) -> bool {
        self.scheduler.pop().is_some_and(|event| {
            trace!(event_time = %event.time(), "processing simulation step");
            self.components.process_event_entry(event, &mut self.scheduler);
            true
        })
    }

    /// Runs the simulation under the given executor.
    ///
    /// The stopping condition depends on the executor; see [`Execute`] and
    /// [`Executor`].
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<E: Execute>(&mut self, executor: E) {
        info!("starting simulation execution");
        executor.execute(self);
        info!(final_time = %self.time(), "simulation execution completed");
    }

    /// Adds a new component.
    #[must_use]
    pub fn add_component<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        component: C,
    ) -> Key<E> {
        let key = self.components.register(component);
        debug!(component_id = %key.id(), "added component to simulation");
        key
    }

    /// Removes a component, typically at the end of a replication to peek at
    /// the state it accumulated.
    #[must_use]
    pub fn remove_component<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<C> {
        let result = self.components.remove(key);
        if result.is_none() {
            warn!(component_id = %key.id(), "attempted to remove non-existent component");
        }
        result
    }

    /// Mutable access to a registered component.
    pub fn get_component_mut<E: std::fmt::Debug + 'static, C: Component<Event = E> + 'static>(
        &mut self,
        key: Key<E>,
    ) -> Option<&mut C> {
        self.components.get_component_mut(key)
    }

    /// Schedules `event` to fire on `component` at `self.time() + delay`.
    pub fn schedule<E: std::fmt::Debug + 'static>(
        &mut self,
        delay: SimTime,
        component: Key<E>,
        event: E,
    ) {
        self.scheduler.schedule(delay, component, event);
    }

    /// The firing time of the next scheduled event, if any.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek().map(|e| e.time())
    }
}
