use std::any::Any;
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

use crate::{Key, SimTime};

/// Unique, monotonically increasing identifier for scheduled events.
///
/// Besides identifying events, the id doubles as the scheduler's tie-break:
/// see [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event({})", self.0)
    }
}

/// Entry stored in the scheduler: the event value, the target component key,
/// and the absolute time at which it fires.
///
/// Entries are popped off the internal priority queue and handed to
/// [`crate::Components`], which downcasts them and dispatches to the right
/// component.
#[derive(Debug)]
pub struct EventEntry {
    event_id: EventId,
    time: SimTime,
    pub(crate) component: Uuid,
    inner: Box<dyn Any>,
}

impl EventEntry {
    fn new<E: fmt::Debug + 'static>(
        id: EventId,
        time: SimTime,
        component: Key<E>,
        event: E,
    ) -> Self {
        EventEntry {
            event_id: id,
            time,
            component: component.id(),
            inner: Box::new(event),
        }
    }

    pub(crate) fn time(&self) -> SimTime {
        self.time
    }

    /// Tries to downcast the entry to one holding an event of type `E`.
    #[must_use]
    pub fn downcast<E: fmt::Debug + 'static>(&self) -> Option<EventEntryTyped<'_, E>> {
        self.inner.downcast_ref::<E>().map(|event| EventEntryTyped {
            id: self.event_id,
            time: self.time,
            component_key: Key::new_with_id(self.component),
            event,
        })
    }
}

impl PartialEq for EventEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.event_id == other.event_id
    }
}

impl Eq for EventEntry {}

impl PartialOrd for EventEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior in BinaryHeap. Equal times fall back
        // to the event id, so same-instant events pop in scheduling order.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.event_id.cmp(&self.event_id))
    }
}

/// A popped event entry downcast to its concrete event type.
#[derive(Debug)]
pub struct EventEntryTyped<'e, E: fmt::Debug> {
    pub id: EventId,
    pub time: SimTime,
    pub component_key: Key<E>,
    pub event: &'e E,
}

type Clock = Rc<Cell<SimTime>>;

/// Read-only access to the simulation clock.
///
/// The clock itself is owned by the scheduler; anything that only needs to
/// observe the current time holds a `ClockRef`.
pub struct ClockRef {
    clock: Clock,
}

impl ClockRef {
    /// The current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

/// Keeps the current simulation time and the queue of upcoming events.
///
/// Ordering guarantee: events fire in ascending scheduled time, and events
/// scheduled for the same instant fire in the order they were scheduled.
/// The repair pool relies on this to keep worker grants FIFO-fair when a
/// release and several pending requests coincide.
pub struct Scheduler {
    next_event_id: u64,
    events: BinaryHeap<EventEntry>,
    clock: Clock,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            next_event_id: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::default())),
        }
    }
}

impl Scheduler {
    /// Schedules `event` to fire on `component` at `self.time() + delay`.
    pub fn schedule<E: fmt::Debug + 'static>(
        &mut self,
        delay: SimTime,
        component: Key<E>,
        event: E,
    ) {
        self.next_event_id += 1;
        let time = self.time() + delay;
        self.events
            .push(EventEntry::new(EventId(self.next_event_id), time, component, event));
    }

    /// Schedules `event` to fire on `component` at the current instant,
    /// after every event already scheduled for this instant.
    pub fn schedule_now<E: fmt::Debug + 'static>(&mut self, component: Key<E>, event: E) {
        self.schedule(SimTime::zero(), component, event);
    }

    /// The current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    /// A read-only handle on the simulation clock.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// A reference to the next scheduled event, or `None` if none are left.
    pub fn peek(&self) -> Option<&EventEntry> {
        self.events.peek()
    }

    /// Removes and returns the next scheduled event, advancing the clock to
    /// its firing time. Returns `None` once the queue is empty.
    pub fn pop(&mut self) -> Option<EventEntry> {
        self.events.pop().inspect(|event| {
            self.clock.replace(event.time());
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Eq, PartialEq)]
    struct EventA;
    #[derive(Debug, Clone, Eq, PartialEq)]
    struct EventB;

    #[test]
    fn test_clock_ref_tracks_scheduler() {
        let mut scheduler = Scheduler::default();
        let clock = scheduler.clock();
        assert_eq!(clock.time(), SimTime::zero());

        let key = Key::<EventA>::new_with_id(Uuid::now_v7());
        scheduler.schedule(SimTime::from_units(5), key, EventA);
        scheduler.pop().unwrap();
        assert_eq!(clock.time(), SimTime::from_units(5));
    }

    #[test]
    fn test_event_entry_downcast() {
        let key = Key::<String>::new_with_id(Uuid::now_v7());
        let entry = EventEntry::new(
            EventId(0),
            SimTime::from_units(1),
            key,
            String::from("inner"),
        );
        assert!(entry.downcast::<String>().is_some());
        assert!(entry.downcast::<i32>().is_none());
    }

    #[test]
    fn test_events_fire_in_time_order() {
        let mut scheduler = Scheduler::default();
        let component_a = Key::<EventA>::new_with_id(Uuid::now_v7());
        let component_b = Key::<EventB>::new_with_id(Uuid::now_v7());

        scheduler.schedule(SimTime::from_units(1), component_a, EventA);
        scheduler.schedule_now(component_b, EventB);
        scheduler.schedule(SimTime::from_units(2), component_b, EventB);

        assert_eq!(scheduler.time(), SimTime::zero());

        let entry = scheduler.pop().unwrap();
        let entry = entry.downcast::<EventB>().unwrap();
        assert_eq!(entry.time, SimTime::zero());
        assert_eq!(entry.component_key.id(), component_b.id());

        let entry = scheduler.pop().unwrap();
        let entry = entry.downcast::<EventA>().unwrap();
        assert_eq!(entry.time, SimTime::from_units(1));
        assert_eq!(scheduler.time(), SimTime::from_units(1));

        let entry = scheduler.pop().unwrap();
        assert!(entry.downcast::<EventB>().is_some());
        assert_eq!(scheduler.time(), SimTime::from_units(2));

        assert!(scheduler.pop().is_none());
    }

    #[test]
    fn test_same_instant_events_fire_in_scheduling_order() {
        let mut scheduler = Scheduler::default();
        let key = Key::<u32>::new_with_id(Uuid::now_v7());

        for i in 0..100u32 {
            scheduler.schedule(SimTime::from_units(7), key, i);
        }

        for expected in 0..100u32 {
            let entry = scheduler.pop().unwrap();
            let entry = entry.downcast::<u32>().unwrap();
            assert_eq!(*entry.event, expected);
        }
    }

    #[test]
    fn test_schedule_now_runs_after_existing_same_instant_events() {
        let mut scheduler = Scheduler::default();
        let key = Key::<&'static str>::new_with_id(Uuid::now_v7());

        scheduler.schedule_now(key, "first");
        scheduler.schedule_now(key, "second");

        let entry = scheduler.pop().unwrap();
        assert_eq!(*entry.downcast::<&'static str>().unwrap().event, "first");
        let entry = scheduler.pop().unwrap();
        assert_eq!(*entry.downcast::<&'static str>().unwrap().event, "second");
    }
}
