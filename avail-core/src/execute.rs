use crate::{SimTime, Simulation};

/// Simulation execution trait.
pub trait Execute {
    /// Executes the simulation until some stopping condition is reached.
    /// The condition is implementation-specific.
    fn execute(self, sim: &mut Simulation);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Horizon(SimTime),
    NoEvents,
    Steps(usize),
}

/// Executor for running an entire simulation.
///
/// See the crate level documentation for examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// The simulation ends only once no events remain in the queue.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Runs every event scheduled strictly before `horizon`.
    ///
    /// Events scheduled at or after the horizon are left unprocessed and the
    /// clock stays at the last processed event. A monitor ticking once per
    /// time unit from zero therefore reports exactly the ticks
    /// `0..horizon.tick()`.
    #[must_use]
    pub fn timed(horizon: SimTime) -> Self {
        Self {
            end_condition: EndCondition::Horizon(horizon),
        }
    }

    /// Executes exactly this many steps, unless the queue empties first.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }
}

impl Execute for Executor {
    fn execute(self, sim: &mut Simulation) {
        match self.end_condition {
            EndCondition::Horizon(time) => execute_before(sim, time),
            EndCondition::NoEvents => execute_until_empty(sim),
            EndCondition::Steps(steps) => execute_steps(sim, steps),
        }
    }
}

fn execute_until_empty(sim: &mut Simulation) {
    while sim.step() {}
}

fn execute_before(sim: &mut Simulation, horizon: SimTime) {
    while sim.scheduler.peek().is_some_and(|e| e.time() < horizon) {
        sim.step();
    }
}

fn execute_steps(sim: &mut Simulation, steps: usize) {
    for _ in 0..steps {
        if !sim.step() {
            break;
        }
    }
}
