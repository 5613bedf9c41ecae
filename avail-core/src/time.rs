//! Simulation time management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

const NANOS_PER_UNIT: u64 = 1_000_000_000;

/// A point in simulation time.
///
/// Time is measured in model time units (one unit = one simulated second of
/// the availability model), stored internally as nanoseconds since the start
/// of the replication. Fractional durations drawn from the rate samplers are
/// representable without losing the integer tick grid the monitor samples on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// The start of the replication (time zero).
    pub const fn zero() -> Self {
        SimTime(0)
    }

    /// A duration of `units` whole model time units.
    pub const fn from_units(units: u64) -> Self {
        SimTime(units * NANOS_PER_UNIT)
    }

    /// A duration expressed in (possibly fractional) model time units.
    ///
    /// # Panics
    ///
    /// Panics if `units` is negative, non-finite, or too large to represent.
    pub fn from_units_f64(units: f64) -> Self {
        if !units.is_finite() {
            panic!("SimTime cannot be created from non-finite value: {units}");
        }
        if units < 0.0 {
            panic!("SimTime cannot be negative: {units}");
        }
        const MAX_UNITS: f64 = (u64::MAX as f64) / NANOS_PER_UNIT as f64;
        if units > MAX_UNITS {
            panic!("SimTime value too large: {units} units (max: {MAX_UNITS})");
        }
        SimTime((units * NANOS_PER_UNIT as f64) as u64)
    }

    /// Raw nanosecond value.
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Elapsed time in fractional model units.
    pub fn as_units_f64(&self) -> f64 {
        self.0 as f64 / NANOS_PER_UNIT as f64
    }

    /// The integer tick this instant falls in: the floor of the elapsed whole
    /// model units. This is the key the availability monitor records under.
    pub const fn tick(&self) -> u64 {
        self.0 / NANOS_PER_UNIT
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.0))
    }
}

impl Sub<SimTime> for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> Self::Output {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / NANOS_PER_UNIT;
        let frac = self.0 % NANOS_PER_UNIT;
        if frac == 0 {
            write!(f, "{whole}u")
        } else {
            write!(f, "{:.3}u", self.as_units_f64())
        }
    }
}
