//! Random-variate samplers for failure and repair durations
//!
//! The availability model consumes randomness through one narrow interface:
//! a sampler that, given a rate parameter fixed at construction, produces one
//! positive random duration per call. The memoryless [`Exponential`] sampler
//! is the one the model ships with; [`Constant`] exists so process tests can
//! run deterministically.

use crate::SimTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp;

/// Produces one random duration per call.
pub trait RateSampler {
    /// Sample the next duration.
    fn sample(&mut self) -> SimTime;
}

/// Memoryless exponential duration sampler.
///
/// Draws durations (in model time units) from an exponential distribution
/// with the given rate: the mean duration is `1 / rate` units. Used for both
/// operational lifetimes (rate λ) and repair times (rate μ).
pub struct Exponential {
    rate: f64,
    rng: StdRng,
    exp_dist: Exp<f64>,
}

impl Exponential {
    /// Create a sampler seeded from OS entropy.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not positive.
    pub fn new(rate: f64) -> Self {
        Self::from_rng(rate, StdRng::from_entropy())
    }

    /// Create a sampler with a fixed seed, for reproducible replications.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not positive.
    pub fn seeded(rate: f64, seed: u64) -> Self {
        Self::from_rng(rate, StdRng::seed_from_u64(seed))
    }

    fn from_rng(rate: f64, rng: StdRng) -> Self {
        assert!(rate > 0.0, "Rate must be positive");
        let exp_dist = Exp::new(rate).expect("Rate must be positive");
        Self { rate, rng, exp_dist }
    }

    /// The rate parameter.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The mean duration, `1 / rate` model units.
    pub fn mean(&self) -> SimTime {
        SimTime::from_units_f64(1.0 / self.rate)
    }
}

impl RateSampler for Exponential {
    fn sample(&mut self) -> SimTime {
        let units: f64 = self.rng.sample(self.exp_dist);
        SimTime::from_units_f64(units)
    }
}

/// Fixed-duration sampler for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    duration: SimTime,
}

impl Constant {
    pub fn new(duration: SimTime) -> Self {
        Self { duration }
    }
}

impl RateSampler for Constant {
    fn sample(&mut self) -> SimTime {
        self.duration
    }
}

/// Derives an independent RNG substream seed from a base seed (SplitMix64).
///
/// Every (replication, unit, rate) triple in a study gets its own stream so
/// replications stay independent while remaining reproducible from a single
/// configured seed.
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    let mut x = base.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
